pub mod assignment;
pub mod profile;
pub mod slots;

pub use assignment::AssignmentResolver;
pub use profile::ProfileClient;
