pub mod event_students;
pub mod events;
