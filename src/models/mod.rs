pub mod event;
pub mod event_student;
pub mod student;

pub use event::{CreateEventRequest, Event, Slot, UpdateEventRequest, EVENT_TYPES};
pub use event_student::{CreateEventStudentRequest, EventStudent, UpdateEventStudentRequest};
pub use student::{ProfileEnvelope, StudentRecord};
