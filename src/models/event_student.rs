use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One student's registration to one event. The (id_event, id_student)
/// pair is unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventStudent {
    pub id: i32,
    pub id_event: i32,
    pub id_student: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventStudentRequest {
    pub id_event: Option<i64>,
    pub id_student: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventStudentRequest {
    pub id_event: Option<i64>,
    pub id_student: Option<String>,
}

impl UpdateEventStudentRequest {
    pub fn is_empty(&self) -> bool {
        self.id_event.is_none() && self.id_student.is_none()
    }
}
