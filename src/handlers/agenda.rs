use axum::extract::{Path, State};
use axum::response::Response;

use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;
use crate::utils::response::success_list;
use crate::utils::validate::validate_uuid;

/// Full event detail list for a student, in chronological order.
pub async fn get_student_agenda(
    State(state): State<AppState>,
    Path(id_student): Path<String>,
) -> Result<Response, AppError> {
    let id_student = validate_uuid(&id_student, "id_student")?;
    let events = store::events::agenda_for_student(&state.pool, id_student).await?;

    let message = if events.is_empty() {
        "No events in this student's agenda"
    } else {
        "Agenda retrieved successfully"
    };
    Ok(success_list(events, message))
}
