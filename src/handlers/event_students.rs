use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;

use crate::models::{CreateEventStudentRequest, UpdateEventStudentRequest};
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;
use crate::utils::response::{created, success, success_list};
use crate::utils::validate::{validate_positive, validate_uuid};

pub async fn list_event_students(State(state): State<AppState>) -> Result<Response, AppError> {
    let rows = store::event_students::list(&state.pool).await?;
    Ok(success_list(rows, "Assignments retrieved successfully"))
}

pub async fn get_event_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let row = store::event_students::get(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assignment with id {} not found", id)))?;
    Ok(success(row, "Assignment retrieved successfully"))
}

pub async fn list_by_student(
    State(state): State<AppState>,
    Path(id_student): Path<String>,
) -> Result<Response, AppError> {
    let id_student = validate_uuid(&id_student, "id_student")?;
    let rows = store::event_students::list_by_student(&state.pool, id_student).await?;
    Ok(success_list(rows, "Assignments retrieved successfully"))
}

pub async fn create_event_student(
    State(state): State<AppState>,
    Json(body): Json<CreateEventStudentRequest>,
) -> Result<Response, AppError> {
    let id_event = validate_positive(
        body.id_event
            .ok_or_else(|| AppError::ValidationError("id_event is required".to_string()))?,
        "id_event",
    )?;
    let id_student_raw = body
        .id_student
        .ok_or_else(|| AppError::ValidationError("id_student is required".to_string()))?;
    let id_student = validate_uuid(&id_student_raw, "id_student")?;

    if store::event_students::pair_exists(&state.pool, id_event, id_student, None).await? {
        return Err(AppError::Conflict(
            "This student is already assigned to this event".to_string(),
        ));
    }

    let row = store::event_students::insert(&state.pool, id_event, id_student).await?;
    Ok(created(row, "Assignment created successfully"))
}

pub async fn update_event_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateEventStudentRequest>,
) -> Result<Response, AppError> {
    if body.is_empty() {
        return Err(AppError::ValidationError(
            "At least one of id_event or id_student must be provided".to_string(),
        ));
    }

    let current = store::event_students::get(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assignment with id {} not found", id)))?;

    let id_event = match body.id_event {
        Some(raw) => {
            let id_event = validate_positive(raw, "id_event")?;
            if !store::events::exists(&state.pool, id_event).await? {
                return Err(AppError::NotFound(format!(
                    "Event with id {} not found",
                    id_event
                )));
            }
            Some(id_event)
        }
        None => None,
    };
    let id_student = match body.id_student {
        Some(raw) => Some(validate_uuid(&raw, "id_student")?),
        None => None,
    };

    // The pair after applying the partial change must not collide with a
    // different row.
    let effective_event = id_event.unwrap_or(current.id_event);
    let effective_student = id_student.unwrap_or(current.id_student);
    if store::event_students::pair_exists(&state.pool, effective_event, effective_student, Some(id))
        .await?
    {
        return Err(AppError::Conflict(
            "This student is already assigned to this event".to_string(),
        ));
    }

    let row = store::event_students::update(&state.pool, id, id_event, id_student)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assignment with id {} not found", id)))?;
    Ok(success(row, "Assignment updated successfully"))
}

pub async fn delete_event_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let row = store::event_students::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assignment with id {} not found", id)))?;
    Ok(success(row, "Assignment deleted successfully"))
}
