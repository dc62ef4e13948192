use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::services::slots;
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;
use crate::utils::response::success;
use crate::utils::validate::validate_uuid;

#[derive(Debug, Deserialize)]
pub struct SlotActionRequest {
    pub id_student: Option<String>,
}

/// Books one slot for a student. The event row is locked for the duration
/// of the read-modify-write so concurrent registrations cannot overbook.
pub async fn register_slot(
    State(state): State<AppState>,
    Path((id, slot_index)): Path<(i32, usize)>,
    Json(body): Json<SlotActionRequest>,
) -> Result<Response, AppError> {
    let id_student = required_student(&body)?;

    let mut tx = state.pool.begin().await?;
    let event = store::events::get_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event with id {} not found", id)))?;

    let mut slot_list = event.slots.0;
    slots::register(
        &mut slot_list,
        slot_index,
        id_student,
        event.allow_multiple_users,
    )?;

    store::events::save_slots(&mut tx, id, &slot_list).await?;
    tx.commit().await?;

    Ok(success(slot_list, "Slot registered successfully"))
}

pub async fn unregister_slot(
    State(state): State<AppState>,
    Path((id, slot_index)): Path<(i32, usize)>,
    Json(body): Json<SlotActionRequest>,
) -> Result<Response, AppError> {
    let id_student = required_student(&body)?;

    let mut tx = state.pool.begin().await?;
    let event = store::events::get_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event with id {} not found", id)))?;

    let mut slot_list = event.slots.0;
    slots::unregister(&mut slot_list, slot_index, id_student)?;

    store::events::save_slots(&mut tx, id, &slot_list).await?;
    tx.commit().await?;

    Ok(success(slot_list, "Slot released successfully"))
}

fn required_student(body: &SlotActionRequest) -> Result<uuid::Uuid, AppError> {
    let raw = body
        .id_student
        .as_deref()
        .ok_or_else(|| AppError::ValidationError("id_student is required".to_string()))?;
    validate_uuid(raw, "id_student")
}
