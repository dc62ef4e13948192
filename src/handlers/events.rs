use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;

use crate::models::event::DEFAULT_SLOT_DURATION;
use crate::models::{CreateEventRequest, UpdateEventRequest};
use crate::state::AppState;
use crate::store;
use crate::store::events::{EventChanges, NewEvent};
use crate::utils::caller::Caller;
use crate::utils::error::AppError;
use crate::utils::response::{created, success, success_list};
use crate::utils::validate::{
    validate_datetime, validate_event_type, validate_positive, validate_uuid,
};

pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = store::events::list(&state.pool).await?;
    Ok(success_list(events, "Events retrieved successfully"))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let event = store::events::get(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event with id {} not found", id)))?;
    Ok(success(event, "Event retrieved successfully"))
}

pub async fn get_events_by_type(
    State(state): State<AppState>,
    Path(event_type): Path<String>,
) -> Result<Response, AppError> {
    validate_event_type(&event_type)?;
    let events = store::events::list_by_type(&state.pool, &event_type).await?;
    Ok(success_list(events, "Events retrieved successfully"))
}

pub async fn get_events_by_student(
    State(state): State<AppState>,
    Path(id_student): Path<String>,
) -> Result<Response, AppError> {
    let id_student = validate_uuid(&id_student, "id_student")?;
    let events = store::events::list_by_student(&state.pool, id_student).await?;
    Ok(success_list(events, "Events retrieved successfully"))
}

pub async fn get_event_students(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    if !store::events::exists(&state.pool, id).await? {
        return Err(AppError::NotFound(format!(
            "Event with id {} not found",
            id
        )));
    }

    let registrations = store::event_students::list_by_event(&state.pool, id).await?;
    let message = if registrations.is_empty() {
        "No students registered for this event"
    } else {
        "Students retrieved successfully"
    };
    Ok(success_list(registrations, message))
}

pub async fn create_event(
    State(state): State<AppState>,
    caller: Caller,
    Json(body): Json<CreateEventRequest>,
) -> Result<Response, AppError> {
    let title = body
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::ValidationError("title is required".to_string()))?
        .to_string();
    let event_datetime_raw = body
        .event_datetime
        .ok_or_else(|| AppError::ValidationError("event_datetime is required".to_string()))?;
    let duration_raw = body
        .duration_minutes
        .ok_or_else(|| AppError::ValidationError("duration_minutes is required".to_string()))?;
    let event_type = body
        .event_type
        .ok_or_else(|| AppError::ValidationError("event_type is required".to_string()))?;
    let id_creator_raw = body
        .id_creator
        .ok_or_else(|| AppError::ValidationError("id_creator is required".to_string()))?;

    let event_datetime = validate_datetime(&event_datetime_raw, "event_datetime")?;
    let duration_minutes = validate_positive(duration_raw, "duration_minutes")?;
    validate_event_type(&event_type)?;
    let id_creator = validate_uuid(&id_creator_raw, "id_creator")?;
    let slot_duration = match body.slot_duration {
        Some(value) => validate_positive(value, "slot_duration")?,
        None => DEFAULT_SLOT_DURATION,
    };

    if store::events::duplicate_exists(&state.pool, &title, event_datetime, &event_type, id_creator)
        .await?
    {
        return Err(AppError::Conflict(
            "An event with the same title, datetime, type and creator already exists".to_string(),
        ));
    }

    let event = store::events::insert(
        &state.pool,
        NewEvent {
            title,
            event_datetime,
            duration_minutes,
            description: body.description,
            report: body.report,
            event_type,
            id_creator,
            id_prom: body.id_prom,
            location: body.location,
            slot_duration,
            allow_multiple_users: body.allow_multiple_users.unwrap_or(false),
            target_promotions: body.target_promotions.clone().flatten(),
            slots: body.slots.unwrap_or_default(),
        },
    )
    .await?;

    // Pass the population descriptor through exactly as given: an absent key
    // skips resolution, null targets every active student.
    if let Some(targets) = body.target_promotions {
        state
            .resolver
            .resolve_after_write(event.id, targets.as_deref(), &caller)
            .await;
    }

    Ok(created(event, "Event created successfully"))
}

pub async fn update_event(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
    Json(body): Json<UpdateEventRequest>,
) -> Result<Response, AppError> {
    if body.is_empty() {
        return Err(AppError::ValidationError(
            "At least one field must be provided".to_string(),
        ));
    }

    let mut changes = EventChanges::default();

    if let Some(title) = body.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::ValidationError(
                "title must not be empty".to_string(),
            ));
        }
        if store::events::title_taken(&state.pool, &title, id).await? {
            return Err(AppError::Conflict(
                "An event with this title already exists".to_string(),
            ));
        }
        changes.title = Some(title);
    }
    if let Some(raw) = body.event_datetime {
        changes.event_datetime = Some(validate_datetime(&raw, "event_datetime")?);
    }
    if let Some(raw) = body.duration_minutes {
        changes.duration_minutes = Some(validate_positive(raw, "duration_minutes")?);
    }
    if let Some(event_type) = body.event_type {
        validate_event_type(&event_type)?;
        changes.event_type = Some(event_type);
    }
    if let Some(raw) = body.slot_duration {
        changes.slot_duration = Some(validate_positive(raw, "slot_duration")?);
    }
    changes.description = body.description;
    changes.report = body.report;
    changes.id_prom = body.id_prom;
    changes.location = body.location;
    changes.allow_multiple_users = body.allow_multiple_users;
    changes.slots = body.slots;

    // Presence of the key (even as null) rewires the target population:
    // existing assignments are dropped with the update and the resolver
    // re-runs with the new descriptor.
    let retarget = body.target_promotions;
    changes.target_promotions = retarget.clone();

    let mut tx = state.pool.begin().await?;
    let event = store::events::update(&mut tx, id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event with id {} not found", id)))?;
    if retarget.is_some() {
        store::event_students::delete_for_event(&mut tx, id).await?;
    }
    tx.commit().await?;

    if let Some(targets) = retarget {
        state
            .resolver
            .resolve_after_write(id, targets.as_deref(), &caller)
            .await;
    }

    Ok(success(event, "Event updated successfully"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let event = store::events::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event with id {} not found", id)))?;
    Ok(success(event, "Event deleted successfully"))
}
