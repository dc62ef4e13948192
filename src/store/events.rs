use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::models::{Event, Slot};
use crate::utils::error::AppError;

/// Validated column values for an insert. Defaults are already applied by
/// the handler.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub event_datetime: DateTime<Utc>,
    pub duration_minutes: i32,
    pub description: Option<String>,
    pub report: Option<String>,
    pub event_type: String,
    pub id_creator: Uuid,
    pub id_prom: Option<Uuid>,
    pub location: Option<String>,
    pub slot_duration: i32,
    pub allow_multiple_users: bool,
    pub target_promotions: Option<Vec<Uuid>>,
    pub slots: Vec<Slot>,
}

/// Validated partial update. `None` leaves the column untouched; the nested
/// option on `target_promotions` distinguishes "set to NULL" from a list.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub event_datetime: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub description: Option<String>,
    pub report: Option<String>,
    pub event_type: Option<String>,
    pub id_prom: Option<Uuid>,
    pub location: Option<String>,
    pub slot_duration: Option<i32>,
    pub allow_multiple_users: Option<bool>,
    pub target_promotions: Option<Option<Vec<Uuid>>>,
    pub slots: Option<Vec<Slot>>,
}

pub async fn list(pool: &PgPool) -> Result<Vec<Event>, AppError> {
    let events = sqlx::query_as::<_, Event>("SELECT * FROM event ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(events)
}

pub async fn get(pool: &PgPool, id: i32) -> Result<Option<Event>, AppError> {
    let event = sqlx::query_as::<_, Event>("SELECT * FROM event WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(event)
}

pub async fn list_by_type(pool: &PgPool, event_type: &str) -> Result<Vec<Event>, AppError> {
    let events = sqlx::query_as::<_, Event>(
        "SELECT * FROM event WHERE event_type = $1 ORDER BY created_at DESC",
    )
    .bind(event_type)
    .fetch_all(pool)
    .await?;
    Ok(events)
}

/// Events a student is registered to, newest first.
pub async fn list_by_student(pool: &PgPool, id_student: Uuid) -> Result<Vec<Event>, AppError> {
    let events = sqlx::query_as::<_, Event>(
        "SELECT e.* FROM event e \
         JOIN event_student es ON es.id_event = e.id \
         WHERE es.id_student = $1 \
         ORDER BY e.created_at DESC",
    )
    .bind(id_student)
    .fetch_all(pool)
    .await?;
    Ok(events)
}

/// Agenda view: a student's events in chronological order.
pub async fn agenda_for_student(pool: &PgPool, id_student: Uuid) -> Result<Vec<Event>, AppError> {
    let events = sqlx::query_as::<_, Event>(
        "SELECT e.* FROM event e \
         JOIN event_student es ON es.id_event = e.id \
         WHERE es.id_student = $1 \
         ORDER BY e.event_datetime ASC",
    )
    .bind(id_student)
    .fetch_all(pool)
    .await?;
    Ok(events)
}

/// Creation-time uniqueness over (title, event_datetime, event_type,
/// id_creator).
pub async fn duplicate_exists(
    pool: &PgPool,
    title: &str,
    event_datetime: DateTime<Utc>,
    event_type: &str,
    id_creator: Uuid,
) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS( \
            SELECT 1 FROM event \
            WHERE title = $1 AND event_datetime = $2 AND event_type = $3 AND id_creator = $4 \
         )",
    )
    .bind(title)
    .bind(event_datetime)
    .bind(event_type)
    .bind(id_creator)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Update-time title uniqueness, excluding the row being updated.
pub async fn title_taken(pool: &PgPool, title: &str, exclude_id: i32) -> Result<bool, AppError> {
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM event WHERE title = $1 AND id <> $2)",
    )
    .bind(title)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(taken)
}

pub async fn exists(pool: &PgPool, id: i32) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM event WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

pub async fn insert(pool: &PgPool, new: NewEvent) -> Result<Event, AppError> {
    let event = sqlx::query_as::<_, Event>(
        "INSERT INTO event ( \
            title, event_datetime, duration_minutes, description, report, event_type, \
            id_creator, id_prom, location, slot_duration, allow_multiple_users, \
            target_promotions, slots \
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         RETURNING *",
    )
    .bind(new.title)
    .bind(new.event_datetime)
    .bind(new.duration_minutes)
    .bind(new.description)
    .bind(new.report)
    .bind(new.event_type)
    .bind(new.id_creator)
    .bind(new.id_prom)
    .bind(new.location)
    .bind(new.slot_duration)
    .bind(new.allow_multiple_users)
    .bind(new.target_promotions)
    .bind(Json(new.slots))
    .fetch_one(pool)
    .await?;
    Ok(event)
}

/// Applies the present fields only. Runs inside the caller's transaction so
/// a promotion change and its assignment cleanup commit together.
pub async fn update(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
    changes: EventChanges,
) -> Result<Option<Event>, AppError> {
    let mut builder = QueryBuilder::<Postgres>::new("UPDATE event SET updated_at = now()");

    if let Some(title) = changes.title {
        builder.push(", title = ").push_bind(title);
    }
    if let Some(event_datetime) = changes.event_datetime {
        builder.push(", event_datetime = ").push_bind(event_datetime);
    }
    if let Some(duration_minutes) = changes.duration_minutes {
        builder
            .push(", duration_minutes = ")
            .push_bind(duration_minutes);
    }
    if let Some(description) = changes.description {
        builder.push(", description = ").push_bind(description);
    }
    if let Some(report) = changes.report {
        builder.push(", report = ").push_bind(report);
    }
    if let Some(event_type) = changes.event_type {
        builder.push(", event_type = ").push_bind(event_type);
    }
    if let Some(id_prom) = changes.id_prom {
        builder.push(", id_prom = ").push_bind(id_prom);
    }
    if let Some(location) = changes.location {
        builder.push(", location = ").push_bind(location);
    }
    if let Some(slot_duration) = changes.slot_duration {
        builder.push(", slot_duration = ").push_bind(slot_duration);
    }
    if let Some(allow_multiple_users) = changes.allow_multiple_users {
        builder
            .push(", allow_multiple_users = ")
            .push_bind(allow_multiple_users);
    }
    if let Some(target_promotions) = changes.target_promotions {
        builder
            .push(", target_promotions = ")
            .push_bind(target_promotions);
    }
    if let Some(slots) = changes.slots {
        builder.push(", slots = ").push_bind(Json(slots));
    }

    builder.push(" WHERE id = ").push_bind(id);
    builder.push(" RETURNING *");

    let event = builder
        .build_query_as::<Event>()
        .fetch_optional(&mut **tx)
        .await?;
    Ok(event)
}

/// Deletes the event and its assignments in one transaction, returning the
/// deleted snapshot.
pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<Event>, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM event_student WHERE id_event = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let event = sqlx::query_as::<_, Event>("DELETE FROM event WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(event)
}

/// Locks the event row for a slot mutation.
pub async fn get_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
) -> Result<Option<Event>, AppError> {
    let event = sqlx::query_as::<_, Event>("SELECT * FROM event WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(event)
}

pub async fn save_slots(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
    slots: &[Slot],
) -> Result<(), AppError> {
    sqlx::query("UPDATE event SET slots = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(Json(slots.to_vec()))
        .execute(&mut **tx)
        .await?;
    Ok(())
}
