use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::EventStudent;
use crate::utils::error::AppError;

pub async fn list(pool: &PgPool) -> Result<Vec<EventStudent>, AppError> {
    let rows =
        sqlx::query_as::<_, EventStudent>("SELECT * FROM event_student ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

pub async fn get(pool: &PgPool, id: i32) -> Result<Option<EventStudent>, AppError> {
    let row = sqlx::query_as::<_, EventStudent>("SELECT * FROM event_student WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list_by_student(
    pool: &PgPool,
    id_student: Uuid,
) -> Result<Vec<EventStudent>, AppError> {
    let rows = sqlx::query_as::<_, EventStudent>(
        "SELECT * FROM event_student WHERE id_student = $1 ORDER BY created_at DESC",
    )
    .bind(id_student)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_by_event(pool: &PgPool, id_event: i32) -> Result<Vec<EventStudent>, AppError> {
    let rows = sqlx::query_as::<_, EventStudent>(
        "SELECT * FROM event_student WHERE id_event = $1 ORDER BY created_at DESC",
    )
    .bind(id_event)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// True when (id_event, id_student) already belongs to a row other than
/// `exclude_id`.
pub async fn pair_exists(
    pool: &PgPool,
    id_event: i32,
    id_student: Uuid,
    exclude_id: Option<i32>,
) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS( \
            SELECT 1 FROM event_student \
            WHERE id_event = $1 AND id_student = $2 AND ($3::int IS NULL OR id <> $3) \
         )",
    )
    .bind(id_event)
    .bind(id_student)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn insert(
    pool: &PgPool,
    id_event: i32,
    id_student: Uuid,
) -> Result<EventStudent, AppError> {
    let row = sqlx::query_as::<_, EventStudent>(
        "INSERT INTO event_student (id_event, id_student) VALUES ($1, $2) RETURNING *",
    )
    .bind(id_event)
    .bind(id_student)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Idempotent bulk insert: pairs that already exist are skipped by the
/// unique constraint, in a single statement. Returns the number of rows
/// actually inserted.
pub async fn insert_many(
    pool: &PgPool,
    id_event: i32,
    students: &[Uuid],
) -> Result<u64, AppError> {
    let result = sqlx::query(
        "INSERT INTO event_student (id_event, id_student) \
         SELECT $1, unnest($2::uuid[]) \
         ON CONFLICT (id_event, id_student) DO NOTHING",
    )
    .bind(id_event)
    .bind(students)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    id_event: Option<i32>,
    id_student: Option<Uuid>,
) -> Result<Option<EventStudent>, AppError> {
    let row = sqlx::query_as::<_, EventStudent>(
        "UPDATE event_student SET \
            id_event = COALESCE($2, id_event), \
            id_student = COALESCE($3, id_student), \
            updated_at = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(id_event)
    .bind(id_student)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<EventStudent>, AppError> {
    let row =
        sqlx::query_as::<_, EventStudent>("DELETE FROM event_student WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

/// Cascade step for event deletion and promotion changes; runs inside the
/// caller's transaction.
pub async fn delete_for_event(
    tx: &mut Transaction<'_, Postgres>,
    id_event: i32,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM event_student WHERE id_event = $1")
        .bind(id_event)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected())
}
