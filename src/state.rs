use sqlx::PgPool;

use crate::services::AssignmentResolver;

/// Shared request state: the connection pool and the stateless assignment
/// resolver built over it.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub resolver: AssignmentResolver,
}
