use sqlx::PgPool;
use uuid::Uuid;

use crate::models::StudentRecord;
use crate::services::profile::ProfileClient;
use crate::store;
use crate::utils::caller::Caller;
use crate::utils::error::AppError;

/// Reconciles an event's intended student population with the
/// `event_student` table.
///
/// `targets = None` means every active student, an empty list means no one,
/// a non-empty list means the listed promotions. A fetch failure for one
/// promotion never blocks the others, and the final insert ignores pairs
/// that already exist, so re-running the resolver is idempotent.
#[derive(Clone)]
pub struct AssignmentResolver {
    pool: PgPool,
    profiles: ProfileClient,
}

impl AssignmentResolver {
    pub fn new(pool: PgPool, profiles: ProfileClient) -> Self {
        Self { pool, profiles }
    }

    /// Returns the number of newly inserted assignments.
    pub async fn resolve(
        &self,
        id_event: i32,
        targets: Option<&[Uuid]>,
        caller: &Caller,
    ) -> Result<u64, AppError> {
        let records = match targets {
            None => self.profiles.active_students(caller).await?,
            Some(promotions) if promotions.is_empty() => return Ok(0),
            Some(promotions) => {
                let mut all = Vec::new();
                for &promotion in promotions {
                    match self.profiles.promotion_students(promotion, caller).await {
                        Ok(mut roster) => all.append(&mut roster),
                        Err(e) => {
                            tracing::warn!(%promotion, id_event, error = %e, "Skipping promotion after roster fetch failure");
                        }
                    }
                }
                all
            }
        };

        let (mut identities, deferred) = split_identities(records);
        for id_profile in deferred {
            match self.profiles.profile_user_id(id_profile, caller).await {
                Ok(Some(id_student)) => identities.push(id_student),
                Ok(None) => {
                    tracing::warn!(%id_profile, id_event, "Dropping roster entry with unresolvable profile");
                }
                Err(e) => {
                    tracing::warn!(%id_profile, id_event, error = %e, "Dropping roster entry after profile lookup failure");
                }
            }
        }

        if identities.is_empty() {
            return Ok(0);
        }

        store::event_students::insert_many(&self.pool, id_event, &identities).await
    }

    /// Post-write hook for event create/update: resolution failures are
    /// logged, never propagated, so the triggering write still succeeds
    /// even when the profile service is degraded.
    pub async fn resolve_after_write(
        &self,
        id_event: i32,
        targets: Option<&[Uuid]>,
        caller: &Caller,
    ) {
        match self.resolve(id_event, targets, caller).await {
            Ok(inserted) => {
                tracing::info!(id_event, inserted, "Assignment resolution complete");
            }
            Err(e) => {
                tracing::error!(id_event, error = %e, "Assignment resolution failed");
            }
        }
    }
}

/// Splits roster records into directly usable identities and profile
/// references needing a secondary lookup. Records carrying neither are
/// dropped here.
fn split_identities(records: Vec<StudentRecord>) -> (Vec<Uuid>, Vec<Uuid>) {
    let mut identities = Vec::new();
    let mut deferred = Vec::new();

    for record in records {
        if let Some(id_student) = record.id {
            identities.push(id_student);
        } else if let Some(id_profile) = record.id_profile {
            deferred.push(id_profile);
        } else {
            tracing::warn!("Dropping roster entry without id or profile reference");
        }
    }

    (identities, deferred)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: Option<Uuid>, id_profile: Option<Uuid>) -> StudentRecord {
        StudentRecord { id, id_profile }
    }

    #[test]
    fn direct_identity_is_preferred_over_profile_lookup() {
        let id_student = Uuid::new_v4();
        let id_profile = Uuid::new_v4();

        let (identities, deferred) =
            split_identities(vec![record(Some(id_student), Some(id_profile))]);
        assert_eq!(identities, vec![id_student]);
        assert!(deferred.is_empty());
    }

    #[test]
    fn profile_only_records_are_deferred() {
        let id_profile = Uuid::new_v4();

        let (identities, deferred) = split_identities(vec![record(None, Some(id_profile))]);
        assert!(identities.is_empty());
        assert_eq!(deferred, vec![id_profile]);
    }

    #[test]
    fn records_without_any_identity_are_dropped() {
        let (identities, deferred) = split_identities(vec![record(None, None)]);
        assert!(identities.is_empty());
        assert!(deferred.is_empty());
    }
}
