use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// The five event kinds the API accepts, as wire literals.
pub const EVENT_TYPES: [&str; 5] = ["follow-up", "kick-off", "keynote", "hub-talk", "other"];

pub const DEFAULT_SLOT_DURATION: i32 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i32,
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
    pub slots: Json<Vec<Slot>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A bookable sub-unit of an event. Occupants are kept as a single list
/// bounded by `max_users`; the legacy single-occupant `user` field and the
/// `currentUsers` counter are derived on the wire from that list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SlotWire", into = "SlotWire")]
pub struct Slot {
    pub max_users: i32,
    pub users: Vec<Uuid>,
}

impl Slot {
    pub fn new(max_users: i32) -> Self {
        Self {
            max_users: max_users.max(1),
            users: Vec::new(),
        }
    }

    /// Capacity actually enforced at registration time. Events that do not
    /// allow multiple users per slot behave as capacity-1 regardless of
    /// what `max_users` says.
    pub fn effective_capacity(&self, allow_multiple_users: bool) -> usize {
        if allow_multiple_users {
            self.max_users.max(1) as usize
        } else {
            1
        }
    }

    pub fn is_occupied_by(&self, student: Uuid) -> bool {
        self.users.contains(&student)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlotWire {
    #[serde(default = "default_slot_capacity")]
    max_users: i32,
    #[serde(default)]
    current_users: usize,
    #[serde(default)]
    user: Option<Uuid>,
    #[serde(default)]
    users: Vec<Uuid>,
}

fn default_slot_capacity() -> i32 {
    1
}

impl From<SlotWire> for Slot {
    fn from(wire: SlotWire) -> Self {
        // Accept both storage generations: a populated `users` list wins,
        // otherwise a legacy single `user` seeds the list.
        let users = if !wire.users.is_empty() {
            wire.users
        } else if let Some(user) = wire.user {
            vec![user]
        } else {
            Vec::new()
        };

        Self {
            max_users: wire.max_users.max(1),
            users,
        }
    }
}

impl From<Slot> for SlotWire {
    fn from(slot: Slot) -> Self {
        Self {
            max_users: slot.max_users,
            current_users: slot.users.len(),
            user: slot.users.first().copied(),
            users: slot.users,
        }
    }
}

/// Body of `POST /events`. Required fields are modelled as `Option` so that
/// missing ones surface as a 400 with the API envelope instead of a bare
/// deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub event_datetime: Option<String>,
    pub duration_minutes: Option<i64>,
    pub description: Option<String>,
    pub report: Option<String>,
    pub event_type: Option<String>,
    pub id_creator: Option<String>,
    pub id_prom: Option<Uuid>,
    pub location: Option<String>,
    pub slot_duration: Option<i64>,
    pub allow_multiple_users: Option<bool>,
    /// Tri-state: key absent means no assignment, `null` means every active
    /// student, a list means the listed promotions.
    #[serde(default, deserialize_with = "deserialize_tristate")]
    pub target_promotions: Option<Option<Vec<Uuid>>>,
    pub slots: Option<Vec<Slot>>,
}

/// Body of `PATCH /events/:id`. Every field optional; omitted fields keep
/// their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub event_datetime: Option<String>,
    pub duration_minutes: Option<i64>,
    pub description: Option<String>,
    pub report: Option<String>,
    pub event_type: Option<String>,
    pub id_prom: Option<Uuid>,
    pub location: Option<String>,
    pub slot_duration: Option<i64>,
    pub allow_multiple_users: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_tristate")]
    pub target_promotions: Option<Option<Vec<Uuid>>>,
    pub slots: Option<Vec<Slot>>,
}

impl UpdateEventRequest {
    /// True when the body carries no recognized field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.event_datetime.is_none()
            && self.duration_minutes.is_none()
            && self.description.is_none()
            && self.report.is_none()
            && self.event_type.is_none()
            && self.id_prom.is_none()
            && self.location.is_none()
            && self.slot_duration.is_none()
            && self.allow_multiple_users.is_none()
            && self.target_promotions.is_none()
            && self.slots.is_none()
    }
}

/// Distinguishes an absent key (`None`) from an explicit `null`
/// (`Some(None)`) and a list (`Some(Some(vec))`).
fn deserialize_tristate<'de, D>(deserializer: D) -> Result<Option<Option<Vec<Uuid>>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Vec<Uuid>>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_wire_defaults_to_single_capacity() {
        let slot: Slot = serde_json::from_str("{}").unwrap();
        assert_eq!(slot.max_users, 1);
        assert!(slot.users.is_empty());
    }

    #[test]
    fn slot_wire_accepts_legacy_single_user() {
        let id = Uuid::new_v4();
        let slot: Slot =
            serde_json::from_value(serde_json::json!({ "maxUsers": 3, "user": id })).unwrap();
        assert_eq!(slot.users, vec![id]);
        assert_eq!(slot.max_users, 3);
    }

    #[test]
    fn slot_serializes_derived_fields() {
        let id = Uuid::new_v4();
        let slot = Slot {
            max_users: 2,
            users: vec![id],
        };
        let value = serde_json::to_value(slot).unwrap();
        assert_eq!(value["currentUsers"], 1);
        assert_eq!(value["user"], serde_json::json!(id));
        assert_eq!(value["maxUsers"], 2);
    }

    #[test]
    fn effective_capacity_is_one_when_multiple_users_disallowed() {
        let slot = Slot::new(5);
        assert_eq!(slot.effective_capacity(false), 1);
        assert_eq!(slot.effective_capacity(true), 5);
    }

    #[test]
    fn target_promotions_tristate() {
        let absent: UpdateEventRequest = serde_json::from_str(r#"{"title":"t"}"#).unwrap();
        assert_eq!(absent.target_promotions, None);

        let null: UpdateEventRequest =
            serde_json::from_str(r#"{"target_promotions":null}"#).unwrap();
        assert_eq!(null.target_promotions, Some(None));

        let listed: UpdateEventRequest = serde_json::from_str(
            r#"{"target_promotions":["06f5fc8f-b654-4571-a1c4-131491b7b8d9"]}"#,
        )
        .unwrap();
        assert_eq!(
            listed
                .target_promotions
                .as_ref()
                .and_then(|p| p.as_ref())
                .map(Vec::len),
            Some(1)
        );
    }

    #[test]
    fn empty_update_body_is_detected() {
        let body: UpdateEventRequest = serde_json::from_str("{}").unwrap();
        assert!(body.is_empty());

        let body: UpdateEventRequest =
            serde_json::from_str(r#"{"target_promotions":null}"#).unwrap();
        assert!(!body.is_empty());
    }
}
