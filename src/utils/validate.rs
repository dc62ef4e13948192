use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::models::EVENT_TYPES;
use crate::utils::error::AppError;

/// Wire datetime format: ISO-8601 with exactly millisecond precision and a
/// literal `Z`. Any other valid ISO-8601 variant is rejected.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Accepts the RFC-4122 hyphenated textual form, versions 1 through 5,
/// case-insensitive.
pub fn validate_uuid(value: &str, field: &str) -> Result<Uuid, AppError> {
    let shape_ok = value.len() == 36
        && value
            .char_indices()
            .all(|(i, c)| match i {
                8 | 13 | 18 | 23 => c == '-',
                _ => c.is_ascii_hexdigit(),
            });

    let parsed = if shape_ok { Uuid::parse_str(value).ok() } else { None };

    match parsed {
        Some(uuid) if (1..=5).contains(&uuid.get_version_num()) => Ok(uuid),
        _ => Err(AppError::ValidationError(format!(
            "{} must be a valid UUID",
            field
        ))),
    }
}

pub fn validate_datetime(value: &str, field: &str) -> Result<DateTime<Utc>, AppError> {
    // chrono alone is too lenient (it accepts non-padded components), so the
    // exact character shape is anchored first.
    let shape_ok = value.len() == 24
        && value.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            10 => c == 'T',
            13 | 16 => c == ':',
            19 => c == '.',
            23 => c == 'Z',
            _ => c.is_ascii_digit(),
        });

    let parsed = if shape_ok {
        NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).ok()
    } else {
        None
    };

    parsed
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
        .ok_or_else(|| {
            AppError::ValidationError(format!(
                "{} must be an ISO-8601 datetime of the form YYYY-MM-DDTHH:mm:ss.sssZ",
                field
            ))
        })
}

pub fn validate_event_type(value: &str) -> Result<(), AppError> {
    if EVENT_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "event_type must be one of: {}",
            EVENT_TYPES.join(", ")
        )))
    }
}

pub fn validate_positive(value: i64, field: &str) -> Result<i32, AppError> {
    if value > 0 && value <= i32::MAX as i64 {
        Ok(value as i32)
    } else {
        Err(AppError::ValidationError(format!(
            "{} must be a positive integer",
            field
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_accepts_rfc4122_form() {
        assert!(validate_uuid("06f5fc8f-b654-4571-a1c4-131491b7b8d9", "id").is_ok());
        // Case-insensitive
        assert!(validate_uuid("06F5FC8F-B654-4571-A1C4-131491B7B8D9", "id").is_ok());
    }

    #[test]
    fn uuid_rejects_malformed_input() {
        assert!(validate_uuid("badidformat123", "id").is_err());
        assert!(validate_uuid("", "id").is_err());
        // Simple (unhyphenated) form is not the RFC textual form
        assert!(validate_uuid("06f5fc8fb6544571a1c4131491b7b8d9", "id").is_err());
        // Nil UUID has version 0
        assert!(validate_uuid("00000000-0000-0000-0000-000000000000", "id").is_err());
    }

    #[test]
    fn datetime_accepts_millisecond_z_form_only() {
        assert!(validate_datetime("2025-07-29T16:15:15.000Z", "event_datetime").is_ok());

        assert!(validate_datetime("2025-07-29 16:15:15+00", "event_datetime").is_err());
        assert!(validate_datetime("2025-07-29T16:15:15Z", "event_datetime").is_err());
        assert!(validate_datetime("2025-07-29T16:15:15.000+00:00", "event_datetime").is_err());
        assert!(validate_datetime("2025-07-29T16:15:15.000", "event_datetime").is_err());
    }

    #[test]
    fn datetime_requires_zero_padded_components() {
        assert!(validate_datetime("2025-7-29T16:15:15.000Z", "event_datetime").is_err());
        assert!(validate_datetime("2025-07-9T16:15:15.000Z", "event_datetime").is_err());
        assert!(validate_datetime("2025-07-29T6:15:15.000Z", "event_datetime").is_err());
        assert!(validate_datetime("2025-07-29T16:15:15.00Z", "event_datetime").is_err());
    }

    #[test]
    fn datetime_parses_to_utc() {
        let parsed = validate_datetime("2025-07-29T16:15:15.250Z", "event_datetime").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn event_type_is_a_closed_set() {
        for kind in EVENT_TYPES {
            assert!(validate_event_type(kind).is_ok());
        }
        assert!(validate_event_type("party").is_err());
        assert!(validate_event_type("Follow-up").is_err());
    }

    #[test]
    fn positive_integer_bounds() {
        assert_eq!(validate_positive(30, "slot_duration").unwrap(), 30);
        assert!(validate_positive(0, "duration_minutes").is_err());
        assert!(validate_positive(-5, "duration_minutes").is_err());
        assert!(validate_positive(i64::MAX, "duration_minutes").is_err());
    }

    #[test]
    fn row_ids_beyond_i32_are_rejected_not_truncated() {
        // 4294967299 would wrap to 3 under a plain `as i32` cast.
        assert!(validate_positive(4_294_967_299, "id_event").is_err());
        assert!(validate_positive(i32::MAX as i64 + 1, "id_event").is_err());
        assert_eq!(validate_positive(3, "id_event").unwrap(), 3);
    }
}
