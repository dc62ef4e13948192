use thiserror::Error;
use uuid::Uuid;

use crate::models::Slot;
use crate::utils::error::AppError;

/// Pure register/unregister rules over an event's slot list. Persistence
/// and row locking live in the handler; this module only mutates the
/// in-memory list.
#[derive(Debug, Error, PartialEq)]
pub enum SlotBookingError {
    #[error("Slot index out of range")]
    SlotNotFound,

    #[error("Slot is already at full capacity")]
    SlotFull,

    #[error("Student already occupies a slot of this event")]
    AlreadyBooked,

    #[error("Student does not occupy this slot")]
    NotOccupant,
}

impl From<SlotBookingError> for AppError {
    fn from(e: SlotBookingError) -> Self {
        match e {
            SlotBookingError::SlotNotFound => AppError::NotFound(e.to_string()),
            SlotBookingError::SlotFull | SlotBookingError::AlreadyBooked => {
                AppError::Conflict(e.to_string())
            }
            SlotBookingError::NotOccupant => AppError::Forbidden(e.to_string()),
        }
    }
}

/// A student holds at most one slot per event, and a slot never exceeds its
/// effective capacity.
pub fn register(
    slots: &mut [Slot],
    index: usize,
    student: Uuid,
    allow_multiple_users: bool,
) -> Result<(), SlotBookingError> {
    if index >= slots.len() {
        return Err(SlotBookingError::SlotNotFound);
    }
    if slots.iter().any(|slot| slot.is_occupied_by(student)) {
        return Err(SlotBookingError::AlreadyBooked);
    }

    let slot = &mut slots[index];
    if slot.users.len() >= slot.effective_capacity(allow_multiple_users) {
        return Err(SlotBookingError::SlotFull);
    }

    slot.users.push(student);
    Ok(())
}

pub fn unregister(
    slots: &mut [Slot],
    index: usize,
    student: Uuid,
) -> Result<(), SlotBookingError> {
    if index >= slots.len() {
        return Err(SlotBookingError::SlotNotFound);
    }

    let slot = &mut slots[index];
    if !slot.is_occupied_by(student) {
        return Err(SlotBookingError::NotOccupant);
    }

    slot.users.retain(|occupant| *occupant != student);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(specs: &[(i32, &[Uuid])]) -> Vec<Slot> {
        specs
            .iter()
            .map(|(max_users, users)| Slot {
                max_users: *max_users,
                users: users.to_vec(),
            })
            .collect()
    }

    #[test]
    fn first_registration_succeeds() {
        let student = Uuid::new_v4();
        let mut list = slots(&[(1, &[])]);

        assert_eq!(register(&mut list, 0, student, false), Ok(()));
        assert_eq!(list[0].users, vec![student]);
    }

    #[test]
    fn second_student_on_full_slot_conflicts() {
        let occupant = Uuid::new_v4();
        let newcomer = Uuid::new_v4();
        let mut list = slots(&[(1, &[occupant])]);

        assert_eq!(
            register(&mut list, 0, newcomer, false),
            Err(SlotBookingError::SlotFull)
        );
    }

    #[test]
    fn capacity_is_honoured_when_multiple_users_allowed() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let third = Uuid::new_v4();
        let mut list = slots(&[(2, &[])]);

        assert_eq!(register(&mut list, 0, first, true), Ok(()));
        assert_eq!(register(&mut list, 0, second, true), Ok(()));
        assert_eq!(
            register(&mut list, 0, third, true),
            Err(SlotBookingError::SlotFull)
        );
    }

    #[test]
    fn multi_user_slot_still_caps_at_one_when_disallowed() {
        let occupant = Uuid::new_v4();
        let newcomer = Uuid::new_v4();
        let mut list = slots(&[(5, &[occupant])]);

        assert_eq!(
            register(&mut list, 0, newcomer, false),
            Err(SlotBookingError::SlotFull)
        );
    }

    #[test]
    fn student_holds_at_most_one_slot_per_event() {
        let student = Uuid::new_v4();
        let mut list = slots(&[(1, &[student]), (1, &[])]);

        assert_eq!(
            register(&mut list, 1, student, false),
            Err(SlotBookingError::AlreadyBooked)
        );
    }

    #[test]
    fn out_of_range_index_is_not_found() {
        let student = Uuid::new_v4();
        let mut list = slots(&[(1, &[])]);

        assert_eq!(
            register(&mut list, 3, student, false),
            Err(SlotBookingError::SlotNotFound)
        );
        assert_eq!(
            unregister(&mut list, 3, student),
            Err(SlotBookingError::SlotNotFound)
        );
    }

    #[test]
    fn unregister_requires_occupancy() {
        let occupant = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let mut list = slots(&[(1, &[occupant])]);

        assert_eq!(
            unregister(&mut list, 0, stranger),
            Err(SlotBookingError::NotOccupant)
        );

        assert_eq!(unregister(&mut list, 0, occupant), Ok(()));
        assert!(list[0].users.is_empty());
    }

    #[test]
    fn booking_errors_map_to_http_kinds() {
        use axum::http::StatusCode;

        assert_eq!(
            AppError::from(SlotBookingError::SlotNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(SlotBookingError::SlotFull).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(SlotBookingError::AlreadyBooked).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(SlotBookingError::NotOccupant).status_code(),
            StatusCode::FORBIDDEN
        );
    }
}
