// RSVP admission policy
//
// The capacity decision is pure so it can be checked exhaustively; the
// storage layer applies it inside the revision-guarded transaction and
// owns the retry loop.

use crate::error::{AppError, Result};

/// How many revision-guarded RSVP attempts are made before the operation
/// is reported as failed. A retry is only spent when another
/// capacity-affecting commit intervened, so an attempt budget above the
/// typical event capacity is effectively never exhausted.
pub const RSVP_MAX_ATTEMPTS: u32 = 10;

/// Decide whether one more participant fits the event.
///
/// `max_participants` of `None` means unlimited. `current` is the number
/// of committed participants observed under the event's current revision.
pub fn check(max_participants: Option<i32>, current: i64) -> Result<()> {
    match max_participants {
        Some(cap) if current >= i64::from(cap) => Err(AppError::conflict("event is full")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_always_admits() {
        assert!(check(None, 0).is_ok());
        assert!(check(None, 10_000).is_ok());
    }

    #[test]
    fn test_under_capacity_admits() {
        assert!(check(Some(2), 0).is_ok());
        assert!(check(Some(2), 1).is_ok());
    }

    #[test]
    fn test_at_capacity_rejects() {
        let err = check(Some(2), 2).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.to_string(), "event is full");
    }

    #[test]
    fn test_over_capacity_rejects() {
        // Over-capacity only arises from pre-existing data; still rejected
        assert!(check(Some(2), 3).is_err());
    }

    #[test]
    fn test_capacity_one() {
        assert!(check(Some(1), 0).is_ok());
        assert!(check(Some(1), 1).is_err());
    }
}
