//! Staff scheduling constants and the date-window overlap predicate.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the repository layer and any future CLI or reporting tooling.

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Assignment roles
// ---------------------------------------------------------------------------

/// Staff member leads the departure end to end.
pub const ROLE_TOUR_LEADER: &str = "tour_leader";

/// Local guide attached to the departure.
pub const ROLE_TOUR_GUIDE: &str = "tour_guide";

/// Driver for the departure's road transport.
pub const ROLE_DRIVER: &str = "driver";

/// General-purpose assistant.
pub const ROLE_ASSISTANT: &str = "assistant";

/// Back-office coordinator responsible for the departure.
pub const ROLE_COORDINATOR: &str = "coordinator";

/// All valid assignment roles.
pub const VALID_ROLES: &[&str] = &[
    ROLE_TOUR_LEADER,
    ROLE_TOUR_GUIDE,
    ROLE_DRIVER,
    ROLE_ASSISTANT,
    ROLE_COORDINATOR,
];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Departure statuses
// ---------------------------------------------------------------------------

pub const DEPARTURE_SCHEDULED: &str = "scheduled";
pub const DEPARTURE_CONFIRMED: &str = "confirmed";
pub const DEPARTURE_IN_PROGRESS: &str = "in_progress";
pub const DEPARTURE_COMPLETED: &str = "completed";
pub const DEPARTURE_CANCELLED: &str = "cancelled";

/// All valid departure statuses.
pub const VALID_DEPARTURE_STATUSES: &[&str] = &[
    DEPARTURE_SCHEDULED,
    DEPARTURE_CONFIRMED,
    DEPARTURE_IN_PROGRESS,
    DEPARTURE_COMPLETED,
    DEPARTURE_CANCELLED,
];

/// Departure statuses whose assignments do not block a staff member.
///
/// A cancelled or completed departure no longer occupies its staff, so its
/// assignments are exempt from the no-overlap invariant.
pub const OVERLAP_EXEMPT_STATUSES: &[&str] = &[DEPARTURE_CANCELLED, DEPARTURE_COMPLETED];

/// Validate that a departure status string is one of the accepted values.
pub fn validate_departure_status(status: &str) -> Result<(), String> {
    if VALID_DEPARTURE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid departure status '{status}'. Must be one of: {}",
            VALID_DEPARTURE_STATUSES.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Date-window overlap
// ---------------------------------------------------------------------------

/// Check whether two closed date intervals `[a_start, a_end]` and
/// `[b_start, b_end]` share at least one day.
///
/// Boundaries are inclusive: a tour returning on the day another departs
/// counts as a conflict, because the staff member cannot be in two places on
/// the shared day. Every availability check in the system funnels through
/// this one predicate.
pub fn windows_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && b_start <= a_end
}

/// Validate that a date window is well-formed (start not after end).
pub fn validate_window(start: NaiveDate, end: NaiveDate) -> Result<(), String> {
    if start > end {
        Err(format!(
            "Invalid date window: start {start} is after end {end}"
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    // -----------------------------------------------------------------------
    // Overlap predicate
    // -----------------------------------------------------------------------

    #[test]
    fn disjoint_windows_do_not_overlap() {
        assert!(!windows_overlap(
            d("2025-11-01"),
            d("2025-11-05"),
            d("2025-11-06"),
            d("2025-11-10"),
        ));
    }

    #[test]
    fn contained_window_overlaps() {
        assert!(windows_overlap(
            d("2025-11-01"),
            d("2025-11-10"),
            d("2025-11-03"),
            d("2025-11-04"),
        ));
    }

    #[test]
    fn partial_overlap_detected() {
        assert!(windows_overlap(
            d("2025-11-01"),
            d("2025-11-05"),
            d("2025-11-04"),
            d("2025-11-08"),
        ));
    }

    #[test]
    fn shared_boundary_day_counts_as_overlap() {
        // Return day of one tour equals departure day of the other.
        assert!(windows_overlap(
            d("2025-11-01"),
            d("2025-11-05"),
            d("2025-11-05"),
            d("2025-11-09"),
        ));
    }

    #[test]
    fn overlap_is_symmetric() {
        let (a1, a2) = (d("2025-11-01"), d("2025-11-05"));
        let (b1, b2) = (d("2025-11-04"), d("2025-11-08"));
        assert_eq!(
            windows_overlap(a1, a2, b1, b2),
            windows_overlap(b1, b2, a1, a2)
        );
    }

    #[test]
    fn single_day_windows() {
        assert!(windows_overlap(
            d("2025-11-03"),
            d("2025-11-03"),
            d("2025-11-03"),
            d("2025-11-03"),
        ));
        assert!(!windows_overlap(
            d("2025-11-03"),
            d("2025-11-03"),
            d("2025-11-04"),
            d("2025-11-04"),
        ));
    }

    // -----------------------------------------------------------------------
    // Window validation
    // -----------------------------------------------------------------------

    #[test]
    fn valid_window_passes() {
        assert!(validate_window(d("2025-11-01"), d("2025-11-05")).is_ok());
        assert!(validate_window(d("2025-11-01"), d("2025-11-01")).is_ok());
    }

    #[test]
    fn inverted_window_rejected() {
        assert!(validate_window(d("2025-11-05"), d("2025-11-01")).is_err());
    }

    // -----------------------------------------------------------------------
    // Roles and statuses
    // -----------------------------------------------------------------------

    #[test]
    fn all_roles_accepted() {
        for role in VALID_ROLES {
            assert!(validate_role(role).is_ok());
        }
    }

    #[test]
    fn unknown_role_rejected() {
        let result = validate_role("pilot");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid role"));
    }

    #[test]
    fn empty_role_rejected() {
        assert!(validate_role("").is_err());
    }

    #[test]
    fn all_departure_statuses_accepted() {
        for status in VALID_DEPARTURE_STATUSES {
            assert!(validate_departure_status(status).is_ok());
        }
    }

    #[test]
    fn unknown_departure_status_rejected() {
        assert!(validate_departure_status("draft").is_err());
    }

    #[test]
    fn only_cancelled_and_completed_are_exempt() {
        assert!(OVERLAP_EXEMPT_STATUSES.contains(&DEPARTURE_CANCELLED));
        assert!(OVERLAP_EXEMPT_STATUSES.contains(&DEPARTURE_COMPLETED));
        assert!(!OVERLAP_EXEMPT_STATUSES.contains(&DEPARTURE_SCHEDULED));
        assert!(!OVERLAP_EXEMPT_STATUSES.contains(&DEPARTURE_CONFIRMED));
        assert!(!OVERLAP_EXEMPT_STATUSES.contains(&DEPARTURE_IN_PROGRESS));
    }
}
