//! Transport leg constants, seat-number handling, and capacity math.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Transport types
// ---------------------------------------------------------------------------

pub const TRANSPORT_FLIGHT: &str = "flight";
pub const TRANSPORT_BUS: &str = "bus";
pub const TRANSPORT_MINIBUS: &str = "minibus";
pub const TRANSPORT_TRAIN: &str = "train";
pub const TRANSPORT_FERRY: &str = "ferry";
pub const TRANSPORT_OTHER: &str = "other";

/// All valid transport types.
pub const VALID_TRANSPORT_TYPES: &[&str] = &[
    TRANSPORT_FLIGHT,
    TRANSPORT_BUS,
    TRANSPORT_MINIBUS,
    TRANSPORT_TRAIN,
    TRANSPORT_FERRY,
    TRANSPORT_OTHER,
];

/// Validate that a transport type string is one of the accepted values.
pub fn validate_transport_type(transport_type: &str) -> Result<(), String> {
    if VALID_TRANSPORT_TYPES.contains(&transport_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid transport type '{transport_type}'. Must be one of: {}",
            VALID_TRANSPORT_TYPES.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Booking statuses
// ---------------------------------------------------------------------------

pub const BOOKING_PENDING: &str = "pending";
pub const BOOKING_BOOKED: &str = "booked";
pub const BOOKING_CONFIRMED: &str = "confirmed";
pub const BOOKING_CANCELLED: &str = "cancelled";

/// All valid transport booking statuses.
pub const VALID_BOOKING_STATUSES: &[&str] = &[
    BOOKING_PENDING,
    BOOKING_BOOKED,
    BOOKING_CONFIRMED,
    BOOKING_CANCELLED,
];

/// Validate that a booking status string is one of the accepted values.
pub fn validate_booking_status(status: &str) -> Result<(), String> {
    if VALID_BOOKING_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid booking status '{status}'. Must be one of: {}",
            VALID_BOOKING_STATUSES.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Seat numbers
// ---------------------------------------------------------------------------

/// Maximum length of a seat number label.
pub const MAX_SEAT_NUMBER_LENGTH: usize = 8;

/// Normalize a raw seat number: trim whitespace, map empty to `None`.
///
/// Uniqueness checks compare the stored normalized value, so "12A" and
/// "12A " cannot occupy two seats.
pub fn normalize_seat_number(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Validate a normalized seat number.
pub fn validate_seat_number(seat_number: &str) -> Result<(), String> {
    if seat_number.len() > MAX_SEAT_NUMBER_LENGTH {
        return Err(format!(
            "Seat number '{seat_number}' exceeds {MAX_SEAT_NUMBER_LENGTH} characters"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Capacity math
// ---------------------------------------------------------------------------

/// Remaining seats on a leg. `None` total means unbounded capacity.
pub fn remaining_seats(total_seats: Option<i32>, assigned_guests: i32) -> Option<i32> {
    total_seats.map(|total| total - assigned_guests)
}

/// Ensure a leg can take `additional` more passengers.
///
/// Both the single create path and the bulk batch validation go through this
/// one guard, so the capacity invariant cannot drift between them.
pub fn check_capacity(
    transport_id: DbId,
    total_seats: Option<i32>,
    assigned_guests: i32,
    additional: i32,
) -> Result<(), CoreError> {
    match total_seats {
        Some(total) if assigned_guests + additional > total => Err(CoreError::CapacityExceeded {
            transport_id,
            total_seats: total,
            assigned_guests,
        }),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Batch validation
// ---------------------------------------------------------------------------

/// Find the first seat number assigned twice to the same leg within a batch.
///
/// Items are `(transport_id, normalized_seat_number)` pairs; rows without a
/// seat number never collide. Returns the offending pair, if any.
pub fn first_duplicate_seat<'a, I>(items: I) -> Option<(DbId, String)>
where
    I: IntoIterator<Item = (DbId, Option<&'a str>)>,
{
    let mut seen: HashSet<(DbId, &str)> = HashSet::new();
    for (transport_id, seat) in items {
        if let Some(seat) = seat {
            if !seen.insert((transport_id, seat)) {
                return Some((transport_id, seat.to_string()));
            }
        }
    }
    None
}
