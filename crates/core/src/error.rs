use crate::types::DbId;

/// Domain-level error taxonomy.
///
/// Every business-rule failure is recoverable by the caller and carries
/// enough context to act on (which seat, which departure code). Storage
/// failures are wrapped separately at the repository layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Staff member is already committed to a departure whose date window
    /// overlaps the candidate window.
    #[error("Staff member {staff_id} is already assigned to departure {departure_code} in this period")]
    ScheduleConflict {
        staff_id: DbId,
        departure_code: String,
    },

    /// Transport leg has no remaining seats.
    #[error("Transport {transport_id} is full ({assigned_guests}/{total_seats} seats taken)")]
    CapacityExceeded {
        transport_id: DbId,
        total_seats: i32,
        assigned_guests: i32,
    },

    /// Requested seat number is already occupied on the target leg.
    #[error("Seat {seat_number} on transport {transport_id} is already taken")]
    SeatConflict {
        transport_id: DbId,
        seat_number: String,
    },

    /// A bulk request assigns the same seat number twice on the same leg.
    #[error("Seat {seat_number} on transport {transport_id} appears more than once in the batch")]
    DuplicateSeatInBatch {
        transport_id: DbId,
        seat_number: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
