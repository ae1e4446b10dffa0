//! Transport leg entity model and the computed availability view.

use serde::Serialize;
use sqlx::FromRow;
use tourwise_core::transport::remaining_seats;
use tourwise_core::types::{DbId, Timestamp};

/// A row from the `tour_transports` table.
///
/// `assigned_guests` is a derived counter kept equal to the count of
/// `transport_guest_assignments` rows for the leg; it is only written by the
/// repository's recompute step.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TransportLeg {
    pub id: DbId,
    pub tour_departure_id: DbId,
    pub transport_type: String,
    pub route_from: String,
    pub route_to: String,
    pub departure_datetime: Timestamp,
    pub arrival_datetime: Option<Timestamp>,
    pub total_seats: Option<i32>,
    pub assigned_guests: i32,
    pub booking_status: String,
    pub driver_id: Option<DbId>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Computed seat availability for a leg (not a DB row).
///
/// `total_seats` and `available_seats` are `None` for unbounded legs.
#[derive(Debug, Clone, Serialize)]
pub struct TransportAvailability {
    pub transport_id: DbId,
    pub total_seats: Option<i32>,
    pub assigned_guests: i32,
    pub available_seats: Option<i32>,
}

impl TransportAvailability {
    /// Derive availability from a leg row.
    pub fn from_leg(leg: &TransportLeg) -> Self {
        Self {
            transport_id: leg.id,
            total_seats: leg.total_seats,
            assigned_guests: leg.assigned_guests,
            available_seats: remaining_seats(leg.total_seats, leg.assigned_guests),
        }
    }
}
