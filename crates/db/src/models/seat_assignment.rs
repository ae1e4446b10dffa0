//! Passenger-to-transport seat assignment models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tourwise_core::types::{DbId, Timestamp};

/// A row from the `transport_guest_assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SeatAssignment {
    pub id: DbId,
    pub tour_transport_id: DbId,
    pub guest_id: DbId,
    pub seat_number: Option<String>,
    pub ticket_number: Option<String>,
    pub baggage_count: Option<i32>,
    pub baggage_weight_kg: Option<i32>,
    pub special_needs: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A seat assignment joined with guest and leg display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SeatAssignmentDetail {
    pub id: DbId,
    pub tour_transport_id: DbId,
    pub guest_id: DbId,
    pub seat_number: Option<String>,
    pub ticket_number: Option<String>,
    pub baggage_count: Option<i32>,
    pub baggage_weight_kg: Option<i32>,
    pub special_needs: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub guest_name: String,
    pub transport_type: String,
    pub route_from: String,
    pub route_to: String,
}

/// DTO for seating one passenger on a leg. Also the per-item shape of a
/// bulk request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSeatAssignment {
    pub tour_transport_id: DbId,
    pub guest_id: DbId,
    pub seat_number: Option<String>,
    pub ticket_number: Option<String>,
    pub baggage_count: Option<i32>,
    pub baggage_weight_kg: Option<i32>,
    pub special_needs: Option<String>,
    pub notes: Option<String>,
}

/// DTO for field-level updates. Only non-`None` fields are applied; the
/// owning leg cannot change (moving a passenger is delete + create).
#[derive(Debug, Deserialize)]
pub struct UpdateSeatAssignment {
    pub seat_number: Option<String>,
    pub ticket_number: Option<String>,
    pub baggage_count: Option<i32>,
    pub baggage_weight_kg: Option<i32>,
    pub special_needs: Option<String>,
    pub notes: Option<String>,
}
