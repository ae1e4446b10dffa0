//! Handlers for transport legs and passenger seat assignments.
//!
//! Provides leg availability reads, seat occupancy queries, the passenger
//! manifest, and single/bulk seat allocation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use tourwise_core::error::CoreError;
use tourwise_core::transport::{normalize_seat_number, validate_seat_number};
use tourwise_core::types::DbId;
use tourwise_db::models::seat_assignment::{CreateSeatAssignment, UpdateSeatAssignment};
use tourwise_db::repositories::{DepartureRepo, SeatAssignmentRepo, TransportLegRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Bulk seat allocation request body.
#[derive(Debug, Deserialize)]
pub struct BulkSeatAssignments {
    pub assignments: Vec<CreateSeatAssignment>,
}

/// Bulk seat allocation response payload.
#[derive(Debug, Serialize)]
pub struct BulkCreated {
    pub created: usize,
}

/// Reject seat numbers that would be stored truncated or unreadable.
fn validate_optional_seat(raw: Option<&str>) -> Result<(), AppError> {
    if let Some(seat) = normalize_seat_number(raw) {
        validate_seat_number(&seat).map_err(AppError::BadRequest)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Leg reads
// ---------------------------------------------------------------------------

/// GET /departures/{id}/transports
///
/// All transport legs of a departure, in departure-time order.
pub async fn departure_transports(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    DepartureRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "TourDeparture",
            id,
        })?;

    let legs = TransportLegRepo::list_by_departure(&state.pool, id).await?;
    Ok(Json(DataResponse { data: legs }))
}

/// GET /transports/{id}/availability
///
/// Seat availability for a leg: total, assigned, remaining.
pub async fn availability(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let availability = TransportLegRepo::get_availability(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "TourTransport",
            id,
        })?;

    Ok(Json(DataResponse { data: availability }))
}

/// GET /transports/{id}/seats
///
/// Sorted list of occupied seat numbers on a leg.
pub async fn used_seats(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    TransportLegRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "TourTransport",
            id,
        })?;

    let seats = SeatAssignmentRepo::used_seats(&state.pool, id).await?;
    Ok(Json(DataResponse { data: seats }))
}

/// GET /transports/{id}/guests
///
/// Passenger manifest for a leg, seated rows first.
pub async fn manifest(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    TransportLegRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "TourTransport",
            id,
        })?;

    let rows = SeatAssignmentRepo::list_by_transport(&state.pool, id).await?;
    Ok(Json(DataResponse { data: rows }))
}

// ---------------------------------------------------------------------------
// Seat assignment mutations
// ---------------------------------------------------------------------------

/// POST /transport-guests
///
/// Seat one passenger on a leg.
pub async fn create_guest(
    State(state): State<AppState>,
    Json(input): Json<CreateSeatAssignment>,
) -> AppResult<impl IntoResponse> {
    validate_optional_seat(input.seat_number.as_deref())?;

    let detail = SeatAssignmentRepo::create(&state.pool, &input).await?;

    tracing::info!(
        seat_assignment_id = detail.id,
        transport_id = detail.tour_transport_id,
        guest_id = detail.guest_id,
        seat = detail.seat_number.as_deref().unwrap_or("-"),
        "Guest seated on transport"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// POST /transport-guests/bulk
///
/// Seat a batch of passengers, all-or-nothing.
pub async fn bulk_create_guests(
    State(state): State<AppState>,
    Json(input): Json<BulkSeatAssignments>,
) -> AppResult<impl IntoResponse> {
    for item in &input.assignments {
        validate_optional_seat(item.seat_number.as_deref())?;
    }

    let created = SeatAssignmentRepo::bulk_create(&state.pool, &input.assignments).await?;

    tracing::info!(created, "Bulk guest transport allocation committed");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: BulkCreated { created },
        }),
    ))
}

/// PUT /transport-guests/{id}
///
/// Field-level update; a changed seat number is re-validated for uniqueness.
pub async fn update_guest(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSeatAssignment>,
) -> AppResult<impl IntoResponse> {
    validate_optional_seat(input.seat_number.as_deref())?;

    let updated = SeatAssignmentRepo::update(&state.pool, id, &input).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /transport-guests/{id}
pub async fn delete_guest(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let removed = SeatAssignmentRepo::delete(&state.pool, id).await?;
    if !removed {
        return Err(CoreError::NotFound {
            entity: "TransportGuestAssignment",
            id,
        }
        .into());
    }

    tracing::info!(seat_assignment_id = id, "Guest transport assignment removed");

    Ok(StatusCode::NO_CONTENT)
}
