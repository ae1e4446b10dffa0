pub mod health;
pub mod staff_assignments;
pub mod transport;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /staff-assignments                     list, create
/// /staff-assignments/availability        availability pre-check
/// /staff-assignments/{id}                get, update, delete
/// /staff-assignments/{id}/confirm        confirm (POST)
///
/// /staff/{staff_id}/schedule             per-staff schedule
///
/// /departures/{id}/transports            legs of a departure
///
/// /transports/{id}/availability          seat availability
/// /transports/{id}/seats                 occupied seat numbers
/// /transports/{id}/guests                passenger manifest
///
/// /transport-guests                      seat a passenger (POST)
/// /transport-guests/bulk                 bulk allocation (POST)
/// /transport-guests/{id}                 update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/staff-assignments", staff_assignments::router())
        .nest("/staff", staff_assignments::staff_router())
        .nest("/departures", transport::departure_router())
        .nest("/transports", transport::leg_router())
        .nest("/transport-guests", transport::guest_router())
}
