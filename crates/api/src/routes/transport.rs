//! Route definitions for transport legs and seat assignments.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::transport;
use crate::state::AppState;

/// Routes mounted at `/departures`.
///
/// ```text
/// GET /{id}/transports -> legs of a departure
/// ```
pub fn departure_router() -> Router<AppState> {
    Router::new().route("/{id}/transports", get(transport::departure_transports))
}

/// Routes mounted at `/transports`.
///
/// ```text
/// GET /{id}/availability -> seat availability
/// GET /{id}/seats        -> occupied seat numbers
/// GET /{id}/guests       -> passenger manifest
/// ```
pub fn leg_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/availability", get(transport::availability))
        .route("/{id}/seats", get(transport::used_seats))
        .route("/{id}/guests", get(transport::manifest))
}

/// Routes mounted at `/transport-guests`.
///
/// ```text
/// POST   /       -> seat a passenger
/// POST   /bulk   -> bulk allocation
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn guest_router() -> Router<AppState> {
    Router::new()
        .route("/", post(transport::create_guest))
        .route("/bulk", post(transport::bulk_create_guests))
        .route(
            "/{id}",
            put(transport::update_guest).delete(transport::delete_guest),
        )
}
