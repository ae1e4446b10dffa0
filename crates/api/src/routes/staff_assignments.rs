//! Route definitions for staff assignment scheduling.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::staff_assignments;
use crate::state::AppState;

/// Routes mounted at `/staff-assignments`.
///
/// ```text
/// GET    /               -> list (paged, filtered)
/// POST   /               -> create
/// GET    /availability   -> availability pre-check
/// GET    /{id}           -> get
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// POST   /{id}/confirm   -> confirm
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(staff_assignments::list).post(staff_assignments::create),
        )
        .route("/availability", get(staff_assignments::availability))
        .route(
            "/{id}",
            get(staff_assignments::get)
                .put(staff_assignments::update)
                .delete(staff_assignments::delete),
        )
        .route("/{id}/confirm", post(staff_assignments::confirm))
}

/// Routes mounted at `/staff`.
///
/// ```text
/// GET /{staff_id}/schedule -> per-staff schedule
/// ```
pub fn staff_router() -> Router<AppState> {
    Router::new().route("/{staff_id}/schedule", get(staff_assignments::schedule))
}
