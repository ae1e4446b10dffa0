//! Handlers for staff assignment scheduling.
//!
//! Provides endpoints for creating, listing, updating, confirming, and
//! deleting staff assignments, plus the read-only availability pre-check and
//! per-staff schedule views.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use tourwise_core::error::CoreError;
use tourwise_core::scheduling::{validate_departure_status, validate_role, validate_window};
use tourwise_core::types::DbId;
use tourwise_db::models::staff_assignment::{
    CreateStaffAssignment, StaffAssignmentFilter, UpdateStaffAssignment,
};
use tourwise_db::repositories::StaffAssignmentRepo;

use crate::error::{AppError, AppResult};
use crate::query::{AvailabilityParams, DateRangeParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Availability pre-check response payload.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

/// GET /staff-assignments?search=&role=&confirmed=&page=&page_size=...
///
/// Paged, filtered assignment list with pagination metadata.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<StaffAssignmentFilter>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref role) = filter.role {
        validate_role(role).map_err(AppError::BadRequest)?;
    }
    if let Some(ref status) = filter.departure_status {
        validate_departure_status(status).map_err(AppError::BadRequest)?;
    }

    let page = StaffAssignmentRepo::list_paged(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /staff-assignments
///
/// Assign a staff member to a departure after the availability check passes.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateStaffAssignment>,
) -> AppResult<impl IntoResponse> {
    validate_role(&input.role).map_err(AppError::BadRequest)?;

    let detail = StaffAssignmentRepo::create(&state.pool, &input).await?;

    tracing::info!(
        assignment_id = detail.id,
        staff_id = detail.staff_id,
        departure_code = %detail.departure_code,
        role = %detail.role,
        "Staff assignment created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /staff-assignments/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = StaffAssignmentRepo::find_detail_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "StaffAssignment",
            id,
        })?;

    Ok(Json(DataResponse { data: detail }))
}

/// PUT /staff-assignments/{id}
///
/// Field-level update. With `STRICT_ASSIGNMENT_UPDATES=true` the staff
/// member's availability is re-validated before the edit is applied.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStaffAssignment>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref role) = input.role {
        validate_role(role).map_err(AppError::BadRequest)?;
    }

    let updated = if state.config.strict_assignment_updates {
        StaffAssignmentRepo::update_with_revalidation(&state.pool, id, &input).await?
    } else {
        StaffAssignmentRepo::update(&state.pool, id, &input)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "StaffAssignment",
                id,
            })?
    };

    Ok(Json(DataResponse { data: updated }))
}

/// POST /staff-assignments/{id}/confirm
///
/// One-way transition to confirmed; repeat calls are state-wise no-ops.
pub async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let confirmed = StaffAssignmentRepo::confirm(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "StaffAssignment",
            id,
        })?;

    tracing::info!(assignment_id = id, "Staff assignment confirmed");

    Ok(Json(DataResponse { data: confirmed }))
}

/// DELETE /staff-assignments/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let removed = StaffAssignmentRepo::delete(&state.pool, id).await?;
    if !removed {
        return Err(CoreError::NotFound {
            entity: "StaffAssignment",
            id,
        }
        .into());
    }

    tracing::info!(assignment_id = id, "Staff assignment deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /staff-assignments/availability?staff_id=&departure_date=&return_date=
///
/// Read-only availability pre-check for the scheduling UI.
pub async fn availability(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityParams>,
) -> AppResult<impl IntoResponse> {
    validate_window(params.departure_date, params.return_date).map_err(AppError::BadRequest)?;

    let available = StaffAssignmentRepo::is_available(
        &state.pool,
        params.staff_id,
        params.departure_date,
        params.return_date,
        params.exclude_departure_id,
    )
    .await?;

    Ok(Json(DataResponse {
        data: AvailabilityResponse { available },
    }))
}

/// GET /staff/{staff_id}/schedule?date_from=&date_to=
///
/// A staff member's non-cancelled assignments in departure-date order.
pub async fn schedule(
    State(state): State<AppState>,
    Path(staff_id): Path<DbId>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let assignments = StaffAssignmentRepo::schedule_for_staff(
        &state.pool,
        staff_id,
        params.date_from,
        params.date_to,
    )
    .await?;

    Ok(Json(DataResponse { data: assignments }))
}
