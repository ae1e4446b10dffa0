//! Staff assignment entity models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tourwise_core::types::{DbId, Timestamp};

/// A row from the `staff_assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StaffAssignment {
    pub id: DbId,
    pub tour_departure_id: DbId,
    pub staff_id: DbId,
    pub role: String,
    pub assignment_date: Option<NaiveDate>,
    pub confirmed: bool,
    pub confirmed_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An assignment joined with staff, departure, and creator display fields.
///
/// This is the shape mutating operations return and the paged list serves,
/// so the admin UI never needs follow-up lookups for names and codes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StaffAssignmentDetail {
    pub id: DbId,
    pub tour_departure_id: DbId,
    pub staff_id: DbId,
    pub role: String,
    pub assignment_date: Option<NaiveDate>,
    pub confirmed: bool,
    pub confirmed_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub staff_code: String,
    pub staff_name: String,
    pub departure_code: String,
    pub tour_name: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub departure_status: String,
    pub created_by_name: Option<String>,
}

/// An existing commitment's departure window, as seen by the availability
/// scan. Carries the departure code so a conflict can be reported in terms
/// the scheduler recognizes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommitmentWindow {
    pub tour_departure_id: DbId,
    pub departure_code: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
}

/// DTO for creating a staff assignment.
#[derive(Debug, Deserialize)]
pub struct CreateStaffAssignment {
    pub tour_departure_id: DbId,
    pub staff_id: DbId,
    pub role: String,
    pub assignment_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
}

/// DTO for field-level updates. Only non-`None` fields are applied.
#[derive(Debug, Deserialize)]
pub struct UpdateStaffAssignment {
    pub role: Option<String>,
    pub assignment_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Filters for the paged assignment list.
#[derive(Debug, Default, Deserialize)]
pub struct StaffAssignmentFilter {
    /// Matches staff name, staff code, or departure code (case-insensitive).
    pub search: Option<String>,
    pub role: Option<String>,
    pub confirmed: Option<bool>,
    pub departure_id: Option<DbId>,
    pub staff_id: Option<DbId>,
    /// Departure window must start on or after this date.
    pub date_from: Option<NaiveDate>,
    /// Departure window must end on or before this date.
    pub date_to: Option<NaiveDate>,
    pub departure_status: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
