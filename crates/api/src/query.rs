//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use serde::Deserialize;
use tourwise_core::types::DbId;

/// Query parameters for the staff availability pre-check
/// (`?staff_id=&departure_date=&return_date=[&exclude_departure_id=]`).
#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub staff_id: DbId,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub exclude_departure_id: Option<DbId>,
}

/// Query parameters for schedule range filtering (`?date_from=&date_to=`).
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}
