//! Tour departure entity model.
//!
//! Departures are owned by the surrounding tour-catalogue application; this
//! core reads them for date windows and status, never mutates them.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use tourwise_core::types::{DbId, Timestamp};

/// A row from the `tour_departures` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Departure {
    pub id: DbId,
    pub departure_code: String,
    pub tour_name: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
