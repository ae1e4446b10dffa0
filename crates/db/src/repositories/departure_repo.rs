//! Read-only repository for the `tour_departures` table.
//!
//! Departure lifecycle (creation, status changes, date edits) belongs to the
//! tour-catalogue side of the application; the assignment core only looks
//! departures up by id.

use sqlx::{PgConnection, PgPool};
use tourwise_core::types::DbId;

use crate::models::departure::Departure;

/// Column list for `tour_departures` queries.
pub(crate) const COLUMNS: &str = "id, departure_code, tour_name, departure_date, return_date, \
    status, created_at, updated_at";

/// Lookups for tour departures.
pub struct DepartureRepo;

impl DepartureRepo {
    /// Find a departure by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Departure>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tour_departures WHERE id = $1");
        sqlx::query_as::<_, Departure>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a departure by ID on an open connection (used inside manager
    /// transactions).
    pub(crate) async fn find_by_id_inner(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Departure>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tour_departures WHERE id = $1");
        sqlx::query_as::<_, Departure>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}
