//! Repository for the `tour_transports` table: leg lookups and the derived
//! passenger counter.
//!
//! `assigned_guests` is a cached projection of the seat assignment table.
//! [`TransportLegRepo::recompute_assigned_guests_inner`] is the only code
//! that writes it, and every seat mutation calls it inside the same
//! transaction, so readers never observe a seat row without its count.

use sqlx::{PgConnection, PgPool};
use tourwise_core::types::DbId;

use crate::models::transport::{TransportAvailability, TransportLeg};

/// Column list for `tour_transports` queries.
const COLUMNS: &str = "id, tour_departure_id, transport_type, route_from, route_to, \
    departure_datetime, arrival_datetime, total_seats, assigned_guests, booking_status, \
    driver_id, notes, created_at, updated_at";

/// Lookups and the counter recompute for transport legs.
pub struct TransportLegRepo;

impl TransportLegRepo {
    /// Find a leg by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TransportLeg>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tour_transports WHERE id = $1");
        sqlx::query_as::<_, TransportLeg>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a leg by ID on an open connection (used inside seat manager
    /// transactions, after the per-leg advisory lock is held).
    pub(crate) async fn find_by_id_inner(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<TransportLeg>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tour_transports WHERE id = $1");
        sqlx::query_as::<_, TransportLeg>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// All legs of a departure, ordered by departure time.
    pub async fn list_by_departure(
        pool: &PgPool,
        tour_departure_id: DbId,
    ) -> Result<Vec<TransportLeg>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tour_transports \
             WHERE tour_departure_id = $1 \
             ORDER BY departure_datetime ASC"
        );
        sqlx::query_as::<_, TransportLeg>(&query)
            .bind(tour_departure_id)
            .fetch_all(pool)
            .await
    }

    /// Seat availability for a leg. Returns `None` if the leg does not exist.
    pub async fn get_availability(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TransportAvailability>, sqlx::Error> {
        let leg = Self::find_by_id(pool, id).await?;
        Ok(leg.as_ref().map(TransportAvailability::from_leg))
    }

    /// Reset `assigned_guests` to the live count of seat assignment rows.
    ///
    /// Must run inside the same transaction as the insert or delete that
    /// changed the seat assignment set. Returns the recomputed count.
    pub(crate) async fn recompute_assigned_guests_inner(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<i32, sqlx::Error> {
        let assigned: i32 = sqlx::query_scalar(
            "UPDATE tour_transports SET \
                assigned_guests = ( \
                    SELECT COUNT(*)::int FROM transport_guest_assignments \
                    WHERE tour_transport_id = $1 \
                ), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING assigned_guests",
        )
        .bind(id)
        .fetch_one(conn)
        .await?;

        tracing::debug!(transport_id = id, assigned, "Recomputed transport passenger counter");
        Ok(assigned)
    }
}
