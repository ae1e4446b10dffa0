//! Repository for the `transport_guest_assignments` table: the seat
//! assignment manager.
//!
//! Enforces per-leg seat uniqueness and leg capacity. Every mutation runs
//! inside a transaction holding the per-leg advisory lock and recomputes the
//! leg's `assigned_guests` counter before committing, so capacity reads stay
//! consistent with the authoritative row set.

use std::collections::BTreeMap;

use sqlx::{PgConnection, PgPool};
use tourwise_core::error::CoreError;
use tourwise_core::transport::{
    check_capacity, first_duplicate_seat, normalize_seat_number, validate_seat_number,
};
use tourwise_core::types::DbId;

use crate::error::RepoResult;
use crate::locks;
use crate::models::seat_assignment::{
    CreateSeatAssignment, SeatAssignment, SeatAssignmentDetail, UpdateSeatAssignment,
};
use crate::repositories::TransportLegRepo;

/// Column list for plain `transport_guest_assignments` queries.
const COLUMNS: &str = "id, tour_transport_id, guest_id, seat_number, ticket_number, \
    baggage_count, baggage_weight_kg, special_needs, notes, created_at, updated_at";

/// Column list for joined detail queries.
const DETAIL_COLUMNS: &str = "\
    tga.id, tga.tour_transport_id, tga.guest_id, tga.seat_number, tga.ticket_number, \
    tga.baggage_count, tga.baggage_weight_kg, tga.special_needs, tga.notes, \
    tga.created_at, tga.updated_at, \
    g.full_name AS guest_name, \
    t.transport_type, t.route_from, t.route_to";

/// Shared FROM/JOIN clause for detail queries.
const DETAIL_FROM: &str = "\
    FROM transport_guest_assignments tga \
    JOIN departure_guests g ON g.id = tga.guest_id \
    JOIN tour_transports t ON t.id = tga.tour_transport_id";

/// Seat allocation and CRUD for passenger transport assignments.
pub struct SeatAssignmentRepo;

impl SeatAssignmentRepo {
    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Find a seat assignment by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SeatAssignment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM transport_guest_assignments WHERE id = $1");
        sqlx::query_as::<_, SeatAssignment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a seat assignment by ID, enriched with guest and leg fields.
    pub async fn find_detail_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SeatAssignmentDetail>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::find_detail_by_id_inner(&mut *conn, id).await
    }

    async fn find_detail_by_id_inner(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<SeatAssignmentDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} {DETAIL_FROM} WHERE tga.id = $1");
        sqlx::query_as::<_, SeatAssignmentDetail>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Passenger manifest for a leg, seated rows first.
    pub async fn list_by_transport(
        pool: &PgPool,
        tour_transport_id: DbId,
    ) -> Result<Vec<SeatAssignmentDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM} \
             WHERE tga.tour_transport_id = $1 \
             ORDER BY tga.seat_number ASC NULLS LAST, tga.created_at ASC"
        );
        sqlx::query_as::<_, SeatAssignmentDetail>(&query)
            .bind(tour_transport_id)
            .fetch_all(pool)
            .await
    }

    /// Sorted list of occupied seat numbers on a leg.
    pub async fn used_seats(
        pool: &PgPool,
        tour_transport_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT seat_number FROM transport_guest_assignments \
             WHERE tour_transport_id = $1 AND seat_number IS NOT NULL \
             ORDER BY seat_number ASC",
        )
        .bind(tour_transport_id)
        .fetch_all(pool)
        .await
    }

    /// Whether a seat number is occupied on a leg.
    ///
    /// `exclude_id` lets an update ignore its own row. Shared by the create
    /// and update paths.
    pub async fn is_seat_taken(
        pool: &PgPool,
        tour_transport_id: DbId,
        seat_number: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::is_seat_taken_inner(&mut *conn, tour_transport_id, seat_number, exclude_id).await
    }

    async fn is_seat_taken_inner(
        conn: &mut PgConnection,
        tour_transport_id: DbId,
        seat_number: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let mut query = String::from(
            "SELECT EXISTS( \
                SELECT 1 FROM transport_guest_assignments \
                WHERE tour_transport_id = $1 AND seat_number = $2",
        );
        if exclude_id.is_some() {
            query.push_str(" AND id <> $3");
        }
        query.push(')');

        let mut q = sqlx::query_scalar::<_, bool>(&query)
            .bind(tour_transport_id)
            .bind(seat_number);
        if let Some(excluded) = exclude_id {
            q = q.bind(excluded);
        }
        q.fetch_one(conn).await
    }

    // -----------------------------------------------------------------------
    // Manager operations
    // -----------------------------------------------------------------------

    /// Seat one passenger on a leg.
    ///
    /// Checks leg existence, remaining capacity, and seat uniqueness inside
    /// a transaction holding the per-leg advisory lock, then inserts and
    /// recomputes the leg counter before committing.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSeatAssignment,
    ) -> RepoResult<SeatAssignmentDetail> {
        let seat_number = normalize_seat_number(input.seat_number.as_deref());
        if let Some(ref seat) = seat_number {
            validate_seat_number(seat).map_err(CoreError::Validation)?;
        }

        let mut tx = pool.begin().await?;
        locks::acquire(&mut *tx, locks::TRANSPORT_SEATING, input.tour_transport_id).await?;

        let leg = TransportLegRepo::find_by_id_inner(&mut *tx, input.tour_transport_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "TourTransport",
                id: input.tour_transport_id,
            })?;

        check_capacity(leg.id, leg.total_seats, leg.assigned_guests, 1)?;

        if let Some(ref seat) = seat_number {
            if Self::is_seat_taken_inner(&mut *tx, leg.id, seat, None).await? {
                return Err(CoreError::SeatConflict {
                    transport_id: leg.id,
                    seat_number: seat.clone(),
                }
                .into());
            }
        }

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO transport_guest_assignments \
                (tour_transport_id, guest_id, seat_number, ticket_number, baggage_count, \
                 baggage_weight_kg, special_needs, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id",
        )
        .bind(input.tour_transport_id)
        .bind(input.guest_id)
        .bind(&seat_number)
        .bind(&input.ticket_number)
        .bind(input.baggage_count)
        .bind(input.baggage_weight_kg)
        .bind(&input.special_needs)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        TransportLegRepo::recompute_assigned_guests_inner(&mut *tx, leg.id).await?;

        let detail = Self::find_detail_by_id_inner(&mut *tx, id)
            .await?
            .ok_or_else(|| {
                CoreError::Internal(format!("seat assignment {id} missing after insert"))
            })?;

        tx.commit().await?;
        Ok(detail)
    }

    /// Field-level update. A changed seat number is re-validated for
    /// uniqueness on the same leg, excluding this row.
    ///
    /// Capacity is not re-checked (the passenger count does not change) and
    /// the owning leg cannot change.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSeatAssignment,
    ) -> RepoResult<SeatAssignment> {
        let seat_number = normalize_seat_number(input.seat_number.as_deref());
        if let Some(ref seat) = seat_number {
            validate_seat_number(seat).map_err(CoreError::Validation)?;
        }

        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM transport_guest_assignments WHERE id = $1");
        let existing = sqlx::query_as::<_, SeatAssignment>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "TransportGuestAssignment",
                id,
            })?;

        locks::acquire(&mut *tx, locks::TRANSPORT_SEATING, existing.tour_transport_id).await?;

        if let Some(ref seat) = seat_number {
            if existing.seat_number.as_deref() != Some(seat.as_str())
                && Self::is_seat_taken_inner(&mut *tx, existing.tour_transport_id, seat, Some(id))
                    .await?
            {
                return Err(CoreError::SeatConflict {
                    transport_id: existing.tour_transport_id,
                    seat_number: seat.clone(),
                }
                .into());
            }
        }

        let update_query = format!(
            "UPDATE transport_guest_assignments SET \
                seat_number = COALESCE($2, seat_number), \
                ticket_number = COALESCE($3, ticket_number), \
                baggage_count = COALESCE($4, baggage_count), \
                baggage_weight_kg = COALESCE($5, baggage_weight_kg), \
                special_needs = COALESCE($6, special_needs), \
                notes = COALESCE($7, notes), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, SeatAssignment>(&update_query)
            .bind(id)
            .bind(&seat_number)
            .bind(&input.ticket_number)
            .bind(input.baggage_count)
            .bind(input.baggage_weight_kg)
            .bind(&input.special_needs)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Remove a seat assignment and recompute the owning leg's counter.
    /// Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> RepoResult<bool> {
        let mut tx = pool.begin().await?;

        let transport_id: Option<DbId> = sqlx::query_scalar(
            "SELECT tour_transport_id FROM transport_guest_assignments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(transport_id) = transport_id else {
            return Ok(false);
        };

        locks::acquire(&mut *tx, locks::TRANSPORT_SEATING, transport_id).await?;

        sqlx::query("DELETE FROM transport_guest_assignments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        TransportLegRepo::recompute_assigned_guests_inner(&mut *tx, transport_id).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Seat a batch of passengers, all-or-nothing.
    ///
    /// The whole batch is validated before any write: every leg must exist,
    /// no seat number may appear twice for the same leg within the batch,
    /// no seat may already be occupied, and no leg may end up over capacity.
    /// Any failure rejects the batch with zero rows persisted. Returns the
    /// number of rows created.
    pub async fn bulk_create(
        pool: &PgPool,
        items: &[CreateSeatAssignment],
    ) -> RepoResult<usize> {
        if items.is_empty() {
            return Ok(0);
        }

        let seats: Vec<Option<String>> = items
            .iter()
            .map(|item| normalize_seat_number(item.seat_number.as_deref()))
            .collect();
        for seat in seats.iter().flatten() {
            validate_seat_number(seat).map_err(CoreError::Validation)?;
        }

        if let Some((transport_id, seat_number)) = first_duplicate_seat(
            items
                .iter()
                .zip(&seats)
                .map(|(item, seat)| (item.tour_transport_id, seat.as_deref())),
        ) {
            return Err(CoreError::DuplicateSeatInBatch {
                transport_id,
                seat_number,
            }
            .into());
        }

        // New passengers per leg, keyed in ascending order so the advisory
        // locks are always taken in the same order.
        let mut additions: BTreeMap<DbId, i32> = BTreeMap::new();
        for item in items {
            *additions.entry(item.tour_transport_id).or_insert(0) += 1;
        }

        let mut tx = pool.begin().await?;

        for (&transport_id, &additional) in &additions {
            locks::acquire(&mut *tx, locks::TRANSPORT_SEATING, transport_id).await?;

            let leg = TransportLegRepo::find_by_id_inner(&mut *tx, transport_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "TourTransport",
                    id: transport_id,
                })?;

            check_capacity(leg.id, leg.total_seats, leg.assigned_guests, additional)?;
        }

        for (item, seat) in items.iter().zip(&seats) {
            if let Some(seat) = seat {
                if Self::is_seat_taken_inner(&mut *tx, item.tour_transport_id, seat, None).await? {
                    return Err(CoreError::SeatConflict {
                        transport_id: item.tour_transport_id,
                        seat_number: seat.clone(),
                    }
                    .into());
                }
            }
        }

        let transport_ids: Vec<DbId> = items.iter().map(|i| i.tour_transport_id).collect();
        let guest_ids: Vec<DbId> = items.iter().map(|i| i.guest_id).collect();
        let ticket_numbers: Vec<Option<String>> =
            items.iter().map(|i| i.ticket_number.clone()).collect();
        let baggage_counts: Vec<Option<i32>> = items.iter().map(|i| i.baggage_count).collect();
        let baggage_weights: Vec<Option<i32>> =
            items.iter().map(|i| i.baggage_weight_kg).collect();
        let special_needs: Vec<Option<String>> =
            items.iter().map(|i| i.special_needs.clone()).collect();
        let notes: Vec<Option<String>> = items.iter().map(|i| i.notes.clone()).collect();

        let result = sqlx::query(
            "INSERT INTO transport_guest_assignments \
                (tour_transport_id, guest_id, seat_number, ticket_number, baggage_count, \
                 baggage_weight_kg, special_needs, notes) \
             SELECT * FROM UNNEST( \
                $1::bigint[], $2::bigint[], $3::text[], $4::text[], \
                $5::int[], $6::int[], $7::text[], $8::text[])",
        )
        .bind(&transport_ids)
        .bind(&guest_ids)
        .bind(&seats)
        .bind(&ticket_numbers)
        .bind(&baggage_counts)
        .bind(&baggage_weights)
        .bind(&special_needs)
        .bind(&notes)
        .execute(&mut *tx)
        .await?;

        for &transport_id in additions.keys() {
            TransportLegRepo::recompute_assigned_guests_inner(&mut *tx, transport_id).await?;
        }

        tx.commit().await?;
        Ok(result.rows_affected() as usize)
    }
}
