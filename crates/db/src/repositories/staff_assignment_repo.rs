//! Repository for the `staff_assignments` table: availability scanning and
//! the assignment manager.
//!
//! The no-overlap invariant says a staff member cannot hold assignments to
//! two departures with intersecting `[departure_date, return_date]` windows
//! unless a departure is cancelled or completed. The scan that guards it is
//! shared between the write path (`create`, `update_with_revalidation`) and
//! the read-only availability query, so the two can never drift.

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use tourwise_core::error::CoreError;
use tourwise_core::pagination::{clamp_page, clamp_page_size, Page};
use tourwise_core::scheduling::{
    validate_role, windows_overlap, DEPARTURE_CANCELLED, OVERLAP_EXEMPT_STATUSES,
};
use tourwise_core::types::DbId;

use crate::error::RepoResult;
use crate::locks;
use crate::models::staff_assignment::{
    CommitmentWindow, CreateStaffAssignment, StaffAssignment, StaffAssignmentDetail,
    StaffAssignmentFilter, UpdateStaffAssignment,
};
use crate::repositories::DepartureRepo;

/// Column list for plain `staff_assignments` queries.
const COLUMNS: &str = "id, tour_departure_id, staff_id, role, assignment_date, confirmed, \
    confirmed_at, notes, created_by, created_at, updated_at";

/// Column list for joined detail queries.
const DETAIL_COLUMNS: &str = "\
    sa.id, sa.tour_departure_id, sa.staff_id, sa.role, sa.assignment_date, sa.confirmed, \
    sa.confirmed_at, sa.notes, sa.created_by, sa.created_at, sa.updated_at, \
    s.staff_code, s.full_name AS staff_name, \
    d.departure_code, d.tour_name, d.departure_date, d.return_date, \
    d.status AS departure_status, \
    u.display_name AS created_by_name";

/// Shared FROM/JOIN clause for detail queries.
const DETAIL_FROM: &str = "\
    FROM staff_assignments sa \
    JOIN staff s ON s.id = sa.staff_id \
    JOIN tour_departures d ON d.id = sa.tour_departure_id \
    LEFT JOIN users u ON u.id = sa.created_by";

/// Availability scanning and CRUD for staff assignments.
pub struct StaffAssignmentRepo;

impl StaffAssignmentRepo {
    // -----------------------------------------------------------------------
    // Availability
    // -----------------------------------------------------------------------

    /// Existing commitments of a staff member whose departure windows overlap
    /// the candidate window.
    ///
    /// Fetches every assignment whose parent departure still blocks the
    /// staff member (status not cancelled/completed, optionally excluding
    /// one departure) and applies the overlap predicate to each window.
    pub(crate) async fn overlapping_commitments_inner(
        conn: &mut PgConnection,
        staff_id: DbId,
        window_start: NaiveDate,
        window_end: NaiveDate,
        exclude_departure_id: Option<DbId>,
    ) -> Result<Vec<CommitmentWindow>, sqlx::Error> {
        let exempt: Vec<String> = OVERLAP_EXEMPT_STATUSES
            .iter()
            .map(|s| (*s).to_string())
            .collect();

        let mut query = String::from(
            "SELECT d.id AS tour_departure_id, d.departure_code, d.departure_date, d.return_date \
             FROM staff_assignments sa \
             JOIN tour_departures d ON d.id = sa.tour_departure_id \
             WHERE sa.staff_id = $1 AND d.status <> ALL($2)",
        );
        if exclude_departure_id.is_some() {
            query.push_str(" AND d.id <> $3");
        }

        let mut q = sqlx::query_as::<_, CommitmentWindow>(&query)
            .bind(staff_id)
            .bind(&exempt);
        if let Some(excluded) = exclude_departure_id {
            q = q.bind(excluded);
        }

        let windows = q.fetch_all(conn).await?;
        Ok(windows
            .into_iter()
            .filter(|w| windows_overlap(w.departure_date, w.return_date, window_start, window_end))
            .collect())
    }

    /// Commitments of a staff member overlapping the given window.
    pub async fn overlapping_commitments(
        pool: &PgPool,
        staff_id: DbId,
        window_start: NaiveDate,
        window_end: NaiveDate,
        exclude_departure_id: Option<DbId>,
    ) -> Result<Vec<CommitmentWindow>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::overlapping_commitments_inner(
            &mut *conn,
            staff_id,
            window_start,
            window_end,
            exclude_departure_id,
        )
        .await
    }

    /// Whether a staff member is free in the given window.
    ///
    /// Read-only pre-check for the UI; the authoritative check runs again
    /// inside the `create` transaction.
    pub async fn is_available(
        pool: &PgPool,
        staff_id: DbId,
        window_start: NaiveDate,
        window_end: NaiveDate,
        exclude_departure_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let conflicts = Self::overlapping_commitments(
            pool,
            staff_id,
            window_start,
            window_end,
            exclude_departure_id,
        )
        .await?;
        Ok(conflicts.is_empty())
    }

    // -----------------------------------------------------------------------
    // Manager operations
    // -----------------------------------------------------------------------

    /// Assign a staff member to a departure.
    ///
    /// Runs the availability check and the insert in one transaction holding
    /// the per-staff advisory lock, so two concurrent creates for the same
    /// staff member cannot both pass the check. Fails with
    /// [`CoreError::ScheduleConflict`] carrying the colliding departure's
    /// code.
    pub async fn create(
        pool: &PgPool,
        input: &CreateStaffAssignment,
    ) -> RepoResult<StaffAssignmentDetail> {
        validate_role(&input.role).map_err(CoreError::Validation)?;

        let mut tx = pool.begin().await?;
        locks::acquire(&mut *tx, locks::STAFF_SCHEDULING, input.staff_id).await?;

        let departure = DepartureRepo::find_by_id_inner(&mut *tx, input.tour_departure_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "TourDeparture",
                id: input.tour_departure_id,
            })?;

        let conflicts = Self::overlapping_commitments_inner(
            &mut *tx,
            input.staff_id,
            departure.departure_date,
            departure.return_date,
            None,
        )
        .await?;
        if let Some(hit) = conflicts.into_iter().next() {
            return Err(CoreError::ScheduleConflict {
                staff_id: input.staff_id,
                departure_code: hit.departure_code,
            }
            .into());
        }

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO staff_assignments \
                (tour_departure_id, staff_id, role, assignment_date, notes, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(input.tour_departure_id)
        .bind(input.staff_id)
        .bind(&input.role)
        .bind(input.assignment_date)
        .bind(&input.notes)
        .bind(input.created_by)
        .fetch_one(&mut *tx)
        .await?;

        let detail = Self::find_detail_by_id_inner(&mut *tx, id)
            .await?
            .ok_or_else(|| CoreError::Internal(format!("assignment {id} missing after insert")))?;

        tx.commit().await?;
        Ok(detail)
    }

    /// Field-level update (role, assignment date, notes). Only non-`None`
    /// fields are applied.
    ///
    /// Does not re-run the availability check; use
    /// [`Self::update_with_revalidation`] for the strict variant. Returns
    /// `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStaffAssignment,
    ) -> Result<Option<StaffAssignment>, sqlx::Error> {
        let query = format!(
            "UPDATE staff_assignments SET \
                role = COALESCE($2, role), \
                assignment_date = COALESCE($3, assignment_date), \
                notes = COALESCE($4, notes), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StaffAssignment>(&query)
            .bind(id)
            .bind(&input.role)
            .bind(input.assignment_date)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Strict update: re-validates the staff member's availability against
    /// the assignment's departure window (excluding its own departure)
    /// before applying the edit.
    ///
    /// Catches the case where the departure's dates moved after the
    /// assignment was made.
    pub async fn update_with_revalidation(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStaffAssignment,
    ) -> RepoResult<StaffAssignment> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM staff_assignments WHERE id = $1");
        let existing = sqlx::query_as::<_, StaffAssignment>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "StaffAssignment",
                id,
            })?;

        locks::acquire(&mut *tx, locks::STAFF_SCHEDULING, existing.staff_id).await?;

        let departure = DepartureRepo::find_by_id_inner(&mut *tx, existing.tour_departure_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "TourDeparture",
                id: existing.tour_departure_id,
            })?;

        let conflicts = Self::overlapping_commitments_inner(
            &mut *tx,
            existing.staff_id,
            departure.departure_date,
            departure.return_date,
            Some(departure.id),
        )
        .await?;
        if let Some(hit) = conflicts.into_iter().next() {
            return Err(CoreError::ScheduleConflict {
                staff_id: existing.staff_id,
                departure_code: hit.departure_code,
            }
            .into());
        }

        let update_query = format!(
            "UPDATE staff_assignments SET \
                role = COALESCE($2, role), \
                assignment_date = COALESCE($3, assignment_date), \
                notes = COALESCE($4, notes), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, StaffAssignment>(&update_query)
            .bind(id)
            .bind(&input.role)
            .bind(input.assignment_date)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// One-way transition to confirmed.
    ///
    /// `confirmed_at` keeps the first confirmation time; confirming twice is
    /// a no-op state-wise. Returns `None` if no row with the given `id`
    /// exists.
    pub async fn confirm(pool: &PgPool, id: DbId) -> Result<Option<StaffAssignment>, sqlx::Error> {
        let query = format!(
            "UPDATE staff_assignments SET \
                confirmed = TRUE, \
                confirmed_at = COALESCE(confirmed_at, NOW()), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StaffAssignment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Hard delete. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM staff_assignments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Find an assignment by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<StaffAssignment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff_assignments WHERE id = $1");
        sqlx::query_as::<_, StaffAssignment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an assignment by ID, enriched with display fields.
    pub async fn find_detail_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<StaffAssignmentDetail>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::find_detail_by_id_inner(&mut *conn, id).await
    }

    async fn find_detail_by_id_inner(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<StaffAssignmentDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} {DETAIL_FROM} WHERE sa.id = $1");
        sqlx::query_as::<_, StaffAssignmentDetail>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    /// Paged, filtered assignment list with pagination metadata.
    ///
    /// Ordered by departure date descending, then creation time descending.
    pub async fn list_paged(
        pool: &PgPool,
        filter: &StaffAssignmentFilter,
    ) -> Result<Page<StaffAssignmentDetail>, sqlx::Error> {
        let page = clamp_page(filter.page);
        let page_size = clamp_page_size(filter.page_size);
        let offset = (page - 1) * page_size;

        // Build the WHERE clause and track the next bind parameter index.
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx: u32 = 1;

        if filter.search.is_some() {
            conditions.push(format!(
                "(s.full_name ILIKE ${bind_idx} \
                  OR s.staff_code ILIKE ${bind_idx} \
                  OR d.departure_code ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
        }
        if filter.role.is_some() {
            conditions.push(format!("sa.role = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.confirmed.is_some() {
            conditions.push(format!("sa.confirmed = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.departure_id.is_some() {
            conditions.push(format!("sa.tour_departure_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.staff_id.is_some() {
            conditions.push(format!("sa.staff_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.date_from.is_some() {
            conditions.push(format!("d.departure_date >= ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.date_to.is_some() {
            conditions.push(format!("d.return_date <= ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.departure_status.is_some() {
            conditions.push(format!("d.status = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let search_pattern = filter.search.as_ref().map(|s| format!("%{s}%"));

        let count_query = format!("SELECT COUNT(*) {DETAIL_FROM} {where_clause}");
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(ref pattern) = search_pattern {
            count_q = count_q.bind(pattern);
        }
        if let Some(ref role) = filter.role {
            count_q = count_q.bind(role);
        }
        if let Some(confirmed) = filter.confirmed {
            count_q = count_q.bind(confirmed);
        }
        if let Some(departure_id) = filter.departure_id {
            count_q = count_q.bind(departure_id);
        }
        if let Some(staff_id) = filter.staff_id {
            count_q = count_q.bind(staff_id);
        }
        if let Some(date_from) = filter.date_from {
            count_q = count_q.bind(date_from);
        }
        if let Some(date_to) = filter.date_to {
            count_q = count_q.bind(date_to);
        }
        if let Some(ref status) = filter.departure_status {
            count_q = count_q.bind(status);
        }
        let total_items = count_q.fetch_one(pool).await?;

        let list_query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM} {where_clause} \
             ORDER BY d.departure_date DESC, sa.created_at DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1,
        );
        let mut list_q = sqlx::query_as::<_, StaffAssignmentDetail>(&list_query);
        if let Some(ref pattern) = search_pattern {
            list_q = list_q.bind(pattern);
        }
        if let Some(ref role) = filter.role {
            list_q = list_q.bind(role);
        }
        if let Some(confirmed) = filter.confirmed {
            list_q = list_q.bind(confirmed);
        }
        if let Some(departure_id) = filter.departure_id {
            list_q = list_q.bind(departure_id);
        }
        if let Some(staff_id) = filter.staff_id {
            list_q = list_q.bind(staff_id);
        }
        if let Some(date_from) = filter.date_from {
            list_q = list_q.bind(date_from);
        }
        if let Some(date_to) = filter.date_to {
            list_q = list_q.bind(date_to);
        }
        if let Some(ref status) = filter.departure_status {
            list_q = list_q.bind(status);
        }
        let items = list_q.bind(page_size).bind(offset).fetch_all(pool).await?;

        Ok(Page::new(items, page, page_size, total_items))
    }

    /// All non-cancelled assignments of a staff member whose departure
    /// window falls within the given range, ordered by departure date.
    pub async fn schedule_for_staff(
        pool: &PgPool,
        staff_id: DbId,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<StaffAssignmentDetail>, sqlx::Error> {
        let mut conditions = vec![
            "sa.staff_id = $1".to_string(),
            "d.status <> $2".to_string(),
        ];
        let mut bind_idx: u32 = 3;

        if date_from.is_some() {
            conditions.push(format!("d.departure_date >= ${bind_idx}"));
            bind_idx += 1;
        }
        if date_to.is_some() {
            conditions.push(format!("d.return_date <= ${bind_idx}"));
        }

        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_FROM} \
             WHERE {} \
             ORDER BY d.departure_date ASC, sa.created_at ASC",
            conditions.join(" AND "),
        );

        let mut q = sqlx::query_as::<_, StaffAssignmentDetail>(&query)
            .bind(staff_id)
            .bind(DEPARTURE_CANCELLED);
        if let Some(from) = date_from {
            q = q.bind(from);
        }
        if let Some(to) = date_to {
            q = q.bind(to);
        }

        q.fetch_all(pool).await
    }
}
