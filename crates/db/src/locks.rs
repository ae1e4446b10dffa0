//! Transaction-scoped advisory locks serializing check-then-write sequences.
//!
//! Two concurrent writers against the same staff member (or the same
//! transport leg) must not both pass the availability/capacity read before
//! either insert commits. Each manager method takes the lock for its
//! contended resource at the top of its transaction; Postgres releases it
//! automatically at commit or rollback.

use sqlx::PgConnection;
use tourwise_core::types::DbId;

/// Lock class for per-staff scheduling writes.
pub const STAFF_SCHEDULING: i64 = 1;

/// Lock class for per-transport-leg seating writes.
pub const TRANSPORT_SEATING: i64 = 2;

/// Take a transaction-scoped advisory lock on `(class, id)`.
///
/// The class tag occupies the top byte of the 64-bit key, keeping the staff
/// and transport key spaces disjoint.
pub async fn acquire(conn: &mut PgConnection, class: i64, id: DbId) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind((class << 56) ^ id)
        .execute(conn)
        .await?;
    Ok(())
}
