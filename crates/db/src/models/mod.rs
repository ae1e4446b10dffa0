//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - Joined "detail" structs where an operation returns enriched rows

pub mod departure;
pub mod seat_assignment;
pub mod staff_assignment;
pub mod transport;
