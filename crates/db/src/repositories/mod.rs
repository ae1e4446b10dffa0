//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that enforce business
//! rules (availability, capacity, seat uniqueness) run their check and
//! write inside a single transaction holding an advisory lock on the
//! contended resource, and return [`crate::error::RepoError`].

pub mod departure_repo;
pub mod seat_assignment_repo;
pub mod staff_assignment_repo;
pub mod transport_leg_repo;

pub use departure_repo::DepartureRepo;
pub use seat_assignment_repo::SeatAssignmentRepo;
pub use staff_assignment_repo::StaffAssignmentRepo;
pub use transport_leg_repo::TransportLegRepo;
