//! Tourwise domain core.
//!
//! Pure domain logic with zero internal dependencies: shared type aliases,
//! the domain error taxonomy, scheduling and transport constants, and the
//! validation helpers used by both the repository and API layers.

pub mod error;
pub mod pagination;
pub mod scheduling;
pub mod transport;
pub mod types;
