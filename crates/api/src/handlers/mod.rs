pub mod staff_assignments;
pub mod transport;
