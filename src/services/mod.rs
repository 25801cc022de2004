//! Service operations.
//!
//! Each module owns the typed inputs for its resource and runs every mutation
//! inside one [`crate::store::Store::transaction`]. Operations take an explicit
//! [`crate::context::RequestContext`] instead of reading the clock.

pub mod attendance;
pub mod bookings;
pub mod catalog;
pub mod face;
pub mod overtime;
pub mod payment_gateway;
pub mod payroll;
pub mod promotions;
pub mod rooms;
pub mod scheduling;
pub mod statistics;
pub mod validation;
