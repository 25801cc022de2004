//! Hotel back office engine
//!
//! This crate manages the rooms, bookings and promotions of a hotel, and the
//! attendance, overtime and payroll of its staff. Money is handled as
//! [`rust_decimal::Decimal`]; policy thresholds come from YAML configuration.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
