//! HTTP API for the hotel back office.
//!
//! This module provides the REST endpoints over the service layer: rooms,
//! bookings, promotions, staff attendance, payroll and statistics.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{ACTOR_HEADER, Actor, ApiPath, ApiQuery};
pub use response::{ApiError, ApiErrorResponse, ApiResponse, ApiSuccess};
pub use state::AppState;
