//! HTTP request handlers for the hotel API.
//!
//! Every handler tags its work with a fresh correlation id, builds a
//! [`crate::context::RequestContext`] from the application clock and the
//! optional `x-actor-id` header, and converts service errors to the error
//! envelope.

mod bookings;
mod catalog;
mod promotions;
mod reports;
mod rooms;
mod staff;

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    routing::{get, patch, post, put},
};
use tracing::warn;
use uuid::Uuid;

use crate::error::HotelError;

use super::response::{ApiError, ApiErrorResponse, ApiResponse};
use super::state::AppState;

/// Result type of every JSON handler.
type ApiResult<T> = Result<ApiResponse<T>, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(reports::health))
        .route(
            "/room-types",
            get(catalog::list_room_types).post(catalog::create_room_type),
        )
        .route(
            "/room-types/:id",
            get(catalog::get_room_type).put(catalog::update_room_type),
        )
        .route("/amenities", get(catalog::list_amenities))
        .route(
            "/services",
            get(catalog::list_services).post(catalog::create_service),
        )
        .route(
            "/customers",
            get(catalog::list_customers).post(catalog::create_customer),
        )
        .route("/customers/:id", get(catalog::get_customer))
        .route("/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route(
            "/rooms/:id",
            get(rooms::get_room)
                .put(rooms::update_room)
                .delete(rooms::delete_room),
        )
        .route("/rooms/:id/restore", post(rooms::restore_room))
        .route("/rooms/:id/status", patch(rooms::set_room_status))
        .route("/rooms/:id/availability", get(rooms::check_availability))
        .route(
            "/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/bookings/quote", post(bookings::quote))
        .route(
            "/bookings/:id",
            get(bookings::get_booking).put(bookings::update_booking),
        )
        .route("/bookings/:id/check-in", post(bookings::check_in))
        .route("/bookings/:id/check-out", post(bookings::check_out))
        .route("/bookings/:id/cancel", post(bookings::cancel))
        .route("/bookings/:id/pay-deposit", post(bookings::pay_deposit))
        .route("/bookings/:id/pay-by-cash", post(bookings::pay_by_cash))
        .route("/bookings/:id/promotion", post(bookings::apply_promotion))
        .route("/bookings/:id/services", post(bookings::add_service))
        .route(
            "/bookings/:id/services/:line_id",
            axum::routing::delete(bookings::remove_service),
        )
        .route(
            "/promotions",
            get(promotions::list_promotions).post(promotions::create_promotion),
        )
        .route("/promotions/sweep", post(promotions::sweep))
        .route("/promotions/validate/:code", get(promotions::validate_code))
        .route(
            "/promotions/:id",
            get(promotions::get_promotion).put(promotions::update_promotion),
        )
        .route("/promotions/:id/cancel", post(promotions::cancel_promotion))
        .route(
            "/employees",
            get(staff::list_employees).post(staff::create_employee),
        )
        .route("/employees/:id", get(staff::get_employee))
        .route("/employees/:id/face", put(staff::set_face))
        .route("/shifts", get(staff::list_shifts).post(staff::create_shift))
        .route(
            "/shift-assignments",
            get(staff::list_assignments).post(staff::assign_shift),
        )
        .route("/attendances", get(staff::list_attendances))
        .route("/attendances/face-check", post(staff::face_check))
        .route(
            "/overtime-requests",
            get(staff::list_overtime).post(staff::create_overtime),
        )
        .route(
            "/overtime-requests/:id",
            axum::routing::delete(staff::delete_overtime),
        )
        .route("/payrolls", get(reports::run_payroll))
        .route("/statistics/revenue", get(reports::revenue_report))
        .route("/payments/gateway-return", get(reports::gateway_return))
        .with_state(state)
}

/// Unwraps a JSON body, mapping rejections to a 400 envelope.
fn read_json<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse {
        status: axum::http::StatusCode::BAD_REQUEST,
        error,
    })
}

/// Logs a rejected operation and converts the error to its envelope.
///
/// Server-side failures are logged by the conversion itself.
fn failed(correlation_id: Uuid, err: HotelError) -> ApiErrorResponse {
    if !err.is_server_error() {
        warn!(correlation_id = %correlation_id, error = %err, "Request rejected");
    }
    err.into()
}
