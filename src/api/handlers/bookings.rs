//! Booking lifecycle handlers.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::info;
use uuid::Uuid;

use crate::api::request::{
    Actor, ApiPath, ApiQuery, ApplyPromotionRequest, CheckoutRequest, PayDepositRequest,
};
use crate::api::response::ApiResponse;
use crate::api::state::AppState;
use crate::models::Booking;
use crate::services::bookings::{
    self, BookingFilter, BookingInput, BookingUpdate, CheckoutReceipt, DepositReceipt, Quote,
    ServiceLineInput,
};
use crate::services::promotions;

use super::{ApiResult, failed, read_json};

pub(super) async fn list_bookings(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<BookingFilter>,
) -> ApiResult<Vec<Booking>> {
    let bookings = bookings::list_bookings(state.store(), &filter).await;
    Ok(ApiResponse::ok("Bookings retrieved", bookings))
}

pub(super) async fn get_booking(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Booking> {
    let correlation_id = Uuid::new_v4();
    let booking = bookings::get_booking(state.store(), id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Booking retrieved", booking))
}

/// Creates a booking, confirmed at once when no deposit is required.
pub(super) async fn create_booking(
    State(state): State<AppState>,
    Actor(actor): Actor,
    payload: Result<Json<BookingInput>, JsonRejection>,
) -> ApiResult<Booking> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        customer_id = %input.customer_id,
        rooms = input.room_ids.len(),
        check_in_date = %input.check_in_date,
        check_out_date = %input.check_out_date,
        "Creating booking"
    );

    let ctx = state.context(actor);
    let booking = bookings::create_booking(state.store(), &ctx, input)
        .await
        .map_err(|e| failed(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        booking_id = %booking.id,
        total = %booking.total_amount,
        "Booking created"
    );
    Ok(ApiResponse::created("Booking created", booking))
}

pub(super) async fn update_booking(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
    payload: Result<Json<BookingUpdate>, JsonRejection>,
) -> ApiResult<Booking> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(correlation_id = %correlation_id, booking_id = %id, "Updating booking");

    let ctx = state.context(actor);
    let booking = bookings::update_booking(state.store(), &ctx, id, input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Booking updated", booking))
}

/// Prices a prospective booking without saving it.
pub(super) async fn quote(
    State(state): State<AppState>,
    Actor(actor): Actor,
    payload: Result<Json<BookingInput>, JsonRejection>,
) -> ApiResult<Quote> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;

    let ctx = state.context(actor);
    let quote = bookings::quote(state.store(), &ctx, input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Quote computed", quote))
}

pub(super) async fn check_in(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Booking> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, booking_id = %id, "Checking in");

    let ctx = state.context(actor);
    let booking = bookings::check_in(state.store(), &ctx, id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Checked in", booking))
}

/// Closes the stay and issues the invoice.
pub(super) async fn check_out(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> ApiResult<CheckoutReceipt> {
    let correlation_id = Uuid::new_v4();
    let request = read_json(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        booking_id = %id,
        payment_method = ?request.payment_method,
        "Checking out"
    );

    let ctx = state.context(actor);
    let receipt = bookings::check_out(state.store(), &ctx, id, request.payment_method)
        .await
        .map_err(|e| failed(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        invoice_id = %receipt.invoice.id,
        amount = %receipt.invoice.total_amount,
        "Invoice issued"
    );
    Ok(ApiResponse::ok("Checked out", receipt))
}

pub(super) async fn cancel(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Booking> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, booking_id = %id, "Cancelling booking");

    let ctx = state.context(actor);
    let booking = bookings::cancel(state.store(), &ctx, id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Booking cancelled", booking))
}

pub(super) async fn pay_deposit(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
    payload: Result<Json<PayDepositRequest>, JsonRejection>,
) -> ApiResult<DepositReceipt> {
    let correlation_id = Uuid::new_v4();
    let request = read_json(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        booking_id = %id,
        payment_method = ?request.payment_method,
        "Recording deposit"
    );

    let ctx = state.context(actor);
    let receipt = bookings::pay_deposit(
        state.store(),
        &ctx,
        id,
        request.payment_method,
        request.reference,
    )
    .await
    .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Deposit recorded", receipt))
}

pub(super) async fn pay_by_cash(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<DepositReceipt> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, booking_id = %id, "Recording cash deposit");

    let ctx = state.context(actor);
    let receipt = bookings::pay_by_cash(state.store(), &ctx, id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Deposit recorded", receipt))
}

pub(super) async fn apply_promotion(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
    payload: Result<Json<ApplyPromotionRequest>, JsonRejection>,
) -> ApiResult<Booking> {
    let correlation_id = Uuid::new_v4();
    let request = read_json(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        booking_id = %id,
        code = %request.code,
        "Applying promotion"
    );

    let ctx = state.context(actor);
    let booking = promotions::apply_to_booking(state.store(), &ctx, id, &request.code)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Promotion applied", booking))
}

pub(super) async fn add_service(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
    payload: Result<Json<ServiceLineInput>, JsonRejection>,
) -> ApiResult<Booking> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        booking_id = %id,
        service_id = %input.service_id,
        "Adding service"
    );

    let ctx = state.context(actor);
    let booking = bookings::add_service(state.store(), &ctx, id, input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Service added", booking))
}

pub(super) async fn remove_service(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath((id, line_id)): ApiPath<(Uuid, Uuid)>,
) -> ApiResult<Booking> {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        booking_id = %id,
        line_id = %line_id,
        "Removing service"
    );

    let ctx = state.context(actor);
    let booking = bookings::remove_service(state.store(), &ctx, id, line_id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Service removed", booking))
}
