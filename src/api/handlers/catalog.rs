//! Room types, amenities, extra services and customers.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::info;
use uuid::Uuid;

use crate::api::request::{Actor, ApiPath, ApiQuery, CustomerSearch};
use crate::api::response::ApiResponse;
use crate::api::state::AppState;
use crate::models::{Amenity, Customer, RoomType, ServiceItem};
use crate::services::catalog::{self, CustomerInput, RoomTypeInput, ServiceItemInput};

use super::{ApiResult, failed, read_json};

pub(super) async fn list_room_types(State(state): State<AppState>) -> ApiResult<Vec<RoomType>> {
    let types = catalog::list_room_types(state.store()).await;
    Ok(ApiResponse::ok("Room types retrieved", types))
}

pub(super) async fn get_room_type(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<RoomType> {
    let correlation_id = Uuid::new_v4();
    let room_type = catalog::get_room_type(state.store(), id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Room type retrieved", room_type))
}

pub(super) async fn create_room_type(
    State(state): State<AppState>,
    Actor(actor): Actor,
    payload: Result<Json<RoomTypeInput>, JsonRejection>,
) -> ApiResult<RoomType> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(correlation_id = %correlation_id, name = %input.name, "Creating room type");

    let ctx = state.context(actor);
    let room_type = catalog::create_room_type(state.store(), &ctx, input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::created("Room type created", room_type))
}

pub(super) async fn update_room_type(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
    payload: Result<Json<RoomTypeInput>, JsonRejection>,
) -> ApiResult<RoomType> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(correlation_id = %correlation_id, room_type_id = %id, "Updating room type");

    let ctx = state.context(actor);
    let room_type = catalog::update_room_type(state.store(), &ctx, id, input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Room type updated", room_type))
}

pub(super) async fn list_amenities(State(state): State<AppState>) -> ApiResult<Vec<Amenity>> {
    Ok(ApiResponse::ok(
        "Amenities retrieved",
        catalog::list_amenities(state.store()).await,
    ))
}

pub(super) async fn list_services(State(state): State<AppState>) -> ApiResult<Vec<ServiceItem>> {
    Ok(ApiResponse::ok(
        "Services retrieved",
        catalog::list_services(state.store()).await,
    ))
}

pub(super) async fn create_service(
    State(state): State<AppState>,
    Actor(actor): Actor,
    payload: Result<Json<ServiceItemInput>, JsonRejection>,
) -> ApiResult<ServiceItem> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(correlation_id = %correlation_id, name = %input.name, "Creating service");

    let ctx = state.context(actor);
    let service = catalog::create_service(state.store(), &ctx, input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::created("Service created", service))
}

pub(super) async fn list_customers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CustomerSearch>,
) -> ApiResult<Vec<Customer>> {
    let customers = catalog::list_customers(state.store(), query.search.as_deref()).await;
    Ok(ApiResponse::ok("Customers retrieved", customers))
}

pub(super) async fn get_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Customer> {
    let correlation_id = Uuid::new_v4();
    let customer = catalog::get_customer(state.store(), id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Customer retrieved", customer))
}

pub(super) async fn create_customer(
    State(state): State<AppState>,
    Actor(actor): Actor,
    payload: Result<Json<CustomerInput>, JsonRejection>,
) -> ApiResult<Customer> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(correlation_id = %correlation_id, "Registering customer");

    let ctx = state.context(actor);
    let customer = catalog::create_customer(state.store(), &ctx, input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::created("Customer created", customer))
}
