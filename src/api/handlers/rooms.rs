//! Room inventory handlers.

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use tracing::info;
use uuid::Uuid;

use crate::api::request::{Actor, ApiPath, ApiQuery, SetStatusRequest};
use crate::api::response::{ApiErrorResponse, ApiResponse};
use crate::api::state::AppState;
use crate::models::Room;
use crate::services::rooms::{self, AvailabilityQuery, RoomAvailability, RoomFilter, RoomInput};

use super::{ApiResult, failed, read_json};

pub(super) async fn list_rooms(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<RoomFilter>,
) -> ApiResult<Vec<Room>> {
    let rooms = rooms::list_rooms(state.store(), &filter).await;
    Ok(ApiResponse::ok("Rooms retrieved", rooms))
}

pub(super) async fn get_room(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Room> {
    let correlation_id = Uuid::new_v4();
    let room = rooms::get_room(state.store(), id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Room retrieved", room))
}

pub(super) async fn create_room(
    State(state): State<AppState>,
    Actor(actor): Actor,
    payload: Result<Json<RoomInput>, JsonRejection>,
) -> ApiResult<Room> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        number = %input.number,
        room_type_id = %input.room_type_id,
        "Creating room"
    );

    let ctx = state.context(actor);
    let room = rooms::create_room(state.store(), &ctx, input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::created("Room created", room))
}

pub(super) async fn update_room(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
    payload: Result<Json<RoomInput>, JsonRejection>,
) -> ApiResult<Room> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(correlation_id = %correlation_id, room_id = %id, "Updating room");

    let ctx = state.context(actor);
    let room = rooms::update_room(state.store(), &ctx, id, input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Room updated", room))
}

pub(super) async fn delete_room(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, room_id = %id, "Deleting room");

    let ctx = state.context(actor);
    rooms::delete_room(state.store(), &ctx, id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn restore_room(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Room> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, room_id = %id, "Restoring room");

    let ctx = state.context(actor);
    let room = rooms::restore_room(state.store(), &ctx, id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Room restored", room))
}

pub(super) async fn set_room_status(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
    payload: Result<Json<SetStatusRequest>, JsonRejection>,
) -> ApiResult<Room> {
    let correlation_id = Uuid::new_v4();
    let request = read_json(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        room_id = %id,
        status = ?request.status,
        "Setting room status"
    );

    let ctx = state.context(actor);
    let room = rooms::set_room_status(state.store(), &ctx, id, request.status)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Room status updated", room))
}

pub(super) async fn check_availability(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<AvailabilityQuery>,
) -> ApiResult<RoomAvailability> {
    let correlation_id = Uuid::new_v4();
    let availability = rooms::check_availability(state.store(), id, &query)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Availability checked", availability))
}
