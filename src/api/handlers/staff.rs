//! Employees, shifts, attendance and overtime.

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use tracing::info;
use uuid::Uuid;

use crate::api::request::{Actor, ApiPath, ApiQuery};
use crate::api::response::{ApiErrorResponse, ApiResponse};
use crate::api::state::AppState;
use crate::models::{Attendance, Employee, OvertimeRequest, Shift, ShiftAssignment};
use crate::services::attendance::{self, AttendanceFilter, FaceCheckInput, FaceCheckOutcome};
use crate::services::overtime::{self, OvertimeFilter, OvertimeInput};
use crate::services::scheduling::{
    self, AssignmentFilter, EmployeeInput, FaceInput, ShiftAssignmentInput, ShiftInput,
};

use super::{ApiResult, failed, read_json};

pub(super) async fn list_employees(State(state): State<AppState>) -> ApiResult<Vec<Employee>> {
    Ok(ApiResponse::ok(
        "Employees retrieved",
        scheduling::list_employees(state.store()).await,
    ))
}

pub(super) async fn get_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Employee> {
    let correlation_id = Uuid::new_v4();
    let employee = scheduling::get_employee(state.store(), id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Employee retrieved", employee))
}

pub(super) async fn create_employee(
    State(state): State<AppState>,
    Actor(actor): Actor,
    payload: Result<Json<EmployeeInput>, JsonRejection>,
) -> ApiResult<Employee> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(correlation_id = %correlation_id, "Registering employee");

    let ctx = state.context(actor);
    let employee = scheduling::create_employee(state.store(), &ctx, input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::created("Employee created", employee))
}

/// Stores the reference portrait used by face check-in.
pub(super) async fn set_face(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
    payload: Result<Json<FaceInput>, JsonRejection>,
) -> ApiResult<Employee> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(correlation_id = %correlation_id, employee_id = %id, "Registering face");

    let ctx = state.context(actor);
    let employee = scheduling::set_face(state.store(), &ctx, state.face().as_ref(), id, input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Face registered", employee))
}

pub(super) async fn list_shifts(State(state): State<AppState>) -> ApiResult<Vec<Shift>> {
    Ok(ApiResponse::ok(
        "Shifts retrieved",
        scheduling::list_shifts(state.store()).await,
    ))
}

pub(super) async fn create_shift(
    State(state): State<AppState>,
    Actor(actor): Actor,
    payload: Result<Json<ShiftInput>, JsonRejection>,
) -> ApiResult<Shift> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(correlation_id = %correlation_id, name = %input.name, "Creating shift");

    let ctx = state.context(actor);
    let shift = scheduling::create_shift(state.store(), &ctx, input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::created("Shift created", shift))
}

pub(super) async fn list_assignments(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<AssignmentFilter>,
) -> ApiResult<Vec<ShiftAssignment>> {
    let assignments = scheduling::list_assignments(state.store(), &filter).await;
    Ok(ApiResponse::ok("Shift assignments retrieved", assignments))
}

pub(super) async fn assign_shift(
    State(state): State<AppState>,
    Actor(actor): Actor,
    payload: Result<Json<ShiftAssignmentInput>, JsonRejection>,
) -> ApiResult<ShiftAssignment> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %input.employee_id,
        shift_id = %input.shift_id,
        work_date = %input.work_date,
        "Assigning shift"
    );

    let ctx = state.context(actor);
    let assignment =
        scheduling::assign_shift(state.store(), &ctx, state.config().attendance(), input)
            .await
            .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::created("Shift assigned", assignment))
}

pub(super) async fn list_attendances(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<AttendanceFilter>,
) -> ApiResult<Vec<Attendance>> {
    let records = attendance::list_attendances(state.store(), &filter).await;
    Ok(ApiResponse::ok("Attendance retrieved", records))
}

/// Recognizes a face and opens or closes the matching attendance record.
pub(super) async fn face_check(
    State(state): State<AppState>,
    Actor(actor): Actor,
    payload: Result<Json<FaceCheckInput>, JsonRejection>,
) -> ApiResult<FaceCheckOutcome> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(correlation_id = %correlation_id, "Face check requested");

    let ctx = state.context(actor);
    let threshold = state
        .config()
        .config()
        .integrations()
        .face_recognition
        .confidence_threshold;
    let outcome = attendance::face_check(
        state.store(),
        &ctx,
        state.config().attendance(),
        state.face().as_ref(),
        threshold,
        input,
    )
    .await
    .map_err(|e| failed(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        employee_id = %outcome.employee.id,
        action = ?outcome.action,
        confidence = %outcome.confidence,
        "Face check recorded"
    );
    let message = match outcome.action {
        attendance::FaceCheckAction::CheckIn => "Checked in",
        attendance::FaceCheckAction::CheckOut => "Checked out",
    };
    Ok(ApiResponse::ok(message, outcome))
}

pub(super) async fn list_overtime(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<OvertimeFilter>,
) -> ApiResult<Vec<OvertimeRequest>> {
    let requests = overtime::list_overtime(state.store(), &filter).await;
    Ok(ApiResponse::ok("Overtime requests retrieved", requests))
}

pub(super) async fn create_overtime(
    State(state): State<AppState>,
    Actor(actor): Actor,
    payload: Result<Json<OvertimeInput>, JsonRejection>,
) -> ApiResult<OvertimeRequest> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %input.employee_id,
        work_date = %input.work_date,
        overtime_type = ?input.overtime_type,
        "Creating overtime request"
    );

    let ctx = state.context(actor);
    let request = overtime::create_overtime(state.store(), &ctx, state.config().attendance(), input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::created("Overtime request created", request))
}

pub(super) async fn delete_overtime(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, overtime_id = %id, "Deleting overtime request");

    let ctx = state.context(actor);
    overtime::delete_overtime(state.store(), &ctx, id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(StatusCode::NO_CONTENT)
}
