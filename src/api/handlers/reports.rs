//! Payroll, revenue statistics, the payment gateway return and health.

use std::collections::BTreeMap;

use axum::extract::State;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::api::request::{Actor, ApiQuery};
use crate::api::response::ApiResponse;
use crate::api::state::AppState;
use crate::models::Payroll;
use crate::services::payment_gateway::{self, GatewayOutcome};
use crate::services::payroll::{self, PayrollQuery};
use crate::services::statistics::{self, RevenueQuery, RevenueReport};

use super::{ApiResult, failed};

/// Liveness payload.
#[derive(Debug, Serialize)]
pub(super) struct Health {
    hotel: String,
    version: String,
}

pub(super) async fn health(State(state): State<AppState>) -> ApiResult<Health> {
    let metadata = state.config().metadata();
    Ok(ApiResponse::ok(
        "OK",
        Health {
            hotel: metadata.code.clone(),
            version: metadata.version.clone(),
        },
    ))
}

/// Computes an employee's monthly payroll from attendance.
pub(super) async fn run_payroll(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiQuery(query): ApiQuery<PayrollQuery>,
) -> ApiResult<Payroll> {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        employee_id = %query.employee_id,
        month = %query.month,
        "Running payroll"
    );

    let ctx = state.context(actor);
    let multiplier = state.config().policy().payroll.overtime_multiplier;
    let payroll = payroll::run_payroll(state.store(), &ctx, multiplier, &query)
        .await
        .map_err(|e| failed(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        gross_pay = %payroll.totals.gross_pay,
        "Payroll computed"
    );
    Ok(ApiResponse::ok("Payroll computed", payroll))
}

pub(super) async fn revenue_report(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RevenueQuery>,
) -> ApiResult<RevenueReport> {
    let correlation_id = Uuid::new_v4();
    let report = statistics::revenue_report(state.store(), query)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Revenue report", report))
}

/// Browser redirect back from the online payment gateway.
pub(super) async fn gateway_return(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiQuery(params): ApiQuery<BTreeMap<String, String>>,
) -> ApiResult<GatewayOutcome> {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        booking_id = params.get(payment_gateway::BOOKING_ID).map(String::as_str).unwrap_or(""),
        "Payment gateway return"
    );

    let ctx = state.context(actor);
    let outcome = payment_gateway::handle_return(
        state.store(),
        &ctx,
        state.config().payment_gateway(),
        &params,
    )
    .await
    .map_err(|e| failed(correlation_id, e))?;

    let message = if outcome.success {
        "Deposit paid online"
    } else {
        "Payment was not completed"
    };
    Ok(ApiResponse::ok(message, outcome))
}
