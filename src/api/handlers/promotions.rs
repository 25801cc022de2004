//! Promotion campaign handlers.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::info;
use uuid::Uuid;

use crate::api::request::{Actor, ApiPath, ApiQuery, PromotionListQuery};
use crate::api::response::ApiResponse;
use crate::api::state::AppState;
use crate::models::Promotion;
use crate::services::promotions::{
    self, CodeCheck, PromotionInput, PromotionUpdate, SweepReport,
};

use super::{ApiResult, failed, read_json};

pub(super) async fn list_promotions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PromotionListQuery>,
) -> ApiResult<Vec<Promotion>> {
    let promotions = promotions::list_promotions(state.store(), query.status).await;
    Ok(ApiResponse::ok("Promotions retrieved", promotions))
}

pub(super) async fn get_promotion(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Promotion> {
    let correlation_id = Uuid::new_v4();
    let promotion = promotions::get_promotion(state.store(), id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Promotion retrieved", promotion))
}

pub(super) async fn create_promotion(
    State(state): State<AppState>,
    Actor(actor): Actor,
    payload: Result<Json<PromotionInput>, JsonRejection>,
) -> ApiResult<Promotion> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(correlation_id = %correlation_id, code = %input.code, "Creating promotion");

    let ctx = state.context(actor);
    let promotion = promotions::create_promotion(state.store(), &ctx, input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::created("Promotion created", promotion))
}

pub(super) async fn update_promotion(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
    payload: Result<Json<PromotionUpdate>, JsonRejection>,
) -> ApiResult<Promotion> {
    let correlation_id = Uuid::new_v4();
    let input = read_json(correlation_id, payload)?;
    info!(correlation_id = %correlation_id, promotion_id = %id, "Updating promotion");

    let ctx = state.context(actor);
    let promotion = promotions::update_promotion(state.store(), &ctx, id, input)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Promotion updated", promotion))
}

pub(super) async fn cancel_promotion(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Promotion> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, promotion_id = %id, "Cancelling promotion");

    let ctx = state.context(actor);
    let promotion = promotions::cancel_promotion(state.store(), &ctx, id)
        .await
        .map_err(|e| failed(correlation_id, e))?;
    Ok(ApiResponse::ok("Promotion cancelled", promotion))
}

/// Runs the status sweep on demand; the server also runs it on a timer.
pub(super) async fn sweep(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> ApiResult<SweepReport> {
    let correlation_id = Uuid::new_v4();
    let ctx = state.context(actor);
    let report = promotions::sweep(state.store(), &ctx)
        .await
        .map_err(|e| failed(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        checked = report.checked,
        changed = report.changed,
        "Promotion sweep finished"
    );
    Ok(ApiResponse::ok("Promotions refreshed", report))
}

/// Reports whether a code can be redeemed today. Unknown codes are not errors.
pub(super) async fn validate_code(
    State(state): State<AppState>,
    Actor(actor): Actor,
    ApiPath(code): ApiPath<String>,
) -> ApiResult<CodeCheck> {
    let ctx = state.context(actor);
    let check = promotions::check_code(state.store(), &ctx, &code).await;
    let message = if check.valid {
        "Promotion code is valid"
    } else {
        "Promotion code is not valid"
    };
    Ok(ApiResponse::ok(message, check))
}
