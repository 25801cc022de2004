//! Request types and extractors for the hotel API.
//!
//! Path and query extractors here answer rejections with the JSON error
//! envelope instead of axum's plain-text bodies.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::models::{PaymentMethod, PromotionStatus, RoomStatus};

use super::response::ApiErrorResponse;

/// Header naming the staff member performing the request.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Path parameters.
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => Err(ApiErrorResponse::bad_request(
                "INVALID_PATH",
                rejection.body_text(),
            )),
        }
    }
}

/// Query string parameters.
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(ApiErrorResponse::bad_request(
                "INVALID_QUERY",
                rejection.body_text(),
            )),
        }
    }
}

/// The acting staff member from the `x-actor-id` header, if any.
#[derive(Debug, Clone, Copy)]
pub struct Actor(pub Option<Uuid>);

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ACTOR_HEADER) else {
            return Ok(Actor(None));
        };
        value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<Uuid>().ok())
            .map(|id| Actor(Some(id)))
            .ok_or_else(|| {
                ApiErrorResponse::bad_request("INVALID_ACTOR", "x-actor-id must be a UUID")
            })
    }
}

/// Body of `PATCH /rooms/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStatusRequest {
    /// New housekeeping status.
    pub status: RoomStatus,
}

/// Query of `GET /customers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerSearch {
    /// Matches name, phone or email.
    pub search: Option<String>,
}

/// Query of `GET /promotions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromotionListQuery {
    /// Only promotions in this status.
    pub status: Option<PromotionStatus>,
}

/// Body of `POST /bookings/{id}/check-out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// How the balance is settled.
    #[serde(default = "default_method")]
    pub payment_method: PaymentMethod,
}

/// Body of `POST /bookings/{id}/pay-deposit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayDepositRequest {
    /// Payment channel.
    #[serde(default = "default_method")]
    pub payment_method: PaymentMethod,
    /// Terminal or gateway transaction reference.
    pub reference: Option<String>,
}

fn default_method() -> PaymentMethod {
    PaymentMethod::Cash
}

/// Body of `POST /bookings/{id}/promotion`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyPromotionRequest {
    /// Promotion code, any case.
    pub code: String,
}
