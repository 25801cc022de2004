//! Shared helpers for the HTTP-level test suites.

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use hotel_engine::api::{AppState, create_router};
use hotel_engine::config::ConfigLoader;
use hotel_engine::context::FixedClock;
use hotel_engine::error::HotelResult;
use hotel_engine::services::face::FaceRecognizer;
use hotel_engine::store::Store;

/// Image that contains no face.
pub const NO_FACE: &str = "blank-wall";

/// Recognizer that matches images equal to the stored reference.
pub struct MirrorFace;

#[async_trait]
impl FaceRecognizer for MirrorFace {
    async fn detect(&self, image_base64: &str) -> HotelResult<usize> {
        Ok(if image_base64 == NO_FACE { 0 } else { 1 })
    }

    async fn compare(&self, image_base64: &str, reference_base64: &str) -> HotelResult<Decimal> {
        Ok(if image_base64 == reference_base64 {
            Decimal::from(97)
        } else {
            Decimal::from(12)
        })
    }
}

pub fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/hotel").expect("Failed to load config")
}

pub fn datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

/// A router over `store` whose clock is frozen at `now` (`YYYY-MM-DD HH:MM:SS`).
pub fn router_at(store: &Store, now: &str) -> Router {
    let state = AppState::new(
        load_config(),
        store.clone(),
        Arc::new(FixedClock(datetime(now))),
        Arc::new(MirrorFace),
    );
    create_router(state)
}

pub fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Reads a decimal serialized as a JSON string.
pub fn money(value: &Value) -> Decimal {
    decimal(value.as_str().unwrap_or_else(|| panic!("expected decimal string, got {}", value)))
}

/// Sends one request and returns the status with the parsed body
/// (`Value::Null` for empty bodies).
pub async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = router.oneshot(builder.body(body).unwrap()).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };
    (status, json)
}

/// Sends a request that must succeed and returns its `data`.
pub async fn data(router: Router, method: &str, uri: &str, body: Option<Value>) -> Value {
    let (status, json) = send(router, method, uri, body).await;
    assert!(
        status.is_success(),
        "{} {} failed with {}: {}",
        method,
        uri,
        status,
        json
    );
    assert_eq!(json["status"], "success");
    json["data"].clone()
}

/// Reads a UUID-valued field.
pub fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}
