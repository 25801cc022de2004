//! HTTP integration tests for the booking side of the hotel API.
//!
//! This test suite covers:
//! - Catalog setup (room types, rooms, customers, services)
//! - Booking creation, pricing and promotions
//! - Check-in, check-out and invoicing
//! - Online deposit confirmation through the payment gateway return
//! - Error envelopes and status codes

mod common;

use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{data, decimal, id_of, load_config, money, router_at, send};
use hotel_engine::services::payment_gateway;
use hotel_engine::store::Store;

const BEFORE_ARRIVAL: &str = "2025-01-09 10:00:00";
const ARRIVAL: &str = "2025-01-10 14:00:00";
const DEPARTURE: &str = "2025-01-12 11:00:00";

// =============================================================================
// Test Helpers
// =============================================================================

struct Hotel {
    store: Store,
    customer_id: String,
    room_ids: Vec<String>,
}

/// Seeds one "Deluxe" type at 500,000/night with `rooms` rooms and one guest.
async fn hotel(rooms: usize) -> Hotel {
    let store = Store::new();
    let room_type = data(
        router_at(&store, BEFORE_ARRIVAL),
        "POST",
        "/room-types",
        Some(json!({
            "name": "Deluxe",
            "nightly_rate": "500000",
            "hourly_rate": "120000",
            "max_occupancy": 2,
            "amenities": [{"name": "Minibar"}, {"name": "Towel", "quantity": 4}]
        })),
    )
    .await;

    let mut room_ids = Vec::new();
    for n in 0..rooms {
        let room = data(
            router_at(&store, BEFORE_ARRIVAL),
            "POST",
            "/rooms",
            Some(json!({"number": format!("10{}", n + 1), "room_type_id": id_of(&room_type)})),
        )
        .await;
        room_ids.push(id_of(&room));
    }

    let customer = data(
        router_at(&store, BEFORE_ARRIVAL),
        "POST",
        "/customers",
        Some(json!({"full_name": "Nguyen Van A", "phone": "0901234567"})),
    )
    .await;

    Hotel {
        store,
        customer_id: id_of(&customer),
        room_ids,
    }
}

fn booking_body(hotel: &Hotel, room: usize, deposit: &str) -> Value {
    json!({
        "customer_id": hotel.customer_id,
        "room_ids": [hotel.room_ids[room]],
        "check_in_date": "2025-01-10",
        "check_out_date": "2025-01-12",
        "deposit_amount": deposit
    })
}

async fn create_promotion(hotel: &Hotel, code: &str, usage_limit: u32) -> Value {
    data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        "/promotions",
        Some(json!({
            "code": code,
            "discount_type": "percent",
            "discount_value": "10",
            "usage_limit": usage_limit
        })),
    )
    .await
}

fn signed_query(params: &[(&str, &str)]) -> String {
    let mut map: BTreeMap<String, String> = params
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let secret = load_config().payment_gateway().hash_secret.clone();
    let hash = payment_gateway::sign(&map, &secret).unwrap();
    map.insert(payment_gateway::SECURE_HASH.to_string(), hash);
    map.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_health_reports_hotel_code() {
    let store = Store::new();
    let body = data(router_at(&store, BEFORE_ARRIVAL), "GET", "/health", None).await;
    assert_eq!(body["hotel"], "RVS");
}

#[tokio::test]
async fn test_room_type_creates_amenities_on_first_use() {
    let hotel = hotel(1).await;
    let amenities = data(router_at(&hotel.store, BEFORE_ARRIVAL), "GET", "/amenities", None).await;
    let names: Vec<&str> = amenities
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Minibar", "Towel"]);
}

#[tokio::test]
async fn test_duplicate_room_number_is_rejected() {
    let hotel = hotel(1).await;
    let room = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "GET",
        &format!("/rooms/{}", hotel.room_ids[0]),
        None,
    )
    .await;

    let (status, body) = send(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        "/rooms",
        Some(json!({"number": "101", "room_type_id": room["room_type_id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_deleted_room_is_hidden_until_restored() {
    let hotel = hotel(1).await;
    let uri = format!("/rooms/{}", hotel.room_ids[0]);

    let (status, body) = send(router_at(&hotel.store, BEFORE_ARRIVAL), "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(router_at(&hotel.store, BEFORE_ARRIVAL), "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let rooms = data(router_at(&hotel.store, BEFORE_ARRIVAL), "GET", "/rooms", None).await;
    assert!(rooms.as_array().unwrap().is_empty());

    data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        &format!("{}/restore", uri),
        None,
    )
    .await;
    let room = data(router_at(&hotel.store, BEFORE_ARRIVAL), "GET", &uri, None).await;
    assert_eq!(room["status"], "available");
}

#[tokio::test]
async fn test_customer_search_matches_phone() {
    let hotel = hotel(0).await;
    let found = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "GET",
        "/customers?search=0901",
        None,
    )
    .await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let none = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "GET",
        "/customers?search=tran",
        None,
    )
    .await;
    assert!(none.as_array().unwrap().is_empty());
}

// =============================================================================
// Bookings
// =============================================================================

/// Two nights at 500,000 with SAVE10 (10%): discount 100,000, total 900,000.
#[tokio::test]
async fn test_booking_with_promotion_totals() {
    let hotel = hotel(1).await;
    create_promotion(&hotel, "SAVE10", 5).await;

    let mut body = booking_body(&hotel, 0, "0");
    body["promotion_code"] = json!("save10");
    let booking = data(router_at(&hotel.store, BEFORE_ARRIVAL), "POST", "/bookings", Some(body)).await;

    assert_eq!(booking["status"], "Confirmed");
    assert_eq!(money(&booking["raw_total"]), decimal("1000000"));
    assert_eq!(money(&booking["discount_amount"]), decimal("100000"));
    assert_eq!(money(&booking["total_amount"]), decimal("900000"));
    assert_eq!(booking["promotions"][0]["promotion_code"], "SAVE10");
}

#[tokio::test]
async fn test_quote_does_not_persist() {
    let hotel = hotel(1).await;
    let quote = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        "/bookings/quote",
        Some(booking_body(&hotel, 0, "0")),
    )
    .await;
    assert_eq!(quote["available"], true);
    assert_eq!(money(&quote["totals"]["room_total"]), decimal("1000000"));
    assert_eq!(quote["totals"]["billable_units"], 2);

    let bookings = data(router_at(&hotel.store, BEFORE_ARRIVAL), "GET", "/bookings", None).await;
    assert!(bookings.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_overlapping_booking_reports_conflicting_room() {
    let hotel = hotel(1).await;
    data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        "/bookings",
        Some(booking_body(&hotel, 0, "0")),
    )
    .await;

    let mut second = booking_body(&hotel, 0, "0");
    second["check_in_date"] = json!("2025-01-11");
    second["check_out_date"] = json!("2025-01-13");
    let (status, body) = send(router_at(&hotel.store, BEFORE_ARRIVAL), "POST", "/bookings", Some(second)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "BUSINESS_RULE");
    assert_eq!(body["errors"]["room_ids"][0], hotel.room_ids[0].as_str());
}

#[tokio::test]
async fn test_booking_in_the_past_is_rejected() {
    let hotel = hotel(1).await;
    let (status, body) = send(
        router_at(&hotel.store, "2025-01-11 09:00:00"),
        "POST",
        "/bookings",
        Some(booking_body(&hotel, 0, "0")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["field"], "check_in_date");
}

fn hourly_body(hotel: &Hotel, date: &str, from: &str, to: &str) -> Value {
    json!({
        "customer_id": hotel.customer_id,
        "room_ids": [hotel.room_ids[0]],
        "check_in_date": date,
        "check_out_date": date,
        "check_in_at": from,
        "check_out_at": to,
        "is_hourly": true
    })
}

#[tokio::test]
async fn test_hourly_instants_must_match_dates() {
    let hotel = hotel(1).await;
    let (status, body) = send(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        "/bookings",
        Some(hourly_body(&hotel, "2025-01-12", "2025-01-10T09:00:00", "2025-01-10T11:00:00")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["errors"][0]["field"], "check_in_at");

    let bookings = data(router_at(&hotel.store, BEFORE_ARRIVAL), "GET", "/bookings", None).await;
    assert!(bookings.as_array().unwrap().is_empty());
}

/// An hourly stay on today's date that already started is refused.
#[tokio::test]
async fn test_hourly_booking_in_the_past_is_rejected() {
    let hotel = hotel(1).await;
    let (status, body) = send(
        router_at(&hotel.store, "2025-01-10 12:00:00"),
        "POST",
        "/bookings",
        Some(hourly_body(&hotel, "2025-01-10", "2025-01-10T09:00:00", "2025-01-10T11:00:00")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["errors"][0]["field"], "check_in_at");

    let later = data(
        router_at(&hotel.store, "2025-01-10 12:00:00"),
        "POST",
        "/bookings",
        Some(hourly_body(&hotel, "2025-01-10", "2025-01-10T13:00:00", "2025-01-10T15:00:00")),
    )
    .await;
    assert_eq!(later["status"], "Confirmed");
}

/// Full stay: check in, add a service, check out and read the invoice.
#[tokio::test]
async fn test_stay_lifecycle_issues_invoice() {
    let hotel = hotel(1).await;
    let service = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        "/services",
        Some(json!({"name": "Laundry", "price": "50000"})),
    )
    .await;
    let booking = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        "/bookings",
        Some(booking_body(&hotel, 0, "0")),
    )
    .await;
    let uri = format!("/bookings/{}", id_of(&booking));

    let checked_in = data(router_at(&hotel.store, ARRIVAL), "POST", &format!("{}/check-in", uri), None).await;
    assert_eq!(checked_in["status"], "Checked-in");
    let room = data(
        router_at(&hotel.store, ARRIVAL),
        "GET",
        &format!("/rooms/{}", hotel.room_ids[0]),
        None,
    )
    .await;
    assert_eq!(room["status"], "booked");

    let with_service = data(
        router_at(&hotel.store, ARRIVAL),
        "POST",
        &format!("{}/services", uri),
        Some(json!({"service_id": id_of(&service), "quantity": 2})),
    )
    .await;
    assert_eq!(money(&with_service["total_amount"]), decimal("1100000"));

    let receipt = data(
        router_at(&hotel.store, DEPARTURE),
        "POST",
        &format!("{}/check-out", uri),
        Some(json!({"payment_method": "card"})),
    )
    .await;
    assert_eq!(receipt["booking"]["status"], "Checked-out");
    assert_eq!(money(&receipt["invoice"]["amount_due"]), decimal("1100000"));
    assert_eq!(receipt["payment"]["kind"], "settlement");

    let room = data(
        router_at(&hotel.store, DEPARTURE),
        "GET",
        &format!("/rooms/{}", hotel.room_ids[0]),
        None,
    )
    .await;
    assert_eq!(room["status"], "available");

    let report = data(
        router_at(&hotel.store, DEPARTURE),
        "GET",
        "/statistics/revenue?from=2025-01-01&to=2025-01-31",
        None,
    )
    .await;
    assert_eq!(report["invoice_count"], 1);
    assert_eq!(money(&report["invoice_total"]), decimal("1100000"));
}

#[tokio::test]
async fn test_cancel_after_check_in_is_a_conflict() {
    let hotel = hotel(1).await;
    let booking = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        "/bookings",
        Some(booking_body(&hotel, 0, "0")),
    )
    .await;
    let uri = format!("/bookings/{}", id_of(&booking));
    data(router_at(&hotel.store, ARRIVAL), "POST", &format!("{}/check-in", uri), None).await;

    let (status, body) = send(router_at(&hotel.store, ARRIVAL), "POST", &format!("{}/cancel", uri), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "STATE_CONFLICT");

    let unchanged = data(router_at(&hotel.store, ARRIVAL), "GET", &uri, None).await;
    assert_eq!(unchanged["status"], "Checked-in");
}

#[tokio::test]
async fn test_check_in_after_check_out_is_a_conflict() {
    let hotel = hotel(1).await;
    let booking = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        "/bookings",
        Some(booking_body(&hotel, 0, "0")),
    )
    .await;
    let uri = format!("/bookings/{}", id_of(&booking));
    data(router_at(&hotel.store, ARRIVAL), "POST", &format!("{}/check-in", uri), None).await;
    data(
        router_at(&hotel.store, DEPARTURE),
        "POST",
        &format!("{}/check-out", uri),
        Some(json!({"payment_method": "cash"})),
    )
    .await;

    let (status, body) = send(router_at(&hotel.store, DEPARTURE), "POST", &format!("{}/check-in", uri), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "STATE_CONFLICT");

    let unchanged = data(router_at(&hotel.store, DEPARTURE), "GET", &uri, None).await;
    assert_eq!(unchanged["status"], "Checked-out");
    let room = data(
        router_at(&hotel.store, DEPARTURE),
        "GET",
        &format!("/rooms/{}", hotel.room_ids[0]),
        None,
    )
    .await;
    assert_eq!(room["status"], "available");
}

#[tokio::test]
async fn test_cash_deposit_confirms_booking() {
    let hotel = hotel(1).await;
    let booking = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        "/bookings",
        Some(booking_body(&hotel, 0, "300000")),
    )
    .await;
    assert_eq!(booking["status"], "Pending");

    let receipt = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        &format!("/bookings/{}/pay-by-cash", id_of(&booking)),
        None,
    )
    .await;
    assert_eq!(receipt["booking"]["status"], "Confirmed");
    assert_eq!(receipt["payment"]["method"], "cash");

    let (status, body) = send(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        &format!("/bookings/{}/pay-by-cash", id_of(&booking)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Deposit has already been paid");
}

// =============================================================================
// Promotions
// =============================================================================

#[tokio::test]
async fn test_validate_unknown_code_is_not_an_error() {
    let hotel = hotel(0).await;
    let check = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "GET",
        "/promotions/validate/NOPE",
        None,
    )
    .await;
    assert_eq!(check["valid"], false);
    assert_eq!(check["code"], "NOPE");
}

/// Two bookings racing for the last redemption: exactly one wins.
#[tokio::test]
async fn test_concurrent_last_slot_redemption() {
    let hotel = hotel(2).await;
    let promotion = create_promotion(&hotel, "LASTONE", 1).await;
    let first = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        "/bookings",
        Some(booking_body(&hotel, 0, "0")),
    )
    .await;
    let second = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        "/bookings",
        Some(booking_body(&hotel, 1, "0")),
    )
    .await;

    let apply = |booking: &Value| {
        let router = router_at(&hotel.store, BEFORE_ARRIVAL);
        let uri = format!("/bookings/{}/promotion", id_of(booking));
        async move { send(router, "POST", &uri, Some(json!({"code": "LASTONE"}))).await }
    };
    let (a, b) = tokio::join!(apply(&first), apply(&second));

    let successes = [a.0, b.0].iter().filter(|s| s.is_success()).count();
    assert_eq!(successes, 1);

    let promotion = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "GET",
        &format!("/promotions/{}", id_of(&promotion)),
        None,
    )
    .await;
    assert_eq!(promotion["used_count"], 1);
    assert_eq!(promotion["status"], "depleted");
}

#[tokio::test]
async fn test_cancel_releases_promotion_slot() {
    let hotel = hotel(1).await;
    let promotion = create_promotion(&hotel, "ONCE", 1).await;
    let mut body = booking_body(&hotel, 0, "0");
    body["promotion_code"] = json!("ONCE");
    let booking = data(router_at(&hotel.store, BEFORE_ARRIVAL), "POST", "/bookings", Some(body)).await;

    data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        &format!("/bookings/{}/cancel", id_of(&booking)),
        None,
    )
    .await;

    let promotion = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "GET",
        &format!("/promotions/{}", id_of(&promotion)),
        None,
    )
    .await;
    assert_eq!(promotion["used_count"], 0);
    assert_eq!(promotion["status"], "active");
}

// =============================================================================
// Payment gateway
// =============================================================================

#[tokio::test]
async fn test_gateway_return_confirms_deposit() {
    let hotel = hotel(1).await;
    let booking = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        "/bookings",
        Some(booking_body(&hotel, 0, "300000")),
    )
    .await;
    let booking_id = id_of(&booking);

    let query = signed_query(&[
        ("booking_id", &booking_id),
        ("amount", "300000"),
        ("response_code", "00"),
        ("transaction_ref", "TX-20250109-1"),
    ]);
    let outcome = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "GET",
        &format!("/payments/gateway-return?{}", query),
        None,
    )
    .await;
    assert_eq!(outcome["success"], true);
    assert_eq!(outcome["receipt"]["payment"]["method"], "online");
    assert_eq!(outcome["receipt"]["payment"]["gateway_reference"], "TX-20250109-1");
    assert_eq!(outcome["receipt"]["booking"]["status"], "Confirmed");
}

#[tokio::test]
async fn test_gateway_return_with_tampered_amount_is_rejected() {
    let hotel = hotel(1).await;
    let booking = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "POST",
        "/bookings",
        Some(booking_body(&hotel, 0, "300000")),
    )
    .await;
    let booking_id = id_of(&booking);

    let query = signed_query(&[
        ("booking_id", &booking_id),
        ("amount", "300000"),
        ("response_code", "00"),
    ])
    .replace("amount=300000", "amount=1");
    let (status, body) = send(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "GET",
        &format!("/payments/gateway-return?{}", query),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_SIGNATURE");

    let unchanged = data(
        router_at(&hotel.store, BEFORE_ARRIVAL),
        "GET",
        &format!("/bookings/{}", booking_id),
        None,
    )
    .await;
    assert_eq!(unchanged["status"], "Pending");
    assert_eq!(unchanged["is_deposit_paid"], false);
}

// =============================================================================
// Error Cases
// =============================================================================

#[tokio::test]
async fn test_malformed_json() {
    let store = Store::new();
    let response = tower::ServiceExt::oneshot(
        router_at(&store, BEFORE_ARRIVAL),
        axum::http::Request::builder()
            .method("POST")
            .uri("/customers")
            .header("Content-Type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_content_type() {
    let store = Store::new();
    let response = tower::ServiceExt::oneshot(
        router_at(&store, BEFORE_ARRIVAL),
        axum::http::Request::builder()
            .method("POST")
            .uri("/customers")
            .body(axum::body::Body::from(r#"{"full_name": "A", "phone": "0901234567"}"#))
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "MISSING_CONTENT_TYPE");
}

#[tokio::test]
async fn test_missing_field_is_a_validation_error() {
    let store = Store::new();
    let (status, body) = send(
        router_at(&store, BEFORE_ARRIVAL),
        "POST",
        "/customers",
        Some(json!({"full_name": "Nguyen Van A"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("phone"));
}

#[tokio::test]
async fn test_field_validation_lists_fields() {
    let store = Store::new();
    let (status, body) = send(
        router_at(&store, BEFORE_ARRIVAL),
        "POST",
        "/customers",
        Some(json!({"full_name": "   ", "phone": "12"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"full_name"));
    assert!(fields.contains(&"phone"));
}

#[tokio::test]
async fn test_invalid_path_id() {
    let store = Store::new();
    let (status, body) = send(router_at(&store, BEFORE_ARRIVAL), "GET", "/bookings/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PATH");
}

#[tokio::test]
async fn test_unknown_booking_is_not_found() {
    let store = Store::new();
    let (status, body) = send(
        router_at(&store, BEFORE_ARRIVAL),
        "POST",
        &format!("/bookings/{}/check-in", uuid::Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_invalid_actor_header() {
    let store = Store::new();
    let response = tower::ServiceExt::oneshot(
        router_at(&store, BEFORE_ARRIVAL),
        axum::http::Request::builder()
            .method("POST")
            .uri("/promotions/sweep")
            .header(hotel_engine::api::ACTOR_HEADER, "front-desk")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "INVALID_ACTOR");
}
