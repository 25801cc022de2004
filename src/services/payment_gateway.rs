//! Online deposit confirmation through the payment gateway's return URL.
//!
//! The gateway redirects the guest back with query parameters signed by
//! HMAC-SHA512 over the other parameters, sorted by key and joined as
//! `key=value&key=value`.

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PaymentGatewayConfig;
use crate::context::RequestContext;
use crate::error::{HotelError, HotelResult};
use crate::models::PaymentMethod;
use crate::store::Store;

use super::bookings::{DepositReceipt, record_deposit};

type HmacSha512 = Hmac<Sha512>;

/// Parameter carrying the signature.
pub const SECURE_HASH: &str = "secure_hash";
/// Parameter carrying the booking id.
pub const BOOKING_ID: &str = "booking_id";
/// Parameter carrying the paid amount.
pub const AMOUNT: &str = "amount";
/// Parameter carrying the gateway's transaction reference.
pub const TRANSACTION_REF: &str = "transaction_ref";
/// Parameter carrying the gateway's result code.
pub const RESPONSE_CODE: &str = "response_code";

/// What a gateway return did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOutcome {
    /// Booking the payment was for.
    pub booking_id: Uuid,
    /// Whether the gateway reported success.
    pub success: bool,
    /// Gateway result code.
    pub response_code: String,
    /// The recorded deposit, on success.
    pub receipt: Option<DepositReceipt>,
}

fn canonical(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(key, _)| key.as_str() != SECURE_HASH)
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

fn keyed_mac(secret: &str) -> HotelResult<HmacSha512> {
    HmacSha512::new_from_slice(secret.as_bytes()).map_err(|e| HotelError::Internal {
        message: format!("invalid gateway secret: {}", e),
    })
}

/// Hex signature of `params`, ignoring any existing `secure_hash`.
pub fn sign(params: &BTreeMap<String, String>, secret: &str) -> HotelResult<String> {
    let mut mac = keyed_mac(secret)?;
    mac.update(canonical(params).as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks the `secure_hash` of `params`. Hex case is ignored.
pub fn verify_signature(params: &BTreeMap<String, String>, secret: &str) -> HotelResult<()> {
    let provided = params.get(SECURE_HASH).ok_or(HotelError::InvalidSignature)?;
    let provided = hex::decode(provided.trim()).map_err(|_| HotelError::InvalidSignature)?;
    let mut mac = keyed_mac(secret)?;
    mac.update(canonical(params).as_bytes());
    mac.verify_slice(&provided)
        .map_err(|_| HotelError::InvalidSignature)
}

fn required<'a>(params: &'a BTreeMap<String, String>, key: &'static str) -> HotelResult<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| HotelError::invalid(key, format!("{} is required", key)))
}

/// Handles the gateway's redirect back to the hotel.
///
/// A bad signature is rejected before anything else is looked at. A failed
/// payment is reported without touching the booking.
pub async fn handle_return(
    store: &Store,
    ctx: &RequestContext,
    config: &PaymentGatewayConfig,
    params: &BTreeMap<String, String>,
) -> HotelResult<GatewayOutcome> {
    if let Err(err) = verify_signature(params, &config.hash_secret) {
        warn!(params = ?params.keys().collect::<Vec<_>>(), "Gateway return signature rejected");
        return Err(err);
    }
    debug!("Gateway return signature verified");

    let booking_id: Uuid = required(params, BOOKING_ID)?
        .parse()
        .map_err(|_| HotelError::invalid(BOOKING_ID, "booking_id must be a UUID"))?;
    let response_code = required(params, RESPONSE_CODE)?.to_string();

    if response_code != config.success_code {
        info!(booking_id = %booking_id, response_code = %response_code, "Gateway reported failed payment");
        return Ok(GatewayOutcome {
            booking_id,
            success: false,
            response_code,
            receipt: None,
        });
    }

    let amount: Decimal = required(params, AMOUNT)?
        .parse()
        .map_err(|_| HotelError::invalid(AMOUNT, "amount must be a decimal number"))?;
    let reference = params.get(TRANSACTION_REF).cloned();
    let now = ctx.now;
    let receipt = store
        .transaction(|db| {
            let expected = db.booking(booking_id)?.deposit_amount;
            if amount != expected {
                return Err(HotelError::rule_with(
                    "Paid amount does not match the deposit",
                    serde_json::json!({ "paid": amount, "deposit_amount": expected }),
                ));
            }
            record_deposit(db, booking_id, PaymentMethod::Online, reference.clone(), now)
        })
        .await?;

    info!(
        booking_id = %booking_id,
        amount = %receipt.payment.amount,
        transaction_ref = ?reference,
        "Online deposit recorded"
    );
    Ok(GatewayOutcome {
        booking_id,
        success: true,
        response_code,
        receipt: Some(receipt),
    })
}
