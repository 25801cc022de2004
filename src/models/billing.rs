//! Invoices and payments. Both are immutable once written.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How money was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at the front desk.
    Cash,
    /// Card terminal.
    Card,
    /// Online through the payment gateway.
    Online,
}

/// What a payment settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// Up-front deposit.
    Deposit,
    /// Final balance at checkout.
    Settlement,
}

/// Outcome of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Funds received.
    Succeeded,
}

/// A recorded payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: Uuid,
    /// Booking the payment belongs to.
    pub booking_id: Uuid,
    /// Deposit or settlement.
    pub kind: PaymentKind,
    /// Channel.
    pub method: PaymentMethod,
    /// Amount received.
    pub amount: Decimal,
    /// Outcome.
    pub status: PaymentStatus,
    /// Gateway transaction reference for online payments.
    pub gateway_reference: Option<String>,
    /// When the payment was recorded.
    pub paid_at: NaiveDateTime,
}

/// Snapshot of a booking's amounts at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier.
    pub id: Uuid,
    /// Human-readable number (e.g., "INV-20250112-0001").
    pub number: String,
    /// Booking the invoice closes.
    pub booking_id: Uuid,
    /// Guest billed.
    pub customer_id: Uuid,
    /// Nights or hours billed.
    pub billable_units: i64,
    /// Sum of room charges.
    pub room_total: Decimal,
    /// Sum of service charges.
    pub service_total: Decimal,
    /// Room plus service total.
    pub raw_total: Decimal,
    /// Promotion discount.
    pub discount_amount: Decimal,
    /// Amount after discount.
    pub total_amount: Decimal,
    /// Deposit already received.
    pub deposit_paid: Decimal,
    /// Collected at checkout.
    pub amount_due: Decimal,
    /// When the invoice was issued.
    pub issued_at: NaiveDateTime,
}
