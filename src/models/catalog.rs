//! Service catalog and customer records.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chargeable extra (laundry, breakfast, airport pickup, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Current unit price. Bookings lock the price in when the line is added.
    pub price: Decimal,
    /// Inactive services cannot be added to bookings.
    pub is_active: bool,
}

/// A guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier.
    pub id: Uuid,
    /// Full name.
    pub full_name: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: Option<String>,
    /// Identity card or passport number.
    pub id_number: Option<String>,
    /// When the record was created.
    pub created_at: NaiveDateTime,
}
