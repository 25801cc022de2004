//! Booking model and its line items.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{Stay, TimeRange};
use crate::models::DiscountType;

/// Lifecycle state of a booking.
///
/// ```text
/// Pending ──┐
///    │      ├──> Checked-in ──> Checked-out
///    v      │
/// Confirmed ┘
///    │ (Pending too)
///    └──> Canceled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Awaiting a deposit.
    Pending,
    /// Deposit paid or not required.
    Confirmed,
    /// Guest is in the room.
    #[serde(rename = "Checked-in")]
    CheckedIn,
    /// Settled and closed.
    #[serde(rename = "Checked-out")]
    CheckedOut,
    /// Canceled before arrival.
    Canceled,
}

impl BookingStatus {
    /// Whether the booking still holds its rooms.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::CheckedIn
        )
    }

    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::CheckedOut | BookingStatus::Canceled)
    }

    /// Whether the guest has not yet arrived.
    pub fn is_upcoming(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "Pending"),
            BookingStatus::Confirmed => write!(f, "Confirmed"),
            BookingStatus::CheckedIn => write!(f, "Checked-in"),
            BookingStatus::CheckedOut => write!(f, "Checked-out"),
            BookingStatus::Canceled => write!(f, "Canceled"),
        }
    }
}

/// A room held by a booking, with the rate locked in at booking time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRoom {
    /// Room reference.
    pub room_id: Uuid,
    /// Nightly or hourly rate captured when the room was added.
    pub rate: Decimal,
}

/// A service line on a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingService {
    /// Line identifier, used to remove the line.
    pub id: Uuid,
    /// Service reference.
    pub service_id: Uuid,
    /// Units ordered.
    pub quantity: u32,
    /// Unit price captured when the line was added.
    pub unit_price: Decimal,
    /// Room the service was delivered to, if any. Informational only.
    pub room_id: Option<Uuid>,
    /// When the line was added.
    pub added_at: NaiveDateTime,
}

/// A promotion redeemed against a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedPromotion {
    /// Promotion reference.
    pub promotion_id: Uuid,
    /// Code as entered.
    pub promotion_code: String,
    /// Discount kind captured when the code was applied.
    pub discount_type: DiscountType,
    /// Discount value captured when the code was applied. Later edits to the
    /// promotion do not change it.
    pub discount_value: Decimal,
    /// When it was applied.
    pub applied_at: NaiveDateTime,
}

/// A reservation of one or more rooms for a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier.
    pub id: Uuid,
    /// Guest reference.
    pub customer_id: Uuid,
    /// Staff member who created the booking.
    pub created_by: Option<Uuid>,
    /// Arrival date.
    pub check_in_date: NaiveDate,
    /// Departure date.
    pub check_out_date: NaiveDate,
    /// Precise arrival for hourly bookings.
    pub check_in_at: Option<NaiveDateTime>,
    /// Precise departure for hourly bookings.
    pub check_out_at: Option<NaiveDateTime>,
    /// Billed per hour instead of per night.
    pub is_hourly: bool,
    /// Lifecycle state.
    pub status: BookingStatus,
    /// Rooms and their locked-in rates.
    pub rooms: Vec<BookingRoom>,
    /// Service lines.
    #[serde(default)]
    pub services: Vec<BookingService>,
    /// Promotions redeemed (at most one).
    #[serde(default)]
    pub promotions: Vec<AppliedPromotion>,
    /// Room total plus service total.
    pub raw_total: Decimal,
    /// Discount granted by the promotion.
    pub discount_amount: Decimal,
    /// `raw_total - discount_amount`, floored at zero.
    pub total_amount: Decimal,
    /// Deposit required to confirm; zero when none.
    pub deposit_amount: Decimal,
    /// Whether the deposit has been received.
    pub is_deposit_paid: bool,
    /// When the guest actually arrived.
    pub actual_check_in_at: Option<NaiveDateTime>,
    /// When the guest actually left.
    pub actual_check_out_at: Option<NaiveDateTime>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation instant.
    pub created_at: NaiveDateTime,
    /// Last modification instant.
    pub updated_at: NaiveDateTime,
}

impl Booking {
    /// The stay this booking covers.
    pub fn stay(&self) -> Stay {
        Stay {
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
            check_in_at: self.check_in_at,
            check_out_at: self.check_out_at,
            is_hourly: self.is_hourly,
        }
    }

    /// The interval the booking occupies its rooms for.
    pub fn interval(&self) -> TimeRange {
        self.stay().interval()
    }

    /// Whether the booking holds `room_id`.
    pub fn holds_room(&self, room_id: Uuid) -> bool {
        self.rooms.iter().any(|r| r.room_id == room_id)
    }

    /// Ids of the rooms the booking holds.
    pub fn room_ids(&self) -> Vec<Uuid> {
        self.rooms.iter().map(|r| r.room_id).collect()
    }

    /// Whether a deposit is needed before the booking is confirmed.
    pub fn requires_deposit(&self) -> bool {
        self.deposit_amount > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_with_hyphen() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::CheckedIn).unwrap(),
            "\"Checked-in\""
        );
        let status: BookingStatus = serde_json::from_str("\"Checked-out\"").unwrap();
        assert_eq!(status, BookingStatus::CheckedOut);
    }

    #[test]
    fn test_active_statuses() {
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Confirmed.is_active());
        assert!(BookingStatus::CheckedIn.is_active());
        assert!(!BookingStatus::CheckedOut.is_active());
        assert!(!BookingStatus::Canceled.is_active());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(BookingStatus::CheckedOut.is_terminal());
        assert!(BookingStatus::Canceled.is_terminal());
        assert!(!BookingStatus::CheckedIn.is_terminal());
    }

    #[test]
    fn test_display_matches_wire_names() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::CheckedIn,
            BookingStatus::CheckedOut,
            BookingStatus::Canceled,
        ] {
            let wire = serde_json::to_string(&status).unwrap();
            assert_eq!(wire, format!("\"{}\"", status));
        }
    }
}
