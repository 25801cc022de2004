//! Booking total calculation.
//!
//! Totals are a pure function of a snapshot: the rooms with their locked-in
//! rates, the billable units, the service lines and an optional promotion.
//! Nothing here reads the store; persisting the result is the caller's job.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{AppliedPromotion, BookingRoom, BookingService, DiscountType, Promotion};

/// The discount terms of a promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionTerms {
    /// Percentage or flat amount.
    pub discount_type: DiscountType,
    /// The percentage (0-100) or the amount.
    pub discount_value: Decimal,
}

impl From<&Promotion> for PromotionTerms {
    fn from(promotion: &Promotion) -> Self {
        Self {
            discount_type: promotion.discount_type,
            discount_value: promotion.discount_value,
        }
    }
}

impl From<&AppliedPromotion> for PromotionTerms {
    fn from(applied: &AppliedPromotion) -> Self {
        Self {
            discount_type: applied.discount_type,
            discount_value: applied.discount_value,
        }
    }
}

/// The computed money fields of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Nights or hours billed.
    pub billable_units: i64,
    /// `Σ rate * units` over rooms.
    pub room_total: Decimal,
    /// `Σ unit_price * quantity` over service lines.
    pub service_total: Decimal,
    /// `room_total + service_total`.
    pub raw_total: Decimal,
    /// Promotion discount, never above `raw_total`.
    pub discount: Decimal,
    /// `max(0, raw_total - discount)`.
    pub total_amount: Decimal,
}

impl Totals {
    /// The same totals rounded to 2 decimal places for storage or display.
    pub fn rounded(&self) -> Totals {
        Totals {
            billable_units: self.billable_units,
            room_total: round_money(self.room_total),
            service_total: round_money(self.service_total),
            raw_total: round_money(self.raw_total),
            discount: round_money(self.discount),
            total_amount: round_money(self.total_amount),
        }
    }
}

/// Rounds a money value to 2 decimal places, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Discount granted by `terms` on `raw_total`.
///
/// Percent discounts take `value / 100` of the raw total; amount discounts are
/// flat. Either way the discount never exceeds the raw total.
///
/// # Example
///
/// ```
/// use hotel_engine::calculation::{compute_discount, PromotionTerms};
/// use hotel_engine::models::DiscountType;
/// use rust_decimal::Decimal;
///
/// let save10 = PromotionTerms { discount_type: DiscountType::Percent, discount_value: Decimal::from(10) };
/// assert_eq!(compute_discount(Decimal::from(1_000_000), Some(&save10)), Decimal::from(100_000));
///
/// let flat = PromotionTerms { discount_type: DiscountType::Amount, discount_value: Decimal::from(50_000) };
/// assert_eq!(compute_discount(Decimal::from(20_000), Some(&flat)), Decimal::from(20_000));
/// ```
pub fn compute_discount(raw_total: Decimal, terms: Option<&PromotionTerms>) -> Decimal {
    let Some(terms) = terms else {
        return Decimal::ZERO;
    };
    let raw_total = raw_total.max(Decimal::ZERO);
    let discount = match terms.discount_type {
        DiscountType::Percent => raw_total * terms.discount_value / Decimal::ONE_HUNDRED,
        DiscountType::Amount => terms.discount_value,
    };
    discount.max(Decimal::ZERO).min(raw_total)
}

/// Computes booking totals from a snapshot.
///
/// # Example
///
/// ```
/// use hotel_engine::calculation::compute_totals;
/// use hotel_engine::models::BookingRoom;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let rooms = vec![BookingRoom { room_id: Uuid::new_v4(), rate: Decimal::from(500_000) }];
/// let totals = compute_totals(&rooms, 2, &[], None);
/// assert_eq!(totals.room_total, Decimal::from(1_000_000));
/// assert_eq!(totals.total_amount, Decimal::from(1_000_000));
/// ```
pub fn compute_totals(
    rooms: &[BookingRoom],
    billable_units: i64,
    services: &[BookingService],
    promotion: Option<&PromotionTerms>,
) -> Totals {
    let units = Decimal::from(billable_units.max(1));

    let room_total: Decimal = rooms.iter().map(|room| room.rate * units).sum();
    let service_total: Decimal = services
        .iter()
        .map(|line| line.unit_price * Decimal::from(line.quantity))
        .sum();
    let raw_total = room_total + service_total;
    let discount = compute_discount(raw_total, promotion);
    let total_amount = (raw_total - discount).max(Decimal::ZERO);

    Totals {
        billable_units: billable_units.max(1),
        room_total,
        service_total,
        raw_total,
        discount,
        total_amount,
    }
}

/// What is still owed at checkout once a paid deposit is credited.
pub fn amount_due(total_amount: Decimal, deposit_paid: Decimal) -> Decimal {
    (total_amount - deposit_paid).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn room(rate: &str) -> BookingRoom {
        BookingRoom {
            room_id: Uuid::new_v4(),
            rate: dec(rate),
        }
    }

    fn service(price: &str, quantity: u32) -> BookingService {
        BookingService {
            id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            quantity,
            unit_price: dec(price),
            room_id: None,
            added_at: NaiveDateTime::parse_from_str("2025-01-10 12:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
        }
    }

    fn percent(value: &str) -> PromotionTerms {
        PromotionTerms {
            discount_type: DiscountType::Percent,
            discount_value: dec(value),
        }
    }

    fn amount(value: &str) -> PromotionTerms {
        PromotionTerms {
            discount_type: DiscountType::Amount,
            discount_value: dec(value),
        }
    }

    #[test]
    fn test_two_nights_one_room() {
        let totals = compute_totals(&[room("500000")], 2, &[], None);
        assert_eq!(totals.room_total, dec("1000000"));
        assert_eq!(totals.service_total, Decimal::ZERO);
        assert_eq!(totals.raw_total, dec("1000000"));
        assert_eq!(totals.total_amount, dec("1000000"));
    }

    #[test]
    fn test_save10_on_one_million() {
        let totals = compute_totals(&[room("500000")], 2, &[], Some(&percent("10")));
        assert_eq!(totals.discount, dec("100000"));
        assert_eq!(totals.total_amount, dec("900000"));
    }

    #[test]
    fn test_services_add_to_raw_total() {
        let totals = compute_totals(
            &[room("300000"), room("450000")],
            1,
            &[service("50000", 2), service("25000", 3)],
            None,
        );
        assert_eq!(totals.room_total, dec("750000"));
        assert_eq!(totals.service_total, dec("175000"));
        assert_eq!(totals.raw_total, dec("925000"));
    }

    #[test]
    fn test_amount_discount_never_exceeds_raw_total() {
        let totals = compute_totals(&[room("100000")], 1, &[], Some(&amount("250000")));
        assert_eq!(totals.discount, dec("100000"));
        assert_eq!(totals.total_amount, Decimal::ZERO);
    }

    #[test]
    fn test_units_floor_at_one() {
        let totals = compute_totals(&[room("80000")], 0, &[], None);
        assert_eq!(totals.billable_units, 1);
        assert_eq!(totals.room_total, dec("80000"));
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let rooms = [room("333333.33")];
        let services = [service("12345.67", 3)];
        let terms = percent("7.5");
        let first = compute_totals(&rooms, 3, &services, Some(&terms));
        let second = compute_totals(&rooms, 3, &services, Some(&terms));
        assert_eq!(first, second);
        assert_eq!(first.rounded(), second.rounded());
    }

    #[test]
    fn test_rounding_only_on_request() {
        let totals = compute_totals(&[room("100000")], 1, &[], Some(&percent("33.333")));
        assert_eq!(totals.discount, dec("33333"));
        let totals = compute_totals(&[room("10.05")], 1, &[], Some(&percent("50")));
        assert_eq!(totals.discount, dec("5.025"));
        assert_eq!(totals.rounded().discount, dec("5.03"));
    }

    #[test]
    fn test_amount_due_subtracts_deposit() {
        assert_eq!(amount_due(dec("900000"), dec("300000")), dec("600000"));
        assert_eq!(amount_due(dec("200000"), dec("300000")), Decimal::ZERO);
    }
}
