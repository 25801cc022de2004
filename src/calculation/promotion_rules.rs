//! Promotion validity and status derivation.

use chrono::NaiveDate;

use crate::error::{HotelError, HotelResult};
use crate::models::{Promotion, PromotionStatus};

/// Whether the promotion's window covers `today`.
fn within_window(promotion: &Promotion, today: NaiveDate) -> bool {
    promotion.start_date.is_none_or(|start| start <= today)
        && promotion.end_date.is_none_or(|end| end >= today)
}

/// Whether a promotion is currently valid.
///
/// Valid means active and within its (optional) date window. Usage is not
/// considered here, see [`ensure_redeemable`].
///
/// # Example
///
/// ```
/// use hotel_engine::calculation::is_valid;
/// use hotel_engine::models::{DiscountType, Promotion, PromotionStatus};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let day = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// let promotion = Promotion {
///     id: Uuid::new_v4(),
///     code: "SAVE10".to_string(),
///     description: None,
///     discount_type: DiscountType::Percent,
///     discount_value: Decimal::from(10),
///     start_date: None,
///     end_date: Some(day),
///     usage_limit: 5,
///     used_count: 0,
///     is_active: true,
///     status: PromotionStatus::Active,
///     created_at: day.and_hms_opt(0, 0, 0).unwrap(),
///     updated_at: day.and_hms_opt(0, 0, 0).unwrap(),
/// };
/// assert!(is_valid(&promotion, day));
/// assert!(!is_valid(&promotion, day.succ_opt().unwrap()));
/// ```
pub fn is_valid(promotion: &Promotion, today: NaiveDate) -> bool {
    promotion.is_active && within_window(promotion, today)
}

/// Checks that a promotion can be redeemed once more on `today`.
///
/// Fails with a business-rule error naming the reason: inactive, outside its
/// window, or out of uses.
pub fn ensure_redeemable(promotion: &Promotion, today: NaiveDate) -> HotelResult<()> {
    if !promotion.is_active {
        return Err(HotelError::rule_with(
            format!("Promotion {} is not active", promotion.code),
            serde_json::json!({ "code": promotion.code, "status": promotion.status }),
        ));
    }
    if !within_window(promotion, today) {
        return Err(HotelError::rule_with(
            format!("Promotion {} is not valid on {}", promotion.code, today),
            serde_json::json!({
                "code": promotion.code,
                "start_date": promotion.start_date,
                "end_date": promotion.end_date,
            }),
        ));
    }
    if promotion.used_count >= promotion.usage_limit {
        return Err(HotelError::rule_with(
            format!("Promotion {} has reached its usage limit", promotion.code),
            serde_json::json!({
                "code": promotion.code,
                "usage_limit": promotion.usage_limit,
                "used_count": promotion.used_count,
            }),
        ));
    }
    Ok(())
}

/// Derives the status a promotion should have on `today`.
///
/// Precedence: cancelled (sticky), depleted, scheduled, expired, active.
pub fn derive_status(promotion: &Promotion, today: NaiveDate) -> PromotionStatus {
    if promotion.status == PromotionStatus::Cancelled {
        return PromotionStatus::Cancelled;
    }
    if promotion.used_count >= promotion.usage_limit {
        return PromotionStatus::Depleted;
    }
    if promotion.start_date.is_some_and(|start| today < start) {
        return PromotionStatus::Scheduled;
    }
    if promotion.end_date.is_some_and(|end| today > end) {
        return PromotionStatus::Expired;
    }
    PromotionStatus::Active
}

/// Refreshes `status` and `is_active` in place.
///
/// Returns `true` when either field changed, so callers persist only the rows
/// that need it.
pub fn refresh_status(promotion: &mut Promotion, today: NaiveDate) -> bool {
    let status = derive_status(promotion, today);
    let is_active = status == PromotionStatus::Active;
    if promotion.status == status && promotion.is_active == is_active {
        return false;
    }
    promotion.status = status;
    promotion.is_active = is_active;
    true
}

/// Normalizes a redemption code for storage and lookup.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
