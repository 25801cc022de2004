//! Promotion codes: administration, status sweep and redemption.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::calculation::{derive_status, ensure_redeemable, is_valid, normalize_code, refresh_status};
use crate::context::RequestContext;
use crate::error::{HotelError, HotelResult};
use crate::models::{AppliedPromotion, Booking, DiscountType, Promotion, PromotionStatus};
use crate::store::{Database, Store};

use super::bookings::recompute_totals;
use super::validation::{check, not_blank, positive_decimal};

/// Input for creating a promotion.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_promotion_input"))]
pub struct PromotionInput {
    /// Redemption code; stored upper-case.
    #[validate(length(min = 3, max = 32), custom = "not_blank")]
    pub code: String,
    /// Free-form description.
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Percentage or flat amount.
    pub discount_type: DiscountType,
    /// Percentage (0-100] or amount.
    #[validate(custom = "positive_decimal")]
    pub discount_value: Decimal,
    /// First valid day.
    pub start_date: Option<NaiveDate>,
    /// Last valid day.
    pub end_date: Option<NaiveDate>,
    /// Maximum redemptions.
    #[validate(range(min = 1))]
    pub usage_limit: u32,
}

fn validate_promotion_input(input: &PromotionInput) -> Result<(), ValidationError> {
    validate_terms(
        input.discount_type,
        input.discount_value,
        input.start_date,
        input.end_date,
    )
}

fn validate_terms(
    discount_type: DiscountType,
    discount_value: Decimal,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    if discount_type == DiscountType::Percent && discount_value > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("percent_range");
        err.message = Some("percent discounts cannot exceed 100".into());
        return Err(err);
    }
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            let mut err = ValidationError::new("window");
            err.message = Some("end_date must not be before start_date".into());
            return Err(err);
        }
    }
    Ok(())
}

/// Input for updating a promotion. The code and discount type are fixed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PromotionUpdate {
    /// Free-form description.
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// New value.
    #[validate(custom = "positive_decimal")]
    pub discount_value: Decimal,
    /// First valid day.
    pub start_date: Option<NaiveDate>,
    /// Last valid day.
    pub end_date: Option<NaiveDate>,
    /// New cap; never below the current usage.
    #[validate(range(min = 1))]
    pub usage_limit: u32,
}

/// Outcome of a status sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Promotions examined.
    pub checked: usize,
    /// Promotions whose status or active flag changed.
    pub changed: usize,
}

/// Whether a code can be redeemed right now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeCheck {
    /// The code as normalized.
    pub code: String,
    /// Whether it can be applied to a booking today.
    pub valid: bool,
    /// Why not, when invalid.
    pub reason: Option<String>,
    /// The promotion, when the code exists.
    pub promotion: Option<Promotion>,
}

/// Lists promotions, optionally filtered by status, newest first.
pub async fn list_promotions(store: &Store, status: Option<PromotionStatus>) -> Vec<Promotion> {
    store
        .read(|db| {
            let mut promotions: Vec<Promotion> = db
                .promotions
                .values()
                .filter(|p| status.is_none_or(|s| p.status == s))
                .cloned()
                .collect();
            promotions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            promotions
        })
        .await
}

/// Fetches one promotion.
pub async fn get_promotion(store: &Store, id: Uuid) -> HotelResult<Promotion> {
    store.read(|db| db.promotion(id).cloned()).await
}

/// Creates a promotion. Codes are unique regardless of case.
pub async fn create_promotion(
    store: &Store,
    ctx: &RequestContext,
    input: PromotionInput,
) -> HotelResult<Promotion> {
    check(&input)?;
    let code = normalize_code(&input.code);
    let now = ctx.now;
    let promotion = store
        .transaction(|db| {
            if db.promotion_by_code(&code).is_some() {
                return Err(HotelError::invalid("code", "a promotion with this code already exists"));
            }
            let mut promotion = Promotion {
                id: Uuid::new_v4(),
                code: code.clone(),
                description: input.description.clone(),
                discount_type: input.discount_type,
                discount_value: input.discount_value,
                start_date: input.start_date,
                end_date: input.end_date,
                usage_limit: input.usage_limit,
                used_count: 0,
                is_active: false,
                status: PromotionStatus::Scheduled,
                created_at: now,
                updated_at: now,
            };
            refresh_status(&mut promotion, now.date());
            db.promotions.insert(promotion.id, promotion.clone());
            Ok(promotion)
        })
        .await?;

    info!(
        promotion_id = %promotion.id,
        code = %promotion.code,
        status = %promotion.status,
        actor = ?ctx.actor_id,
        "Promotion created"
    );
    Ok(promotion)
}

/// Updates a promotion's value, window and cap, then re-derives its status.
pub async fn update_promotion(
    store: &Store,
    ctx: &RequestContext,
    id: Uuid,
    input: PromotionUpdate,
) -> HotelResult<Promotion> {
    check(&input)?;
    let now = ctx.now;
    let promotion = store
        .transaction(|db| {
            let promotion = db.promotion_mut(id)?;
            validate_terms(
                promotion.discount_type,
                input.discount_value,
                input.start_date,
                input.end_date,
            )
            .map_err(|e| {
                HotelError::invalid(
                    "__all__",
                    e.message.map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string()),
                )
            })?;
            if input.usage_limit < promotion.used_count {
                return Err(HotelError::invalid(
                    "usage_limit",
                    format!("usage_limit cannot be lower than used_count ({})", promotion.used_count),
                ));
            }
            promotion.description = input.description.clone();
            promotion.discount_value = input.discount_value;
            promotion.start_date = input.start_date;
            promotion.end_date = input.end_date;
            promotion.usage_limit = input.usage_limit;
            promotion.updated_at = now;
            refresh_status(promotion, now.date());
            Ok(promotion.clone())
        })
        .await?;

    info!(promotion_id = %id, status = %promotion.status, actor = ?ctx.actor_id, "Promotion updated");
    Ok(promotion)
}

/// Withdraws a promotion for good.
pub async fn cancel_promotion(store: &Store, ctx: &RequestContext, id: Uuid) -> HotelResult<Promotion> {
    let now = ctx.now;
    let promotion = store
        .transaction(|db| {
            let promotion = db.promotion_mut(id)?;
            if promotion.status == PromotionStatus::Cancelled {
                return Err(HotelError::StateConflict {
                    entity: "promotion",
                    action: "cancel",
                    state: promotion.status.to_string(),
                });
            }
            promotion.status = PromotionStatus::Cancelled;
            promotion.is_active = false;
            promotion.updated_at = now;
            Ok(promotion.clone())
        })
        .await?;

    warn!(promotion_id = %id, code = %promotion.code, actor = ?ctx.actor_id, "Promotion cancelled");
    Ok(promotion)
}

/// Re-derives every promotion's status for `ctx.today()`.
///
/// Only rows whose status or active flag changed are written.
pub async fn sweep(store: &Store, ctx: &RequestContext) -> HotelResult<SweepReport> {
    let now = ctx.now;
    let report = store
        .transaction(|db| {
            let checked = db.promotions.len();
            let mut changed = 0;
            for promotion in db.promotions.values_mut() {
                if refresh_status(promotion, now.date()) {
                    promotion.updated_at = now;
                    changed += 1;
                    debug!(code = %promotion.code, status = %promotion.status, "Promotion status changed");
                }
            }
            Ok(SweepReport { checked, changed })
        })
        .await?;

    info!(checked = report.checked, changed = report.changed, "Promotion sweep finished");
    Ok(report)
}

/// Reports whether `code` could be redeemed today, without redeeming it.
pub async fn check_code(store: &Store, ctx: &RequestContext, code: &str) -> CodeCheck {
    let code = normalize_code(code);
    let today = ctx.today();
    store
        .read(|db| match db.promotion_by_code(&code) {
            None => CodeCheck {
                code: code.clone(),
                valid: false,
                reason: Some("Promotion not found".to_string()),
                promotion: None,
            },
            Some(found) => {
                let mut current = found.clone();
                current.status = derive_status(found, today);
                current.is_active = current.status == PromotionStatus::Active;
                let verdict = ensure_redeemable(&current, today);
                CodeCheck {
                    code: code.clone(),
                    valid: verdict.is_ok() && is_valid(&current, today),
                    reason: verdict.err().map(|e| e.to_string()),
                    promotion: Some(current),
                }
            }
        })
        .await
}

/// Applies `code` to a booking and recomputes its totals.
///
/// The validity check, the usage increment and the booking update happen in
/// one transaction, so concurrent redemptions of the last slot cannot both
/// succeed. Re-applying the code already on the booking is a no-op.
pub async fn apply_to_booking(
    store: &Store,
    ctx: &RequestContext,
    booking_id: Uuid,
    code: &str,
) -> HotelResult<Booking> {
    let now = ctx.now;
    let (booking, applied) = store
        .transaction(|db| {
            let mut booking = db.booking(booking_id)?.clone();
            let applied = redeem(db, &mut booking, code, now)?;
            if applied {
                recompute_totals(&mut booking);
                booking.updated_at = now;
                db.bookings.insert(booking.id, booking.clone());
            }
            Ok((booking, applied))
        })
        .await?;

    if applied {
        info!(
            booking_id = %booking_id,
            code = %normalize_code(code),
            discount = %booking.discount_amount,
            total = %booking.total_amount,
            actor = ?ctx.actor_id,
            "Promotion applied"
        );
    } else {
        debug!(booking_id = %booking_id, code = %normalize_code(code), "Promotion already applied");
    }
    Ok(booking)
}

/// Redeems `code` against `booking` inside an open transaction.
///
/// Returns `false` when the same promotion is already on the booking. The
/// caller is responsible for recomputing totals and persisting the booking.
pub(crate) fn redeem(
    db: &mut Database,
    booking: &mut Booking,
    code: &str,
    now: NaiveDateTime,
) -> HotelResult<bool> {
    if booking.status.is_terminal() {
        return Err(HotelError::StateConflict {
            entity: "booking",
            action: "apply a promotion to",
            state: booking.status.to_string(),
        });
    }
    let code = normalize_code(code);
    let promotion_id = db
        .promotion_by_code(&code)
        .map(|p| p.id)
        .ok_or_else(|| HotelError::not_found("promotion", &code))?;

    if booking.promotions.iter().any(|p| p.promotion_id == promotion_id) {
        return Ok(false);
    }
    if let Some(existing) = booking.promotions.first() {
        return Err(HotelError::StateConflict {
            entity: "booking",
            action: "apply another promotion to",
            state: format!("promotion {} applied", existing.promotion_code),
        });
    }

    let promotion = db.promotion_mut(promotion_id)?;
    refresh_status(promotion, now.date());
    ensure_redeemable(promotion, now.date())?;
    promotion.used_count += 1;
    promotion.updated_at = now;
    refresh_status(promotion, now.date());

    booking.promotions.push(AppliedPromotion {
        promotion_id,
        promotion_code: promotion.code.clone(),
        discount_type: promotion.discount_type,
        discount_value: promotion.discount_value,
        applied_at: now,
    });
    Ok(true)
}

/// Gives back the usage slots a booking consumed.
pub(crate) fn release(db: &mut Database, booking: &Booking, now: NaiveDateTime) {
    for applied in &booking.promotions {
        if let Some(promotion) = db.promotions.get_mut(&applied.promotion_id) {
            promotion.used_count = promotion.used_count.saturating_sub(1);
            promotion.updated_at = now;
            refresh_status(promotion, now.date());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str) -> RequestContext {
        RequestContext::at(
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        )
    }

    fn save10(limit: u32) -> PromotionInput {
        PromotionInput {
            code: "save10".to_string(),
            description: Some("10% off".to_string()),
            discount_type: DiscountType::Percent,
            discount_value: Decimal::from(10),
            start_date: None,
            end_date: None,
            usage_limit: limit,
        }
    }

    #[tokio::test]
    async fn test_code_stored_upper_case_and_unique() {
        let store = Store::new();
        let promotion = create_promotion(&store, &at("2025-01-10"), save10(5)).await.unwrap();
        assert_eq!(promotion.code, "SAVE10");
        assert_eq!(promotion.status, PromotionStatus::Active);
        assert!(create_promotion(&store, &at("2025-01-10"), save10(5)).await.is_err());
    }

    #[tokio::test]
    async fn test_percent_over_hundred_rejected() {
        let store = Store::new();
        let mut input = save10(5);
        input.discount_value = Decimal::from(150);
        match create_promotion(&store, &at("2025-01-10"), input).await {
            Err(HotelError::Validation { errors }) => assert_eq!(errors[0].field, "__all__"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_future_window_is_scheduled() {
        let store = Store::new();
        let mut input = save10(5);
        input.start_date = NaiveDate::from_ymd_opt(2025, 2, 1);
        let promotion = create_promotion(&store, &at("2025-01-10"), input).await.unwrap();
        assert_eq!(promotion.status, PromotionStatus::Scheduled);
        assert!(!promotion.is_active);
    }

    #[tokio::test]
    async fn test_sweep_changes_only_stale_rows() {
        let store = Store::new();
        let mut expiring = save10(5);
        expiring.end_date = NaiveDate::from_ymd_opt(2025, 1, 15);
        create_promotion(&store, &at("2025-01-10"), expiring).await.unwrap();
        let mut other = save10(5);
        other.code = "WELCOME".to_string();
        create_promotion(&store, &at("2025-01-10"), other).await.unwrap();

        let report = sweep(&store, &at("2025-01-20")).await.unwrap();
        assert_eq!(report, SweepReport { checked: 2, changed: 1 });
        let report = sweep(&store, &at("2025-01-20")).await.unwrap();
        assert_eq!(report.changed, 0);
    }

    #[tokio::test]
    async fn test_usage_limit_not_below_used_count() {
        let store = Store::new();
        let promotion = create_promotion(&store, &at("2025-01-10"), save10(5)).await.unwrap();
        store
            .transaction(|db| {
                db.promotion_mut(promotion.id)?.used_count = 3;
                Ok(())
            })
            .await
            .unwrap();

        let update = PromotionUpdate {
            description: None,
            discount_value: Decimal::from(15),
            start_date: None,
            end_date: None,
            usage_limit: 2,
        };
        let err = update_promotion(&store, &at("2025-01-10"), promotion.id, update)
            .await
            .unwrap_err();
        assert!(matches!(err, HotelError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_cancel_is_sticky() {
        let store = Store::new();
        let promotion = create_promotion(&store, &at("2025-01-10"), save10(5)).await.unwrap();
        cancel_promotion(&store, &at("2025-01-10"), promotion.id).await.unwrap();
        sweep(&store, &at("2025-01-11")).await.unwrap();

        let current = get_promotion(&store, promotion.id).await.unwrap();
        assert_eq!(current.status, PromotionStatus::Cancelled);
        assert!(matches!(
            cancel_promotion(&store, &at("2025-01-11"), promotion.id).await,
            Err(HotelError::StateConflict { .. })
        ));
        assert!(!check_code(&store, &at("2025-01-11"), "save10").await.valid);
    }

    #[tokio::test]
    async fn test_check_code_unknown() {
        let store = Store::new();
        let result = check_code(&store, &at("2025-01-10"), "nope").await;
        assert!(!result.valid);
        assert!(result.promotion.is_none());
    }
}
