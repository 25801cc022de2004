//! Promotion model.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a promotion's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` is a percentage of the raw total.
    Percent,
    /// `discount_value` is a flat amount.
    Amount,
}

/// Derived lifecycle status of a promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionStatus {
    /// Window has not started.
    Scheduled,
    /// Usable.
    Active,
    /// Window has ended.
    Expired,
    /// Manually withdrawn. Sticky.
    Cancelled,
    /// Usage cap reached.
    Depleted,
}

impl std::fmt::Display for PromotionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromotionStatus::Scheduled => write!(f, "scheduled"),
            PromotionStatus::Active => write!(f, "active"),
            PromotionStatus::Expired => write!(f, "expired"),
            PromotionStatus::Cancelled => write!(f, "cancelled"),
            PromotionStatus::Depleted => write!(f, "depleted"),
        }
    }
}

/// A discount code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    /// Unique identifier.
    pub id: Uuid,
    /// Redemption code, stored upper-case.
    pub code: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Percentage or flat amount.
    pub discount_type: DiscountType,
    /// Percentage (0-100) or amount, depending on `discount_type`.
    pub discount_value: Decimal,
    /// First valid day, inclusive.
    pub start_date: Option<NaiveDate>,
    /// Last valid day, inclusive.
    pub end_date: Option<NaiveDate>,
    /// Maximum redemptions.
    pub usage_limit: u32,
    /// Redemptions so far. Never exceeds `usage_limit`.
    pub used_count: u32,
    /// Whether the code can currently be redeemed.
    pub is_active: bool,
    /// Derived status.
    pub status: PromotionStatus,
    /// Creation instant.
    pub created_at: NaiveDateTime,
    /// Last write instant.
    pub updated_at: NaiveDateTime,
}

impl Promotion {
    /// Redemptions left before the cap.
    pub fn remaining_uses(&self) -> u32 {
        self.usage_limit.saturating_sub(self.used_count)
    }
}
