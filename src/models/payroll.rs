//! Payroll result models.
//!
//! This module contains the [`Payroll`] type and its associated structures
//! that capture all outputs of a monthly pay computation: pay lines, totals
//! and an audit trace explaining every step.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{HotelError, HotelResult};

/// Represents the category of pay for a pay line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayCategory {
    /// Hours inside the scheduled shift window.
    Regular,
    /// Approved overtime hours.
    Overtime,
}

/// Represents a single line item in a payroll.
///
/// # Example
///
/// ```
/// use hotel_engine::models::{PayLine, PayCategory};
/// use rust_decimal::Decimal;
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// let pay_line = PayLine {
///     date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
///     attendance_id: Uuid::new_v4(),
///     category: PayCategory::Regular,
///     hours: Decimal::from(8),
///     rate: Decimal::from(30_000),
///     amount: Decimal::from(240_000),
/// };
/// assert_eq!(pay_line.hours * pay_line.rate, pay_line.amount);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayLine {
    /// The work date this pay line applies to.
    pub date: NaiveDate,
    /// The attendance record this pay line originated from.
    pub attendance_id: Uuid,
    /// Regular or overtime.
    pub category: PayCategory,
    /// Hours paid.
    pub hours: Decimal,
    /// Hourly rate applied.
    pub rate: Decimal,
    /// `hours * rate`, rounded to 2 decimal places.
    pub amount: Decimal,
}

/// Aggregated totals for a payroll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayTotals {
    /// The total gross pay (sum of all pay lines).
    pub gross_pay: Decimal,
    /// Total regular hours.
    pub regular_hours: Decimal,
    /// Total overtime hours.
    pub overtime_hours: Decimal,
    /// Sum of late minutes across the month.
    pub late_minutes: i64,
    /// Sum of early-leave minutes across the month.
    pub early_leave_minutes: i64,
    /// Distinct work dates with at least one closed attendance.
    pub days_worked: u32,
}

/// One payroll decision: which rate applied to which attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// 1-based position in the trace.
    pub step_number: u32,
    /// Stable rule key, e.g. `regular_hours`.
    pub rule_id: String,
    /// Display name of the rule.
    pub rule_name: String,
    /// Attendance figures the rule looked at.
    pub input: serde_json::Value,
    /// Hours, rate and amount produced.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A record payroll skipped or flagged.
///
/// Warnings indicate records that were skipped or look suspicious but do not
/// prevent the payroll from being produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// Machine code, e.g. `OPEN_ATTENDANCE`.
    pub code: String,
    /// What was skipped and why.
    pub message: String,
}

/// The audit trace for a payroll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// Steps in work-date order.
    pub steps: Vec<AuditStep>,
    /// Skipped or suspicious records.
    pub warnings: Vec<AuditWarning>,
}

/// A calendar month of payroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollMonth {
    /// First day of the month.
    pub start_date: NaiveDate,
    /// Last day of the month.
    pub end_date: NaiveDate,
}

impl PayrollMonth {
    /// Parses a `YYYY-MM` string.
    ///
    /// # Example
    ///
    /// ```
    /// use hotel_engine::models::PayrollMonth;
    /// use chrono::NaiveDate;
    ///
    /// let month = PayrollMonth::parse("2024-02").unwrap();
    /// assert_eq!(month.end_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    /// ```
    pub fn parse(value: &str) -> HotelResult<Self> {
        let start_date = NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
            .map_err(|_| HotelError::invalid("month", "month must be formatted as YYYY-MM"))?;
        let next_month = if start_date.month() == 12 {
            NaiveDate::from_ymd_opt(start_date.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(start_date.year(), start_date.month() + 1, 1)
        }
        .ok_or_else(|| HotelError::invalid("month", "month is out of range"))?;
        let end_date = next_month
            .pred_opt()
            .ok_or_else(|| HotelError::invalid("month", "month is out of range"))?;
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Whether `date` falls within the month.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// The complete payroll of one employee for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payroll {
    /// Unique identifier for this computation.
    pub payroll_id: Uuid,
    /// When the payroll was computed.
    pub generated_at: NaiveDateTime,
    /// The version of the engine that computed it.
    pub engine_version: String,
    /// The employee paid.
    pub employee_id: Uuid,
    /// The month covered.
    pub period: PayrollMonth,
    /// Individual pay lines.
    pub pay_lines: Vec<PayLine>,
    /// Aggregated totals.
    pub totals: PayTotals,
    /// Audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}
