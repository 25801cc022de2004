//! Shift and shift assignment models.
//!
//! A [`Shift`] is a named time-of-day window; a [`ShiftAssignment`] puts an
//! employee on that shift for one work date (a "main shift").

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{TimeRange, window_on};

/// A recurring work period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: Uuid,
    /// Display name (e.g., "Night").
    pub name: String,
    /// Start time of day.
    pub start_time: NaiveTime,
    /// End time of day; at or before `start_time` means the next day.
    pub end_time: NaiveTime,
    /// Pay per worked hour.
    pub hourly_rate: Decimal,
}

impl Shift {
    /// The concrete window of this shift when worked on `date`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hotel_engine::models::Shift;
    /// use chrono::{NaiveDate, NaiveTime};
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let night = Shift {
    ///     id: Uuid::new_v4(),
    ///     name: "Night".to_string(),
    ///     start_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
    ///     end_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
    ///     hourly_rate: Decimal::from(40_000),
    /// };
    /// let window = night.window_on(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
    /// assert_eq!(window.minutes(), 480);
    /// ```
    pub fn window_on(&self, date: NaiveDate) -> TimeRange {
        window_on(date, self.start_time, self.end_time)
    }

    /// Whether the shift crosses midnight.
    pub fn is_overnight(&self) -> bool {
        self.end_time <= self.start_time
    }

    /// Scheduled length in minutes.
    pub fn scheduled_minutes(&self) -> i64 {
        // Any date works; the length does not depend on it.
        self.window_on(NaiveDate::MIN).minutes()
    }
}

/// An employee scheduled on a shift for a work date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    /// Unique identifier.
    pub id: Uuid,
    /// Employee reference.
    pub employee_id: Uuid,
    /// Shift reference.
    pub shift_id: Uuid,
    /// Date the shift starts on.
    pub work_date: NaiveDate,
}
