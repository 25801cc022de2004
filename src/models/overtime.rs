//! Overtime requests.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{TimeRange, window_on};

/// Kind of overtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeType {
    /// Continues directly after a main shift.
    AfterShift,
    /// Stand-alone window not attached to any shift.
    Custom,
}

impl std::fmt::Display for OvertimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OvertimeType::AfterShift => write!(f, "after_shift"),
            OvertimeType::Custom => write!(f, "custom"),
        }
    }
}

/// A registered overtime window for one employee and work date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimeRequest {
    /// Unique identifier.
    pub id: Uuid,
    /// Employee reference.
    pub employee_id: Uuid,
    /// Date the window starts on.
    pub work_date: NaiveDate,
    /// Start time of day.
    pub start_time: NaiveTime,
    /// End time of day; at or before `start_time` means the next day.
    pub end_time: NaiveTime,
    /// After-shift or custom.
    pub overtime_type: OvertimeType,
    /// Why the overtime is needed.
    pub reason: Option<String>,
    /// Registration instant.
    pub created_at: NaiveDateTime,
}

impl OvertimeRequest {
    /// The concrete overtime window.
    pub fn window(&self) -> TimeRange {
        window_on(self.work_date, self.start_time, self.end_time)
    }
}
