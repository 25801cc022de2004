//! Attendance records.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One check-in/check-out pair for an employee.
///
/// A record is tied either to a main-shift assignment, to an overtime request
/// (overtime-only attendance), or to both when after-shift overtime was
/// credited at check-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    /// Unique identifier.
    pub id: Uuid,
    /// Employee reference.
    pub employee_id: Uuid,
    /// Date the shift or overtime window starts on.
    pub work_date: NaiveDate,
    /// Main shift assignment this record closes, if any.
    pub shift_assignment_id: Option<Uuid>,
    /// Overtime request this record credits, if any.
    pub overtime_request_id: Option<Uuid>,
    /// Arrival instant.
    pub check_in: NaiveDateTime,
    /// Departure instant; `None` while the record is open.
    pub check_out: Option<NaiveDateTime>,
    /// Hours credited within the scheduled window.
    pub worked_hours: Decimal,
    /// Minutes late at check-in.
    pub late_minutes: i64,
    /// Minutes left before the end of the window.
    pub early_leave_minutes: i64,
    /// Overtime hours credited.
    pub overtime_hours: Decimal,
    /// Whether the record carries overtime.
    pub is_overtime: bool,
    /// Match confidence reported at check-in.
    pub check_in_confidence: Option<Decimal>,
}

impl Attendance {
    /// Whether the employee has not checked out yet.
    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }

    /// Whether this record belongs to a main shift.
    pub fn is_main_shift(&self) -> bool {
        self.shift_assignment_id.is_some()
    }

    /// Whether this record is overtime-only (not tied to a main shift).
    pub fn is_overtime_only(&self) -> bool {
        self.shift_assignment_id.is_none() && self.overtime_request_id.is_some()
    }
}
