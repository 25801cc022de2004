//! Calculation logic for the hotel engine.
//!
//! This module contains the pure functions behind every service: temporal
//! range normalization, room availability, booking totals, promotion
//! validity, attendance and overtime reconciliation, and monthly payroll.
//! None of them touch the store.

mod attendance_rules;
mod availability;
mod overtime_rules;
mod payroll;
mod pricing;
mod promotion_rules;
mod time_range;

pub use attendance_rules::{
    MainShiftCredit, OvertimeCredit, ShiftSlot, check_in_lateness, close_main_shift,
    close_overtime, ensure_min_elapsed, find_after_shift_overtime, find_slot,
    overtime_check_in_window,
};
pub use availability::{RoomConflict, find_conflicts, is_available};
pub use overtime_rules::{
    ensure_after_shift_alignment, ensure_no_attendance_overlap, ensure_no_request_overlap,
    ensure_not_past, ensure_within_cap, overlapping_requests,
};
pub use payroll::{RatedAttendance, calculate_payroll};
pub use pricing::{PromotionTerms, Totals, amount_due, compute_discount, compute_totals, round_money};
pub use promotion_rules::{derive_status, ensure_redeemable, is_valid, normalize_code, refresh_status};
pub use time_range::{Stay, TimeRange, hourly_units, minutes_to_hours, nightly_units, window_on};
