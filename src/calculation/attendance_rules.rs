//! Attendance reconciliation rules.
//!
//! These functions decide which shift a face check belongs to and what a
//! check-in or check-out credits. They take concrete windows and instants and
//! never touch the store; the attendance service feeds them the candidate
//! assignments and overtime requests it loaded.
//!
//! # Windows
//!
//! - A shift's *effective* window opens `early_check_in_grace` before the
//!   shift starts and closes `late_check_out_grace` after it ends.
//! - A custom overtime window accepts check-in from
//!   `overtime_early_check_in` before its start until its end.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AttendancePolicy;
use crate::error::{HotelError, HotelResult};
use crate::models::{OvertimeRequest, OvertimeType};

use super::time_range::{TimeRange, minutes_to_hours};

/// A main-shift assignment resolved to its concrete window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSlot {
    /// The assignment this slot comes from.
    pub assignment_id: Uuid,
    /// The shift worked.
    pub shift_id: Uuid,
    /// The assignment's work date.
    pub work_date: NaiveDate,
    /// The scheduled window on that date.
    pub window: TimeRange,
}

impl ShiftSlot {
    /// The window in which face checks are attributed to this slot.
    pub fn effective_window(&self, policy: &AttendancePolicy) -> TimeRange {
        self.window.widen(policy.early_grace(), policy.late_grace())
    }
}

/// What closing a main-shift attendance credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainShiftCredit {
    /// Hours worked inside the shift window.
    pub worked_hours: Decimal,
    /// Minutes between check-out and shift end, when leaving early.
    pub early_leave_minutes: i64,
    /// Hours credited from a matching after-shift overtime request.
    pub overtime_hours: Decimal,
    /// The overtime request that was credited.
    pub overtime_request_id: Option<Uuid>,
}

/// What closing an overtime-only attendance credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeCredit {
    /// Overtime hours inside the request window.
    pub overtime_hours: Decimal,
    /// Minutes between the window start and check-in.
    pub late_minutes: i64,
    /// Minutes between check-out and the window end.
    pub early_leave_minutes: i64,
}

/// The first slot whose effective window contains `now` and that is not
/// already closed.
///
/// Slots are examined in the order given; callers pass today's assignments
/// before yesterday's so a day shift wins over the tail of a night shift.
pub fn find_slot<'a, F>(
    slots: &'a [ShiftSlot],
    now: NaiveDateTime,
    policy: &AttendancePolicy,
    is_closed: F,
) -> Option<&'a ShiftSlot>
where
    F: Fn(Uuid) -> bool,
{
    slots.iter().find(|slot| {
        slot.effective_window(policy).contains(now) && !is_closed(slot.assignment_id)
    })
}

/// Minutes late for a main-shift check-in at `now`.
///
/// Fails when `now` is more than `max_late_check_in` past the shift start.
///
/// # Example
///
/// ```
/// use hotel_engine::calculation::{check_in_lateness, TimeRange};
/// use hotel_engine::config::AttendancePolicy;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// let shift = TimeRange::new(day.and_hms_opt(8, 0, 0).unwrap(), day.and_hms_opt(16, 0, 0).unwrap());
/// let policy = AttendancePolicy::default();
///
/// assert_eq!(check_in_lateness(&shift, day.and_hms_opt(7, 30, 0).unwrap(), &policy).unwrap(), 0);
/// assert_eq!(check_in_lateness(&shift, day.and_hms_opt(8, 25, 0).unwrap(), &policy).unwrap(), 25);
/// assert!(check_in_lateness(&shift, day.and_hms_opt(10, 1, 0).unwrap(), &policy).is_err());
/// ```
pub fn check_in_lateness(
    shift_window: &TimeRange,
    now: NaiveDateTime,
    policy: &AttendancePolicy,
) -> HotelResult<i64> {
    if now > shift_window.start + policy.max_late_check_in() {
        return Err(HotelError::rule_with(
            format!(
                "Check-in is more than {} minutes after shift start",
                policy.max_late_check_in_minutes
            ),
            serde_json::json!({
                "shift_start": shift_window.start,
                "late_minutes": (now - shift_window.start).num_minutes(),
            }),
        ));
    }
    Ok(positive_minutes(now - shift_window.start))
}

/// Rejects a check-out before `checkout_min_ratio` of `window` has elapsed.
///
/// Elapsed time is counted from the later of check-in and window start.
pub fn ensure_min_elapsed(
    check_in: NaiveDateTime,
    now: NaiveDateTime,
    window: &TimeRange,
    policy: &AttendancePolicy,
) -> HotelResult<()> {
    let elapsed = positive_minutes(now - check_in.max(window.start));
    let required = Decimal::from(window.minutes()) * policy.checkout_min_ratio;
    if Decimal::from(elapsed) < required {
        return Err(HotelError::rule_with(
            "Insufficient duration to check out",
            serde_json::json!({
                "elapsed_minutes": elapsed,
                "required_minutes": required.ceil(),
                "ratio": policy.checkout_min_ratio,
            }),
        ));
    }
    Ok(())
}

/// The after-shift overtime request that continues `shift_window`, if any.
///
/// A request matches when it is of type after-shift and starts within
/// `after_shift_tolerance` of the shift end, either side.
pub fn find_after_shift_overtime<'a, I>(
    shift_window: &TimeRange,
    requests: I,
    policy: &AttendancePolicy,
) -> Option<&'a OvertimeRequest>
where
    I: IntoIterator<Item = &'a OvertimeRequest>,
{
    let tolerance = policy.after_shift_tolerance();
    requests.into_iter().find(|request| {
        request.overtime_type == OvertimeType::AfterShift
            && (request.window().start - shift_window.end).abs() <= tolerance
    })
}

/// Computes the credit for closing a main-shift attendance at `now`.
///
/// Worked time is `[check_in, now]` clamped to the shift window. Overtime is
/// credited only for an after-shift request, from the later of shift end and
/// request start to the earlier of `now` and request end.
pub fn close_main_shift(
    check_in: NaiveDateTime,
    now: NaiveDateTime,
    shift_window: &TimeRange,
    after_shift: Option<&OvertimeRequest>,
) -> MainShiftCredit {
    let worked_minutes = TimeRange::new(check_in, now)
        .clamp_to(shift_window)
        .map(|worked| worked.minutes())
        .unwrap_or(0);

    let (overtime_minutes, overtime_request_id) = match after_shift {
        Some(request) => {
            let ot = request.window();
            let start = shift_window.end.max(ot.start);
            let end = now.min(ot.end);
            (positive_minutes(end - start), Some(request.id))
        }
        None => (0, None),
    };

    MainShiftCredit {
        worked_hours: minutes_to_hours(worked_minutes),
        early_leave_minutes: positive_minutes(shift_window.end - now),
        overtime_hours: minutes_to_hours(overtime_minutes),
        overtime_request_id: overtime_request_id.filter(|_| overtime_minutes > 0),
    }
}

/// Computes the credit for closing an overtime-only attendance at `now`.
///
/// # Example
///
/// ```
/// use hotel_engine::calculation::{close_overtime, TimeRange};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let day = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// let window = TimeRange::new(day.and_hms_opt(18, 0, 0).unwrap(), day.and_hms_opt(22, 0, 0).unwrap());
/// let credit = close_overtime(day.and_hms_opt(18, 15, 0).unwrap(), day.and_hms_opt(21, 45, 0).unwrap(), &window);
/// assert_eq!(credit.overtime_hours, Decimal::new(35, 1));
/// assert_eq!(credit.late_minutes, 15);
/// assert_eq!(credit.early_leave_minutes, 15);
/// ```
pub fn close_overtime(
    check_in: NaiveDateTime,
    now: NaiveDateTime,
    window: &TimeRange,
) -> OvertimeCredit {
    let start = check_in.max(window.start);
    let end = now.min(window.end);
    OvertimeCredit {
        overtime_hours: minutes_to_hours(positive_minutes(end - start)),
        late_minutes: positive_minutes(check_in - window.start),
        early_leave_minutes: positive_minutes(window.end - now),
    }
}

/// The window in which an overtime-only check-in is accepted.
pub fn overtime_check_in_window(window: &TimeRange, policy: &AttendancePolicy) -> TimeRange {
    window.widen(policy.overtime_early_check_in(), Duration::zero())
}

fn positive_minutes(delta: Duration) -> i64 {
    delta.num_minutes().max(0)
}
