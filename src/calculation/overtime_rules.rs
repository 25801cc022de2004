//! Overtime request admission rules.
//!
//! An overtime request is admitted when its date is not in the past, its length
//! fits the cap for the main shifts already worked that day, it does not
//! overlap main-shift attendance, and (unless replacing) it does not overlap
//! another request of the same day.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::AttendancePolicy;
use crate::error::{HotelError, HotelResult};
use crate::models::OvertimeRequest;

use super::time_range::{TimeRange, minutes_to_hours};

/// Rejects work dates before `today`.
pub fn ensure_not_past(work_date: NaiveDate, today: NaiveDate) -> HotelResult<()> {
    if work_date < today {
        return Err(HotelError::invalid(
            "work_date",
            "overtime cannot be requested for a past date",
        ));
    }
    Ok(())
}

/// Checks `window` against the cap for `main_shifts` worked that day.
///
/// The error details carry `max_allowed` so callers can show the limit.
///
/// # Example
///
/// ```
/// use hotel_engine::calculation::{ensure_within_cap, TimeRange};
/// use hotel_engine::config::AttendancePolicy;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// let window = TimeRange::new(day.and_hms_opt(18, 0, 0).unwrap(), day.and_hms_opt(22, 0, 0).unwrap());
/// let policy = AttendancePolicy::default();
///
/// assert!(ensure_within_cap(&window, 1, &policy).is_ok());
/// assert!(ensure_within_cap(&window, 2, &policy).is_err());
/// ```
pub fn ensure_within_cap(
    window: &TimeRange,
    main_shifts: u32,
    policy: &AttendancePolicy,
) -> HotelResult<()> {
    let max_allowed = policy.overtime_cap_hours(main_shifts);
    let requested = minutes_to_hours(window.minutes());

    if max_allowed <= Decimal::ZERO {
        return Err(HotelError::rule_with(
            format!("Overtime is not allowed after {} main shifts", main_shifts),
            serde_json::json!({
                "main_shifts": main_shifts,
                "max_allowed": max_allowed,
                "requested_hours": requested.round_dp(2),
            }),
        ));
    }
    if requested > max_allowed {
        return Err(HotelError::rule_with(
            format!("Overtime exceeds the {} hour limit", max_allowed),
            serde_json::json!({
                "main_shifts": main_shifts,
                "max_allowed": max_allowed,
                "requested_hours": requested.round_dp(2),
            }),
        ));
    }
    Ok(())
}

/// Rejects `window` when it overlaps any main-shift attendance interval.
pub fn ensure_no_attendance_overlap<I>(window: &TimeRange, attendance: I) -> HotelResult<()>
where
    I: IntoIterator<Item = TimeRange>,
{
    if let Some(worked) = attendance.into_iter().find(|worked| window.overlaps(worked)) {
        return Err(HotelError::rule_with(
            "Overtime overlaps a main shift attendance",
            serde_json::json!({
                "conflict": "attendance",
                "start": worked.start,
                "end": worked.end,
            }),
        ));
    }
    Ok(())
}

/// Requests of the same day whose window overlaps `window`.
pub fn overlapping_requests<'a, I>(window: &TimeRange, requests: I) -> Vec<&'a OvertimeRequest>
where
    I: IntoIterator<Item = &'a OvertimeRequest>,
{
    requests
        .into_iter()
        .filter(|request| window.overlaps(&request.window()))
        .collect()
}

/// Rejects `window` when it overlaps another request.
pub fn ensure_no_request_overlap(
    window: &TimeRange,
    overlapping: &[&OvertimeRequest],
) -> HotelResult<()> {
    if overlapping.is_empty() {
        return Ok(());
    }
    let ids: Vec<String> = overlapping.iter().map(|r| r.id.to_string()).collect();
    Err(HotelError::rule_with(
        "Overtime overlaps an existing overtime request",
        serde_json::json!({
            "conflict": "overtime_request",
            "request_ids": ids,
            "start": window.start,
            "end": window.end,
        }),
    ))
}

/// Requires an after-shift window to start at the end of one of `shifts`.
pub fn ensure_after_shift_alignment(
    window: &TimeRange,
    shifts: &[TimeRange],
    policy: &AttendancePolicy,
) -> HotelResult<()> {
    let tolerance = policy.after_shift_tolerance();
    if shifts
        .iter()
        .any(|shift| (window.start - shift.end).abs() <= tolerance)
    {
        return Ok(());
    }
    Err(HotelError::rule_with(
        format!(
            "After-shift overtime must start within {} minutes of a main shift end",
            policy.after_shift_tolerance_minutes
        ),
        serde_json::json!({
            "start": window.start,
            "shift_ends": shifts.iter().map(|s| s.end).collect::<Vec<_>>(),
        }),
    ))
}
