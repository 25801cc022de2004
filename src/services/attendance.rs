//! Face-check attendance.
//!
//! One endpoint handles both arrival and departure: the reconciler works out
//! from the employee's open records, assignments and overtime requests what
//! a face check at `now` means.
//!
//! Priority order:
//!
//! 1. An open overtime-only record is closed.
//! 2. A main shift (today's assignments before yesterday's) whose effective
//!    window contains `now` is checked into or out of.
//! 3. A custom overtime window accepting check-in opens an overtime-only record.
//! 4. Anything else is rejected.

use chrono::{Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::calculation::{
    ShiftSlot, check_in_lateness, close_main_shift, close_overtime, ensure_min_elapsed,
    find_after_shift_overtime, find_slot, overtime_check_in_window,
};
use crate::config::AttendancePolicy;
use crate::context::RequestContext;
use crate::error::{HotelError, HotelResult};
use crate::models::{Attendance, Employee, OvertimeType};
use crate::store::{Database, Store};

use super::face::{FaceRecognizer, identify};
use super::validation::{check, not_blank};

/// Persisted hours keep two decimal places.
const HOURS_DP: u32 = 2;

/// A captured image submitted at the attendance kiosk.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FaceCheckInput {
    /// Base64-encoded capture.
    #[validate(length(min = 1), custom = "not_blank")]
    pub image_base64: String,
}

/// Whether a face check opened or closed a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceCheckAction {
    /// A record was opened.
    CheckIn,
    /// A record was closed.
    CheckOut,
}

/// What a face check did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceCheckOutcome {
    /// Opened or closed.
    pub action: FaceCheckAction,
    /// The recognized employee.
    pub employee: Employee,
    /// The record touched.
    pub attendance: Attendance,
    /// Match confidence.
    pub confidence: Decimal,
}

/// Filters for listing attendance.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceFilter {
    /// Only this employee's records.
    pub employee_id: Option<Uuid>,
    /// Work dates on or after.
    pub from: Option<NaiveDate>,
    /// Work dates on or before.
    pub to: Option<NaiveDate>,
}

/// Lists attendance by work date and check-in.
pub async fn list_attendances(store: &Store, filter: &AttendanceFilter) -> Vec<Attendance> {
    store
        .read(|db| {
            let mut records: Vec<Attendance> = db
                .attendances
                .values()
                .filter(|a| filter.employee_id.is_none_or(|e| a.employee_id == e))
                .filter(|a| filter.from.is_none_or(|d| a.work_date >= d))
                .filter(|a| filter.to.is_none_or(|d| a.work_date <= d))
                .cloned()
                .collect();
            records.sort_by_key(|a| (a.work_date, a.check_in));
            records
        })
        .await
}

/// Recognizes the employee in `input` and records the check.
///
/// Unrecognized faces are a business-rule rejection; nothing is written.
pub async fn face_check(
    store: &Store,
    ctx: &RequestContext,
    policy: &AttendancePolicy,
    recognizer: &dyn FaceRecognizer,
    threshold: Decimal,
    input: FaceCheckInput,
) -> HotelResult<FaceCheckOutcome> {
    check(&input)?;
    let candidates: Vec<Employee> = store
        .read(|db| {
            db.employees
                .values()
                .filter(|e| e.is_recognizable())
                .cloned()
                .collect()
        })
        .await;

    let Some(found) = identify(recognizer, &candidates, &input.image_base64, threshold).await
    else {
        warn!(candidates = candidates.len(), "Face not recognized");
        return Err(HotelError::rule("Face not recognized"));
    };

    record_check(store, ctx, policy, found.employee.id, found.confidence).await
}

/// Records a check for an already identified employee.
pub async fn record_check(
    store: &Store,
    ctx: &RequestContext,
    policy: &AttendancePolicy,
    employee_id: Uuid,
    confidence: Decimal,
) -> HotelResult<FaceCheckOutcome> {
    let now = ctx.now;
    let outcome = store
        .transaction(|db| {
            let employee = db.employee(employee_id)?.clone();
            if !employee.is_active {
                return Err(HotelError::StateConflict {
                    entity: "employee",
                    action: "record attendance for",
                    state: "inactive".to_string(),
                });
            }
            let (action, attendance) = reconcile(db, employee_id, now, confidence, policy)?;
            db.attendances.insert(attendance.id, attendance.clone());
            Ok(FaceCheckOutcome {
                action,
                employee,
                attendance,
                confidence,
            })
        })
        .await?;

    info!(
        employee_id = %employee_id,
        attendance_id = %outcome.attendance.id,
        action = ?outcome.action,
        confidence = %confidence,
        "Attendance recorded"
    );
    Ok(outcome)
}

fn reconcile(
    db: &Database,
    employee_id: Uuid,
    now: NaiveDateTime,
    confidence: Decimal,
    policy: &AttendancePolicy,
) -> HotelResult<(FaceCheckAction, Attendance)> {
    if let Some(open) = db
        .attendances
        .values()
        .find(|a| a.employee_id == employee_id && a.is_open() && a.is_overtime_only())
    {
        return close_overtime_record(db, open, now, policy);
    }

    let slots = shift_slots(db, employee_id, now.date())?;
    let closed = |assignment_id: Uuid| {
        db.attendances
            .values()
            .any(|a| a.shift_assignment_id == Some(assignment_id) && !a.is_open())
    };
    if let Some(slot) = find_slot(&slots, now, policy, closed) {
        let open = db
            .attendances
            .values()
            .find(|a| a.shift_assignment_id == Some(slot.assignment_id) && a.is_open());
        return match open {
            Some(open) => close_main_record(db, open, slot, now, policy),
            None => open_main_record(employee_id, slot, now, confidence, policy),
        };
    }

    open_overtime_record(db, employee_id, now, confidence, policy)
}

/// Today's assignments first, then yesterday's for overnight shifts.
fn shift_slots(db: &Database, employee_id: Uuid, today: NaiveDate) -> HotelResult<Vec<ShiftSlot>> {
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    let mut slots = Vec::new();
    for date in [today, yesterday] {
        let mut day_slots = Vec::new();
        for assignment in db
            .shift_assignments
            .values()
            .filter(|a| a.employee_id == employee_id && a.work_date == date)
        {
            let shift = db.shift(assignment.shift_id)?;
            day_slots.push(ShiftSlot {
                assignment_id: assignment.id,
                shift_id: shift.id,
                work_date: date,
                window: shift.window_on(date),
            });
        }
        day_slots.sort_by_key(|slot| slot.window.start);
        slots.extend(day_slots);
    }
    Ok(slots)
}

fn open_main_record(
    employee_id: Uuid,
    slot: &ShiftSlot,
    now: NaiveDateTime,
    confidence: Decimal,
    policy: &AttendancePolicy,
) -> HotelResult<(FaceCheckAction, Attendance)> {
    let late_minutes = check_in_lateness(&slot.window, now, policy)?;
    Ok((
        FaceCheckAction::CheckIn,
        Attendance {
            id: Uuid::new_v4(),
            employee_id,
            work_date: slot.work_date,
            shift_assignment_id: Some(slot.assignment_id),
            overtime_request_id: None,
            check_in: now,
            check_out: None,
            worked_hours: Decimal::ZERO,
            late_minutes,
            early_leave_minutes: 0,
            overtime_hours: Decimal::ZERO,
            is_overtime: false,
            check_in_confidence: Some(confidence),
        },
    ))
}

fn close_main_record(
    db: &Database,
    open: &Attendance,
    slot: &ShiftSlot,
    now: NaiveDateTime,
    policy: &AttendancePolicy,
) -> HotelResult<(FaceCheckAction, Attendance)> {
    ensure_min_elapsed(open.check_in, now, &slot.window, policy)?;

    let requests = db
        .overtime_requests
        .values()
        .filter(|r| r.employee_id == open.employee_id);
    let after_shift = find_after_shift_overtime(&slot.window, requests, policy);
    let credit = close_main_shift(open.check_in, now, &slot.window, after_shift);

    let mut closed = open.clone();
    closed.check_out = Some(now);
    closed.worked_hours = credit.worked_hours.round_dp(HOURS_DP);
    closed.early_leave_minutes = credit.early_leave_minutes;
    closed.overtime_hours = credit.overtime_hours.round_dp(HOURS_DP);
    closed.overtime_request_id = credit.overtime_request_id;
    closed.is_overtime = closed.overtime_hours > Decimal::ZERO;
    Ok((FaceCheckAction::CheckOut, closed))
}

fn open_overtime_record(
    db: &Database,
    employee_id: Uuid,
    now: NaiveDateTime,
    confidence: Decimal,
    policy: &AttendancePolicy,
) -> HotelResult<(FaceCheckAction, Attendance)> {
    let mut candidates: Vec<_> = db
        .overtime_requests
        .values()
        .filter(|r| r.employee_id == employee_id && r.overtime_type == OvertimeType::Custom)
        .filter(|r| overtime_check_in_window(&r.window(), policy).contains(now))
        .collect();
    candidates.sort_by_key(|r| r.window().start);

    let Some(request) = candidates.first() else {
        return Err(HotelError::rule_with(
            "No matching shift or overtime window",
            serde_json::json!({ "employee_id": employee_id, "at": now }),
        ));
    };
    if db
        .attendances
        .values()
        .any(|a| a.overtime_request_id == Some(request.id))
    {
        return Err(HotelError::rule_with(
            "Already checked in for this overtime",
            serde_json::json!({ "overtime_request_id": request.id }),
        ));
    }

    let window = request.window();
    Ok((
        FaceCheckAction::CheckIn,
        Attendance {
            id: Uuid::new_v4(),
            employee_id,
            work_date: request.work_date,
            shift_assignment_id: None,
            overtime_request_id: Some(request.id),
            check_in: now,
            check_out: None,
            worked_hours: Decimal::ZERO,
            late_minutes: (now - window.start).num_minutes().max(0),
            early_leave_minutes: 0,
            overtime_hours: Decimal::ZERO,
            is_overtime: true,
            check_in_confidence: Some(confidence),
        },
    ))
}

fn close_overtime_record(
    db: &Database,
    open: &Attendance,
    now: NaiveDateTime,
    policy: &AttendancePolicy,
) -> HotelResult<(FaceCheckAction, Attendance)> {
    let request_id = open.overtime_request_id.ok_or_else(|| HotelError::Internal {
        message: format!("overtime attendance {} has no request", open.id),
    })?;
    let window = db.overtime_request(request_id)?.window();
    ensure_min_elapsed(open.check_in, now, &window, policy)?;

    let credit = close_overtime(open.check_in, now, &window);
    let mut closed = open.clone();
    closed.check_out = Some(now);
    closed.overtime_hours = credit.overtime_hours.round_dp(HOURS_DP);
    closed.late_minutes = credit.late_minutes;
    closed.early_leave_minutes = credit.early_leave_minutes;
    Ok((FaceCheckAction::CheckOut, closed))
}
