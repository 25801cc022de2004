//! Overtime request registration.
//!
//! An employee holds at most one overtime request per work date; registering
//! another replaces it. Requests that overlap the new window are only
//! replaced when the caller asks for it explicitly.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::calculation::{
    TimeRange, ensure_after_shift_alignment, ensure_no_attendance_overlap,
    ensure_no_request_overlap, ensure_not_past, ensure_within_cap, overlapping_requests, window_on,
};
use crate::config::AttendancePolicy;
use crate::context::RequestContext;
use crate::error::{HotelError, HotelResult};
use crate::models::{OvertimeRequest, OvertimeType};
use crate::store::{Database, Store};

use super::validation::check;

/// Input for registering overtime.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_overtime_input"))]
pub struct OvertimeInput {
    /// Employee reference.
    pub employee_id: Uuid,
    /// Date the window starts on.
    pub work_date: NaiveDate,
    /// Start time of day.
    pub start_time: NaiveTime,
    /// End time of day; at or before start means the next day.
    pub end_time: NaiveTime,
    /// After-shift or custom.
    pub overtime_type: OvertimeType,
    /// Why the overtime is needed.
    #[validate(length(max = 255))]
    pub reason: Option<String>,
    /// Replace same-day requests even when they overlap the new window.
    #[serde(default)]
    pub replace_existing: bool,
}

fn validate_overtime_input(input: &OvertimeInput) -> Result<(), ValidationError> {
    if input.start_time == input.end_time {
        let mut err = ValidationError::new("overtime_window");
        err.message = Some("start_time and end_time must differ".into());
        return Err(err);
    }
    Ok(())
}

impl OvertimeInput {
    fn window(&self) -> TimeRange {
        window_on(self.work_date, self.start_time, self.end_time)
    }
}

/// Filters for listing overtime requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OvertimeFilter {
    /// Only this employee's requests.
    pub employee_id: Option<Uuid>,
    /// Work dates on or after.
    pub from: Option<NaiveDate>,
    /// Work dates on or before.
    pub to: Option<NaiveDate>,
}

/// Lists overtime requests by work date and start.
pub async fn list_overtime(store: &Store, filter: &OvertimeFilter) -> Vec<OvertimeRequest> {
    store
        .read(|db| {
            let mut requests: Vec<OvertimeRequest> = db
                .overtime_requests
                .values()
                .filter(|r| filter.employee_id.is_none_or(|e| r.employee_id == e))
                .filter(|r| filter.from.is_none_or(|d| r.work_date >= d))
                .filter(|r| filter.to.is_none_or(|d| r.work_date <= d))
                .cloned()
                .collect();
            requests.sort_by_key(|r| (r.work_date, r.start_time));
            requests
        })
        .await
}

/// Registers overtime, replacing the employee's other requests for that date.
pub async fn create_overtime(
    store: &Store,
    ctx: &RequestContext,
    policy: &AttendancePolicy,
    input: OvertimeInput,
) -> HotelResult<OvertimeRequest> {
    check(&input)?;
    ensure_not_past(input.work_date, ctx.today())?;
    let window = input.window();
    let now = ctx.now;

    let (request, replaced) = store
        .transaction(|db| {
            let employee = db.employee(input.employee_id)?;
            if !employee.is_active {
                return Err(HotelError::StateConflict {
                    entity: "employee",
                    action: "register overtime for",
                    state: "inactive".to_string(),
                });
            }

            // After-shift overtime adjoins the shift it continues; that
            // shift's own attendance is not a conflict.
            let mut continued = Vec::new();
            if input.overtime_type == OvertimeType::AfterShift {
                let assigned = assigned_windows(db, input.employee_id, input.work_date)?;
                let shift_windows: Vec<TimeRange> = assigned.iter().map(|(_, w)| *w).collect();
                ensure_after_shift_alignment(&window, &shift_windows, policy)?;
                let tolerance = policy.after_shift_tolerance();
                continued = assigned
                    .iter()
                    .filter(|(_, w)| (window.start - w.end).abs() <= tolerance)
                    .map(|(id, _)| *id)
                    .collect();
            }

            let main_shifts = main_shifts_worked(db, input.employee_id, input.work_date);
            ensure_within_cap(&window, main_shifts, policy)?;
            let worked = attendance_intervals(db, input.employee_id, &continued)?;
            ensure_no_attendance_overlap(&window, worked)?;

            let same_day: Vec<&OvertimeRequest> = db
                .overtime_requests
                .values()
                .filter(|r| r.employee_id == input.employee_id && r.work_date == input.work_date)
                .collect();
            if !input.replace_existing {
                let overlapping = overlapping_requests(&window, same_day.iter().copied());
                ensure_no_request_overlap(&window, &overlapping)?;
            }

            let replaced: Vec<Uuid> = same_day.iter().map(|r| r.id).collect();
            for id in &replaced {
                if has_attendance(db, *id) {
                    return Err(HotelError::StateConflict {
                        entity: "overtime request",
                        action: "replace",
                        state: "attended".to_string(),
                    });
                }
            }
            for id in &replaced {
                db.overtime_requests.remove(id);
            }

            let request = OvertimeRequest {
                id: Uuid::new_v4(),
                employee_id: input.employee_id,
                work_date: input.work_date,
                start_time: input.start_time,
                end_time: input.end_time,
                overtime_type: input.overtime_type,
                reason: input.reason.clone(),
                created_at: now,
            };
            db.overtime_requests.insert(request.id, request.clone());
            Ok((request, replaced))
        })
        .await?;

    if !replaced.is_empty() {
        warn!(
            employee_id = %request.employee_id,
            work_date = %request.work_date,
            replaced = ?replaced,
            "Overtime requests replaced"
        );
    }
    info!(
        overtime_request_id = %request.id,
        employee_id = %request.employee_id,
        overtime_type = %request.overtime_type,
        actor = ?ctx.actor_id,
        "Overtime registered"
    );
    Ok(request)
}

/// Deletes a request that has not been worked.
pub async fn delete_overtime(store: &Store, ctx: &RequestContext, id: Uuid) -> HotelResult<()> {
    store
        .transaction(|db| {
            db.overtime_request(id)?;
            if has_attendance(db, id) {
                return Err(HotelError::StateConflict {
                    entity: "overtime request",
                    action: "delete",
                    state: "attended".to_string(),
                });
            }
            db.overtime_requests.remove(&id);
            Ok(())
        })
        .await?;

    info!(overtime_request_id = %id, actor = ?ctx.actor_id, "Overtime deleted");
    Ok(())
}

fn has_attendance(db: &Database, request_id: Uuid) -> bool {
    db.attendances
        .values()
        .any(|a| a.overtime_request_id == Some(request_id))
}

/// Assignment ids and windows of the main shifts assigned on `date`.
fn assigned_windows(
    db: &Database,
    employee_id: Uuid,
    date: NaiveDate,
) -> HotelResult<Vec<(Uuid, TimeRange)>> {
    db.shift_assignments
        .values()
        .filter(|a| a.employee_id == employee_id && a.work_date == date)
        .map(|a| db.shift(a.shift_id).map(|s| (a.id, s.window_on(date))))
        .collect()
}

/// Distinct main shifts with attendance on `date`.
fn main_shifts_worked(db: &Database, employee_id: Uuid, date: NaiveDate) -> u32 {
    let shifts: HashSet<Uuid> = db
        .attendances
        .values()
        .filter(|a| a.employee_id == employee_id && a.work_date == date)
        .filter_map(|a| a.shift_assignment_id)
        .collect();
    shifts.len() as u32
}

/// Main-shift attendance as intervals; open records run to the shift end.
fn attendance_intervals(
    db: &Database,
    employee_id: Uuid,
    skip_assignments: &[Uuid],
) -> HotelResult<Vec<TimeRange>> {
    let mut intervals = Vec::new();
    for attendance in db.attendances.values().filter(|a| {
        a.employee_id == employee_id
            && a.shift_assignment_id
                .is_some_and(|id| !skip_assignments.contains(&id))
    }) {
        let end = match attendance.check_out {
            Some(check_out) => check_out,
            None => {
                let assignment_id = attendance.shift_assignment_id.ok_or_else(|| {
                    HotelError::Internal {
                        message: format!("attendance {} has no assignment", attendance.id),
                    }
                })?;
                let assignment = db.shift_assignment(assignment_id)?;
                let shift = db.shift(assignment.shift_id)?;
                shift.window_on(assignment.work_date).end
            }
        };
        intervals.push(TimeRange::new(attendance.check_in, end.max(attendance.check_in)));
    }
    Ok(intervals)
}
