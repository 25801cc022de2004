//! Employees, shifts and main-shift assignments.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::config::AttendancePolicy;
use crate::context::RequestContext;
use crate::error::{HotelError, HotelResult};
use crate::models::{Employee, Shift, ShiftAssignment};
use crate::store::Store;

use super::face::FaceRecognizer;
use super::validation::{check, non_negative_decimal, not_blank};

/// Input for registering an employee.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmployeeInput {
    /// Full name.
    #[validate(length(min = 1, max = 100), custom = "not_blank")]
    pub full_name: String,
    /// Job title.
    #[validate(length(min = 1, max = 50))]
    pub position: String,
    /// Rate for overtime-only attendance.
    #[validate(custom = "non_negative_decimal")]
    pub base_hourly_rate: Decimal,
    /// Whether the employee may check in.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Reference portrait upload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FaceInput {
    /// Base64-encoded image.
    #[validate(length(min = 1), custom = "not_blank")]
    pub image_base64: String,
}

/// Input for defining a shift.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_shift_input"))]
pub struct ShiftInput {
    /// Display name.
    #[validate(length(min = 1, max = 50), custom = "not_blank")]
    pub name: String,
    /// Start time of day.
    pub start_time: NaiveTime,
    /// End time of day; earlier than start means overnight.
    pub end_time: NaiveTime,
    /// Pay per worked hour.
    #[validate(custom = "non_negative_decimal")]
    pub hourly_rate: Decimal,
}

fn validate_shift_input(input: &ShiftInput) -> Result<(), ValidationError> {
    if input.start_time == input.end_time {
        let mut err = ValidationError::new("shift_window");
        err.message = Some("start_time and end_time must differ".into());
        return Err(err);
    }
    Ok(())
}

/// Input for putting an employee on a shift.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ShiftAssignmentInput {
    /// Employee reference.
    pub employee_id: Uuid,
    /// Shift reference.
    pub shift_id: Uuid,
    /// Date the shift starts on.
    pub work_date: NaiveDate,
}

/// Filters for listing assignments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentFilter {
    /// Only this employee's assignments.
    pub employee_id: Option<Uuid>,
    /// Work dates on or after.
    pub from: Option<NaiveDate>,
    /// Work dates on or before.
    pub to: Option<NaiveDate>,
}

/// Lists employees by name.
pub async fn list_employees(store: &Store) -> Vec<Employee> {
    store
        .read(|db| {
            let mut employees: Vec<Employee> = db.employees.values().cloned().collect();
            employees.sort_by(|a, b| a.full_name.cmp(&b.full_name));
            employees
        })
        .await
}

/// Fetches one employee.
pub async fn get_employee(store: &Store, id: Uuid) -> HotelResult<Employee> {
    store.read(|db| db.employee(id).cloned()).await
}

/// Registers an employee without a reference portrait.
pub async fn create_employee(
    store: &Store,
    ctx: &RequestContext,
    input: EmployeeInput,
) -> HotelResult<Employee> {
    check(&input)?;
    let employee = Employee {
        id: Uuid::new_v4(),
        full_name: input.full_name.trim().to_string(),
        position: input.position,
        base_hourly_rate: input.base_hourly_rate,
        face_reference: None,
        is_active: input.is_active,
    };
    let employee = store
        .transaction(|db| {
            db.employees.insert(employee.id, employee.clone());
            Ok(employee)
        })
        .await?;

    info!(employee_id = %employee.id, actor = ?ctx.actor_id, "Employee registered");
    Ok(employee)
}

/// Stores a reference portrait after checking it shows exactly one face.
pub async fn set_face(
    store: &Store,
    ctx: &RequestContext,
    recognizer: &dyn FaceRecognizer,
    id: Uuid,
    input: FaceInput,
) -> HotelResult<Employee> {
    check(&input)?;
    store.read(|db| db.employee(id).map(|_| ())).await?;

    let faces = match recognizer.detect(&input.image_base64).await {
        Ok(faces) => faces,
        Err(err) => {
            warn!(employee_id = %id, error = %err, "Face detection failed during registration");
            return Err(HotelError::rule("Face could not be verified"));
        }
    };
    if faces != 1 {
        return Err(HotelError::rule_with(
            "Reference image must contain exactly one face",
            serde_json::json!({ "faces_detected": faces }),
        ));
    }

    let employee = store
        .transaction(|db| {
            let employee = db.employee_mut(id)?;
            employee.face_reference = Some(input.image_base64);
            Ok(employee.clone())
        })
        .await?;

    info!(employee_id = %id, actor = ?ctx.actor_id, "Face reference updated");
    Ok(employee)
}

/// Lists shifts by start time.
pub async fn list_shifts(store: &Store) -> Vec<Shift> {
    store
        .read(|db| {
            let mut shifts: Vec<Shift> = db.shifts.values().cloned().collect();
            shifts.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.name.cmp(&b.name)));
            shifts
        })
        .await
}

/// Defines a shift.
pub async fn create_shift(store: &Store, ctx: &RequestContext, input: ShiftInput) -> HotelResult<Shift> {
    check(&input)?;
    let shift = store
        .transaction(|db| {
            let name = input.name.trim();
            if db.shifts.values().any(|s| s.name.eq_ignore_ascii_case(name)) {
                return Err(HotelError::invalid("name", "a shift with this name already exists"));
            }
            let shift = Shift {
                id: Uuid::new_v4(),
                name: name.to_string(),
                start_time: input.start_time,
                end_time: input.end_time,
                hourly_rate: input.hourly_rate,
            };
            db.shifts.insert(shift.id, shift.clone());
            Ok(shift)
        })
        .await?;

    info!(shift_id = %shift.id, name = %shift.name, actor = ?ctx.actor_id, "Shift created");
    Ok(shift)
}

/// Lists assignments by work date.
pub async fn list_assignments(store: &Store, filter: &AssignmentFilter) -> Vec<ShiftAssignment> {
    store
        .read(|db| {
            let mut assignments: Vec<ShiftAssignment> = db
                .shift_assignments
                .values()
                .filter(|a| filter.employee_id.is_none_or(|e| a.employee_id == e))
                .filter(|a| filter.from.is_none_or(|d| a.work_date >= d))
                .filter(|a| filter.to.is_none_or(|d| a.work_date <= d))
                .cloned()
                .collect();
            assignments.sort_by_key(|a| (a.work_date, a.employee_id));
            assignments
        })
        .await
}

/// Puts an employee on a shift for one date.
///
/// An employee holds at most `max_main_shifts_per_day` assignments per date,
/// never the same shift twice and never two overlapping windows.
pub async fn assign_shift(
    store: &Store,
    ctx: &RequestContext,
    policy: &AttendancePolicy,
    input: ShiftAssignmentInput,
) -> HotelResult<ShiftAssignment> {
    check(&input)?;
    let assignment = store
        .transaction(|db| {
            let employee = db.employee(input.employee_id)?;
            if !employee.is_active {
                return Err(HotelError::StateConflict {
                    entity: "employee",
                    action: "assign a shift to",
                    state: "inactive".to_string(),
                });
            }
            let window = db.shift(input.shift_id)?.window_on(input.work_date);

            let same_day: Vec<&ShiftAssignment> = db
                .shift_assignments
                .values()
                .filter(|a| a.employee_id == input.employee_id && a.work_date == input.work_date)
                .collect();
            if same_day.iter().any(|a| a.shift_id == input.shift_id) {
                return Err(HotelError::rule("Employee is already assigned to this shift"));
            }
            if same_day.len() as u32 >= policy.max_main_shifts_per_day {
                return Err(HotelError::rule_with(
                    format!(
                        "Employee already has {} main shifts on this date",
                        policy.max_main_shifts_per_day
                    ),
                    serde_json::json!({
                        "work_date": input.work_date,
                        "max_main_shifts": policy.max_main_shifts_per_day,
                    }),
                ));
            }
            for existing in &same_day {
                let other = db.shift(existing.shift_id)?.window_on(existing.work_date);
                if window.overlaps_strictly(&other) {
                    return Err(HotelError::rule_with(
                        "Shift overlaps another assigned shift",
                        serde_json::json!({ "assignment_id": existing.id }),
                    ));
                }
            }

            let assignment = ShiftAssignment {
                id: Uuid::new_v4(),
                employee_id: input.employee_id,
                shift_id: input.shift_id,
                work_date: input.work_date,
            };
            db.shift_assignments.insert(assignment.id, assignment.clone());
            Ok(assignment)
        })
        .await?;

    info!(
        assignment_id = %assignment.id,
        employee_id = %assignment.employee_id,
        work_date = %assignment.work_date,
        actor = ?ctx.actor_id,
        "Shift assigned"
    );
    Ok(assignment)
}
