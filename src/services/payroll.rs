//! Monthly payroll for one employee.

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::calculation::{RatedAttendance, calculate_payroll};
use crate::context::RequestContext;
use crate::error::{HotelError, HotelResult};
use crate::models::{Attendance, Payroll, PayrollMonth};
use crate::store::Store;

/// Query for a payroll run.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollQuery {
    /// Employee to pay.
    pub employee_id: Uuid,
    /// Month as `YYYY-MM`.
    pub month: String,
}

/// Computes the payroll of an employee for a month.
///
/// Nothing is persisted; running it twice for the same data gives the same
/// lines and totals.
pub async fn run_payroll(
    store: &Store,
    ctx: &RequestContext,
    overtime_multiplier: Decimal,
    query: &PayrollQuery,
) -> HotelResult<Payroll> {
    let period = PayrollMonth::parse(&query.month)?;

    let payroll = store
        .read(|db| {
            let employee = db.employee(query.employee_id)?;
            let records: Vec<&Attendance> = db
                .attendances
                .values()
                .filter(|a| a.employee_id == employee.id && period.contains_date(a.work_date))
                .collect();

            let mut rated = Vec::with_capacity(records.len());
            for attendance in records {
                let shift_rate = match attendance.shift_assignment_id {
                    Some(assignment_id) => {
                        let assignment = db.shift_assignment(assignment_id)?;
                        Some(db.shift(assignment.shift_id)?.hourly_rate)
                    }
                    None => None,
                };
                rated.push(RatedAttendance {
                    attendance,
                    shift_rate,
                });
            }

            Ok::<_, HotelError>(calculate_payroll(
                employee,
                period,
                &rated,
                overtime_multiplier,
                ctx.now,
            ))
        })
        .await?;

    info!(
        payroll_id = %payroll.payroll_id,
        employee_id = %payroll.employee_id,
        month = %query.month,
        gross_pay = %payroll.totals.gross_pay,
        warnings = payroll.audit_trace.warnings.len(),
        "Payroll calculated"
    );
    Ok(payroll)
}
