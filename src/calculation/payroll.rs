//! Monthly payroll calculation.
//!
//! Each closed attendance record becomes up to two pay lines: regular hours at
//! the shift's hourly rate and overtime hours at that rate times the overtime
//! multiplier. Overtime-only records have no shift and fall back to the
//! employee's base rate. Every decision is recorded as an [`AuditStep`].

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    Attendance, AuditStep, AuditTrace, AuditWarning, Employee, PayCategory, PayLine, PayTotals,
    Payroll, PayrollMonth,
};

use super::pricing::round_money;

/// An attendance record paired with the hourly rate it is paid at.
#[derive(Debug, Clone, Copy)]
pub struct RatedAttendance<'a> {
    /// The attendance record.
    pub attendance: &'a Attendance,
    /// The shift's hourly rate, `None` for overtime-only records.
    pub shift_rate: Option<Decimal>,
}

/// Computes the payroll of `employee` for `period`.
///
/// Records outside the month and records still open are skipped with a
/// warning. Lines are emitted in work-date order.
///
/// # Example
///
/// ```
/// use hotel_engine::calculation::{calculate_payroll, RatedAttendance};
/// use hotel_engine::models::{Attendance, Employee, PayrollMonth};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let day = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// let employee = Employee {
///     id: Uuid::new_v4(),
///     full_name: "Tran Thi B".to_string(),
///     position: "Receptionist".to_string(),
///     base_hourly_rate: Decimal::from(30_000),
///     face_reference: None,
///     is_active: true,
/// };
/// let attendance = Attendance {
///     id: Uuid::new_v4(),
///     employee_id: employee.id,
///     work_date: day,
///     shift_assignment_id: Some(Uuid::new_v4()),
///     overtime_request_id: None,
///     check_in: day.and_hms_opt(8, 0, 0).unwrap(),
///     check_out: Some(day.and_hms_opt(16, 0, 0).unwrap()),
///     worked_hours: Decimal::from(8),
///     late_minutes: 0,
///     early_leave_minutes: 0,
///     overtime_hours: Decimal::ZERO,
///     is_overtime: false,
///     check_in_confidence: None,
/// };
/// let records = [RatedAttendance { attendance: &attendance, shift_rate: Some(Decimal::from(35_000)) }];
///
/// let payroll = calculate_payroll(
///     &employee,
///     PayrollMonth::parse("2025-01").unwrap(),
///     &records,
///     Decimal::new(15, 1),
///     day.and_hms_opt(23, 0, 0).unwrap(),
/// );
/// assert_eq!(payroll.totals.gross_pay, Decimal::from(280_000));
/// ```
pub fn calculate_payroll(
    employee: &Employee,
    period: PayrollMonth,
    records: &[RatedAttendance<'_>],
    overtime_multiplier: Decimal,
    generated_at: NaiveDateTime,
) -> Payroll {
    let mut trace = AuditTrace::default();
    let mut pay_lines = Vec::new();
    let mut totals = PayTotals::default();
    let mut days = BTreeSet::new();
    let mut step_number = 0u32;

    let mut ordered: Vec<&RatedAttendance<'_>> = records.iter().collect();
    ordered.sort_by_key(|r| (r.attendance.work_date, r.attendance.check_in));

    for record in ordered {
        let attendance = record.attendance;
        if !period.contains_date(attendance.work_date) {
            trace.warnings.push(AuditWarning {
                code: "OUTSIDE_PERIOD".to_string(),
                message: format!(
                    "Attendance {} on {} is outside {} - {}",
                    attendance.id, attendance.work_date, period.start_date, period.end_date
                ),
            });
            continue;
        }
        if attendance.is_open() {
            trace.warnings.push(AuditWarning {
                code: "OPEN_ATTENDANCE".to_string(),
                message: format!(
                    "Attendance {} on {} has no check-out and was not paid",
                    attendance.id, attendance.work_date
                ),
            });
            continue;
        }

        let (rate, rate_source) = match record.shift_rate {
            Some(rate) => (rate, "shift"),
            None => (employee.base_hourly_rate, "employee_base"),
        };

        step_number += 1;
        trace.steps.push(AuditStep {
            step_number,
            rule_id: "hourly_rate".to_string(),
            rule_name: "Hourly Rate Lookup".to_string(),
            input: serde_json::json!({
                "attendance_id": attendance.id,
                "work_date": attendance.work_date,
                "shift_assignment_id": attendance.shift_assignment_id,
            }),
            output: serde_json::json!({
                "rate": rate.normalize().to_string(),
                "source": rate_source,
            }),
            reasoning: format!("Using {} rate {}", rate_source, rate.normalize()),
        });

        if attendance.worked_hours > Decimal::ZERO {
            let amount = round_money(attendance.worked_hours * rate);
            step_number += 1;
            trace.steps.push(regular_step(step_number, attendance.id, attendance.worked_hours, rate, amount));
            pay_lines.push(PayLine {
                date: attendance.work_date,
                attendance_id: attendance.id,
                category: PayCategory::Regular,
                hours: attendance.worked_hours,
                rate,
                amount,
            });
            totals.regular_hours += attendance.worked_hours;
            totals.gross_pay += amount;
        }

        if attendance.overtime_hours > Decimal::ZERO {
            let overtime_rate = rate * overtime_multiplier;
            let amount = round_money(attendance.overtime_hours * overtime_rate);
            step_number += 1;
            trace.steps.push(AuditStep {
                step_number,
                rule_id: "overtime_pay".to_string(),
                rule_name: "Overtime Pay".to_string(),
                input: serde_json::json!({
                    "attendance_id": attendance.id,
                    "hours": attendance.overtime_hours.normalize().to_string(),
                    "base_rate": rate.normalize().to_string(),
                    "multiplier": overtime_multiplier.normalize().to_string(),
                }),
                output: serde_json::json!({
                    "rate": overtime_rate.normalize().to_string(),
                    "amount": amount.to_string(),
                }),
                reasoning: format!(
                    "{}h x {} x {} = {}",
                    attendance.overtime_hours.normalize(),
                    rate.normalize(),
                    overtime_multiplier.normalize(),
                    amount
                ),
            });
            pay_lines.push(PayLine {
                date: attendance.work_date,
                attendance_id: attendance.id,
                category: PayCategory::Overtime,
                hours: attendance.overtime_hours,
                rate: overtime_rate,
                amount,
            });
            totals.overtime_hours += attendance.overtime_hours;
            totals.gross_pay += amount;
        }

        totals.late_minutes += attendance.late_minutes;
        totals.early_leave_minutes += attendance.early_leave_minutes;
        days.insert(attendance.work_date);
    }

    totals.days_worked = days.len() as u32;

    step_number += 1;
    trace.steps.push(AuditStep {
        step_number,
        rule_id: "payroll_totals".to_string(),
        rule_name: "Payroll Totals".to_string(),
        input: serde_json::json!({ "pay_lines": pay_lines.len() }),
        output: serde_json::json!({
            "gross_pay": totals.gross_pay.to_string(),
            "regular_hours": totals.regular_hours.normalize().to_string(),
            "overtime_hours": totals.overtime_hours.normalize().to_string(),
            "days_worked": totals.days_worked,
        }),
        reasoning: format!(
            "{} pay lines over {} days, gross {}",
            pay_lines.len(),
            totals.days_worked,
            totals.gross_pay
        ),
    });

    Payroll {
        payroll_id: Uuid::new_v4(),
        generated_at,
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        employee_id: employee.id,
        period,
        pay_lines,
        totals,
        audit_trace: trace,
    }
}

fn regular_step(
    step_number: u32,
    attendance_id: Uuid,
    hours: Decimal,
    rate: Decimal,
    amount: Decimal,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "regular_pay".to_string(),
        rule_name: "Regular Pay".to_string(),
        input: serde_json::json!({
            "attendance_id": attendance_id,
            "hours": hours.normalize().to_string(),
            "rate": rate.normalize().to_string(),
        }),
        output: serde_json::json!({ "amount": amount.to_string() }),
        reasoning: format!("{}h x {} = {}", hours.normalize(), rate.normalize(), amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn make_employee() -> Employee {
        Employee {
            id: Uuid::new_v4(),
            full_name: "Le Van C".to_string(),
            position: "Housekeeping".to_string(),
            base_hourly_rate: dec("30000"),
            face_reference: None,
            is_active: true,
        }
    }

    fn make_attendance(date: &str, worked: &str, overtime: &str, main_shift: bool) -> Attendance {
        Attendance {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            work_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            shift_assignment_id: main_shift.then(Uuid::new_v4),
            overtime_request_id: (!main_shift).then(Uuid::new_v4),
            check_in: make_datetime(date, "08:00:00"),
            check_out: Some(make_datetime(date, "16:00:00")),
            worked_hours: dec(worked),
            late_minutes: 5,
            early_leave_minutes: 0,
            overtime_hours: dec(overtime),
            is_overtime: dec(overtime) > Decimal::ZERO,
            check_in_confidence: None,
        }
    }

    fn month() -> PayrollMonth {
        PayrollMonth::parse("2025-01").unwrap()
    }

    /// PAY-001: regular hours at shift rate
    #[test]
    fn test_regular_hours_at_shift_rate() {
        let employee = make_employee();
        let attendance = make_attendance("2025-01-10", "8", "0", true);
        let records = [RatedAttendance {
            attendance: &attendance,
            shift_rate: Some(dec("35000")),
        }];

        let payroll = calculate_payroll(&employee, month(), &records, dec("1.5"), make_datetime("2025-02-01", "00:00:00"));

        assert_eq!(payroll.pay_lines.len(), 1);
        assert_eq!(payroll.pay_lines[0].amount, dec("280000"));
        assert_eq!(payroll.totals.regular_hours, dec("8"));
        assert_eq!(payroll.totals.days_worked, 1);
        assert_eq!(payroll.totals.late_minutes, 5);
    }

    /// PAY-002: after-shift overtime at 1.5x
    #[test]
    fn test_overtime_uses_multiplier() {
        let employee = make_employee();
        let attendance = make_attendance("2025-01-10", "8", "2", true);
        let records = [RatedAttendance {
            attendance: &attendance,
            shift_rate: Some(dec("40000")),
        }];

        let payroll = calculate_payroll(&employee, month(), &records, dec("1.5"), make_datetime("2025-02-01", "00:00:00"));

        let overtime = payroll
            .pay_lines
            .iter()
            .find(|l| l.category == PayCategory::Overtime)
            .unwrap();
        assert_eq!(overtime.rate, dec("60000"));
        assert_eq!(overtime.amount, dec("120000"));
        assert_eq!(payroll.totals.gross_pay, dec("440000"));
    }

    /// PAY-003: overtime-only record falls back to base rate
    #[test]
    fn test_overtime_only_uses_base_rate() {
        let employee = make_employee();
        let attendance = make_attendance("2025-01-11", "0", "3.5", false);
        let records = [RatedAttendance {
            attendance: &attendance,
            shift_rate: None,
        }];

        let payroll = calculate_payroll(&employee, month(), &records, dec("1.5"), make_datetime("2025-02-01", "00:00:00"));

        assert_eq!(payroll.pay_lines.len(), 1);
        assert_eq!(payroll.pay_lines[0].rate, dec("45000"));
        assert_eq!(payroll.pay_lines[0].amount, dec("157500"));
        assert!(
            payroll
                .audit_trace
                .steps
                .iter()
                .any(|s| s.output["source"] == "employee_base")
        );
    }

    /// PAY-004: open and out-of-period records are skipped with warnings
    #[test]
    fn test_skipped_records_warn() {
        let employee = make_employee();
        let mut open = make_attendance("2025-01-12", "0", "0", true);
        open.check_out = None;
        let outside = make_attendance("2025-02-01", "8", "0", true);
        let records = [
            RatedAttendance {
                attendance: &open,
                shift_rate: Some(dec("30000")),
            },
            RatedAttendance {
                attendance: &outside,
                shift_rate: Some(dec("30000")),
            },
        ];

        let payroll = calculate_payroll(&employee, month(), &records, dec("1.5"), make_datetime("2025-02-01", "00:00:00"));

        assert!(payroll.pay_lines.is_empty());
        assert_eq!(payroll.totals.gross_pay, Decimal::ZERO);
        let codes: Vec<&str> = payroll.audit_trace.warnings.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, vec!["OPEN_ATTENDANCE", "OUTSIDE_PERIOD"]);
    }

    #[test]
    fn test_audit_steps_are_sequential() {
        let employee = make_employee();
        let a = make_attendance("2025-01-10", "8", "1", true);
        let b = make_attendance("2025-01-11", "6", "0", true);
        let records = [
            RatedAttendance { attendance: &b, shift_rate: Some(dec("30000")) },
            RatedAttendance { attendance: &a, shift_rate: Some(dec("30000")) },
        ];

        let payroll = calculate_payroll(&employee, month(), &records, dec("1.5"), make_datetime("2025-02-01", "00:00:00"));

        for (i, step) in payroll.audit_trace.steps.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }
        assert_eq!(payroll.pay_lines[0].attendance_id, a.id);
        assert_eq!(payroll.totals.days_worked, 2);
    }
}
