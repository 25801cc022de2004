//! Employee model.
//!
//! Employees are the staff whose attendance and payroll the engine tracks.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a member of staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: Uuid,
    /// Full name.
    pub full_name: String,
    /// Job title (e.g., "receptionist").
    pub position: String,
    /// Hourly rate used for overtime-only attendance.
    pub base_hourly_rate: Decimal,
    /// Reference portrait (base64) compared against check-in captures.
    #[serde(default, skip_serializing)]
    pub face_reference: Option<String>,
    /// Inactive employees cannot check in.
    pub is_active: bool,
}

impl Employee {
    /// Whether the employee can be matched by face recognition.
    ///
    /// # Examples
    ///
    /// ```
    /// use hotel_engine::models::Employee;
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let employee = Employee {
    ///     id: Uuid::new_v4(),
    ///     full_name: "Lan Tran".to_string(),
    ///     position: "receptionist".to_string(),
    ///     base_hourly_rate: Decimal::from(30_000),
    ///     face_reference: Some("aGVsbG8=".to_string()),
    ///     is_active: true,
    /// };
    /// assert!(employee.is_recognizable());
    /// ```
    pub fn is_recognizable(&self) -> bool {
        self.is_active && self.face_reference.as_deref().is_some_and(|f| !f.is_empty())
    }
}
