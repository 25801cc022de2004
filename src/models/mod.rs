//! Core data models for the hotel engine.
//!
//! This module contains all the domain records the store persists and the
//! computed results the services return.

mod attendance;
mod billing;
mod booking;
mod catalog;
mod employee;
mod overtime;
mod payroll;
mod promotion;
mod room;
mod shift;

pub use attendance::Attendance;
pub use billing::{Invoice, Payment, PaymentKind, PaymentMethod, PaymentStatus};
pub use booking::{AppliedPromotion, Booking, BookingRoom, BookingService, BookingStatus};
pub use catalog::{Customer, ServiceItem};
pub use employee::Employee;
pub use overtime::{OvertimeRequest, OvertimeType};
pub use payroll::{
    AuditStep, AuditTrace, AuditWarning, PayCategory, PayLine, PayTotals, Payroll, PayrollMonth,
};
pub use promotion::{DiscountType, Promotion, PromotionStatus};
pub use room::{Amenity, AmenityQuantity, Room, RoomStatus, RoomType};
pub use shift::{Shift, ShiftAssignment};
