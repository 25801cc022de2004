//! Explicit per-operation context.
//!
//! Service operations never read the wall clock or an ambient "current user";
//! both arrive in a [`RequestContext`] built by the caller.

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};
use uuid::Uuid;

/// Source of the current local time.
pub trait Clock: Send + Sync {
    /// Returns the current local date and time.
    fn now(&self) -> NaiveDateTime;
}

/// Reads the host's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant. Used by tests and replay tooling.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Shared clock handle stored in application state.
pub type SharedClock = Arc<dyn Clock>;

/// Who is acting and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    /// The staff member performing the operation, when known.
    pub actor_id: Option<Uuid>,
    /// The instant the operation is evaluated at.
    pub now: NaiveDateTime,
}

impl RequestContext {
    /// Creates a context for the given actor at the given instant.
    pub fn new(actor_id: Option<Uuid>, now: NaiveDateTime) -> Self {
        Self { actor_id, now }
    }

    /// Creates an anonymous context at the given instant.
    pub fn at(now: NaiveDateTime) -> Self {
        Self { actor_id: None, now }
    }

    /// The calendar date of [`Self::now`].
    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_stable() {
        let instant = NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_context_today_is_date_of_now() {
        let instant = NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let ctx = RequestContext::at(instant);
        assert_eq!(ctx.today(), NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert!(ctx.actor_id.is_none());
    }
}
