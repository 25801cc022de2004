//! Temporal range normalization.
//!
//! This module turns booking dates, shift times and overtime windows into
//! concrete [`TimeRange`]s and measures them. All comparisons use inclusive
//! boundaries: two ranges that merely touch are considered overlapping.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{HotelError, HotelResult};

/// A closed interval `[start, end]` of local date-times.
///
/// # Example
///
/// ```
/// use hotel_engine::calculation::TimeRange;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// let a = TimeRange::new(day.and_hms_opt(8, 0, 0).unwrap(), day.and_hms_opt(12, 0, 0).unwrap());
/// let b = TimeRange::new(day.and_hms_opt(12, 0, 0).unwrap(), day.and_hms_opt(16, 0, 0).unwrap());
/// assert!(a.overlaps(&b)); // touching boundaries overlap
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive start.
    pub start: NaiveDateTime,
    /// Inclusive end.
    pub end: NaiveDateTime,
}

impl TimeRange {
    /// Creates a range. Callers are expected to pass `start <= end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Whether `instant` lies within the range, boundaries included.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Inclusive overlap test.
    ///
    /// True when this range's start falls within `other`, or its end falls
    /// within `other`, or it fully contains `other`.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        other.contains(self.start)
            || other.contains(self.end)
            || (self.start <= other.start && self.end >= other.end)
    }

    /// Overlap of the interiors: ranges that only share an endpoint do not
    /// count.
    ///
    /// Used where back-to-back windows are legitimate, such as a 06:00-14:00
    /// shift followed by a 14:00-22:00 shift.
    pub fn overlaps_strictly(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Length of the range.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Length of the range in whole minutes.
    pub fn minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Intersection with `bounds`, or `None` when they are disjoint.
    pub fn clamp_to(&self, bounds: &TimeRange) -> Option<TimeRange> {
        let start = self.start.max(bounds.start);
        let end = self.end.min(bounds.end);
        (start <= end).then_some(TimeRange { start, end })
    }

    /// Widens the range by `before` at the start and `after` at the end.
    pub fn widen(&self, before: Duration, after: Duration) -> TimeRange {
        TimeRange {
            start: self.start - before,
            end: self.end + after,
        }
    }
}

/// Builds the concrete window of a time-of-day slot on `date`.
///
/// When `end <= start` the end belongs to the next calendar day. This rule
/// applies uniformly to shifts and overtime windows.
///
/// # Example
///
/// ```
/// use hotel_engine::calculation::window_on;
/// use chrono::{NaiveDate, NaiveTime};
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// let night = window_on(
///     date,
///     NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
///     NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
/// );
/// assert_eq!(night.end.date(), NaiveDate::from_ymd_opt(2025, 1, 11).unwrap());
/// assert_eq!(night.minutes(), 8 * 60);
/// ```
pub fn window_on(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> TimeRange {
    let start_at = date.and_time(start);
    let end_date = if end <= start {
        date + Duration::days(1)
    } else {
        date
    };
    TimeRange::new(start_at, end_date.and_time(end))
}

/// Converts minutes to hours as a [`Decimal`], unrounded.
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    Decimal::from(minutes) / Decimal::from(60)
}

/// Number of billable nights between two dates, minimum 1.
pub fn nightly_units(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days().max(1)
}

/// Number of billable hours between two instants: `ceil(minutes / 60)`, minimum 1.
pub fn hourly_units(check_in: NaiveDateTime, check_out: NaiveDateTime) -> i64 {
    let minutes = (check_out - check_in).num_minutes();
    let hours = if minutes <= 0 {
        0
    } else {
        (minutes + 59) / 60
    };
    hours.max(1)
}

/// The stay a booking covers, in the granularity it is billed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stay {
    /// Calendar date of arrival.
    pub check_in_date: NaiveDate,
    /// Calendar date of departure.
    pub check_out_date: NaiveDate,
    /// Precise arrival, required for hourly stays.
    pub check_in_at: Option<NaiveDateTime>,
    /// Precise departure, required for hourly stays.
    pub check_out_at: Option<NaiveDateTime>,
    /// Billed per hour instead of per night.
    pub is_hourly: bool,
}

impl Stay {
    /// Checks the stay's internal consistency.
    ///
    /// Nightly stays need `check_out_date >= check_in_date`; hourly stays need
    /// both precise instants, each on its matching date, with the departure
    /// after the arrival.
    pub fn validate(&self) -> HotelResult<()> {
        if self.check_out_date < self.check_in_date {
            return Err(HotelError::invalid(
                "check_out_date",
                "check_out_date must not be before check_in_date",
            ));
        }
        if self.is_hourly {
            let (Some(start), Some(end)) = (self.check_in_at, self.check_out_at) else {
                return Err(HotelError::invalid(
                    "check_in_at",
                    "hourly bookings require check_in_at and check_out_at",
                ));
            };
            if start.date() != self.check_in_date {
                return Err(HotelError::invalid(
                    "check_in_at",
                    "check_in_at must fall on check_in_date",
                ));
            }
            if end.date() != self.check_out_date {
                return Err(HotelError::invalid(
                    "check_out_at",
                    "check_out_at must fall on check_out_date",
                ));
            }
            if end <= start {
                return Err(HotelError::invalid(
                    "check_out_at",
                    "check_out_at must be after check_in_at",
                ));
            }
        }
        Ok(())
    }

    /// Rejects a stay that starts before `now`.
    ///
    /// Nightly stays may still start today; hourly stays must not start
    /// before the current instant.
    pub fn ensure_not_past(&self, now: NaiveDateTime) -> HotelResult<()> {
        if self.check_in_date < now.date() {
            return Err(HotelError::invalid(
                "check_in_date",
                "check_in_date must not be in the past",
            ));
        }
        if self.is_hourly && self.check_in_at.is_some_and(|start| start < now) {
            return Err(HotelError::invalid(
                "check_in_at",
                "check_in_at must not be in the past",
            ));
        }
        Ok(())
    }

    /// The interval the stay occupies a room for.
    ///
    /// Nightly stays run from midnight of the arrival date to midnight of the
    /// departure date; hourly stays use the precise instants.
    pub fn interval(&self) -> TimeRange {
        match (self.is_hourly, self.check_in_at, self.check_out_at) {
            (true, Some(start), Some(end)) => TimeRange::new(start, end),
            _ => TimeRange::new(
                self.check_in_date.and_time(NaiveTime::MIN),
                self.check_out_date.and_time(NaiveTime::MIN),
            ),
        }
    }

    /// Billable units: nights for nightly stays, hours for hourly stays.
    pub fn billable_units(&self) -> i64 {
        match (self.is_hourly, self.check_in_at, self.check_out_at) {
            (true, Some(start), Some(end)) => hourly_units(start, end),
            _ => nightly_units(self.check_in_date, self.check_out_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn range(a: &str, b: &str) -> TimeRange {
        TimeRange::new(
            make_datetime("2025-01-10", a),
            make_datetime("2025-01-10", b),
        )
    }

    #[test]
    fn test_nightly_two_nights() {
        assert_eq!(nightly_units(make_date("2025-01-10"), make_date("2025-01-12")), 2);
    }

    #[test]
    fn test_nightly_same_day_bills_one_night() {
        assert_eq!(nightly_units(make_date("2025-01-10"), make_date("2025-01-10")), 1);
    }

    #[test]
    fn test_hourly_rounds_up_partial_hours() {
        let start = make_datetime("2025-01-10", "10:00:00");
        assert_eq!(hourly_units(start, make_datetime("2025-01-10", "12:01:00")), 3);
        assert_eq!(hourly_units(start, make_datetime("2025-01-10", "12:00:00")), 2);
        assert_eq!(hourly_units(start, make_datetime("2025-01-10", "10:10:00")), 1);
    }

    #[test]
    fn test_hourly_minimum_one_hour() {
        let start = make_datetime("2025-01-10", "10:00:00");
        assert_eq!(hourly_units(start, start), 1);
    }

    #[test]
    fn test_window_same_day() {
        let window = window_on(make_date("2025-01-10"), time(8, 0), time(16, 0));
        assert_eq!(window.start, make_datetime("2025-01-10", "08:00:00"));
        assert_eq!(window.end, make_datetime("2025-01-10", "16:00:00"));
    }

    #[test]
    fn test_window_wraps_overnight() {
        let window = window_on(make_date("2025-01-10"), time(22, 0), time(6, 0));
        assert_eq!(window.end, make_datetime("2025-01-11", "06:00:00"));
        assert_eq!(window.minutes(), 480);
    }

    #[test]
    fn test_window_equal_times_is_full_day() {
        let window = window_on(make_date("2025-01-10"), time(7, 0), time(7, 0));
        assert_eq!(window.minutes(), 24 * 60);
    }

    #[test]
    fn test_overlap_start_inside() {
        assert!(range("10:00:00", "14:00:00").overlaps(&range("08:00:00", "12:00:00")));
    }

    #[test]
    fn test_overlap_end_inside() {
        assert!(range("06:00:00", "09:00:00").overlaps(&range("08:00:00", "12:00:00")));
    }

    #[test]
    fn test_overlap_containing() {
        assert!(range("06:00:00", "20:00:00").overlaps(&range("08:00:00", "12:00:00")));
    }

    #[test]
    fn test_overlap_contained() {
        assert!(range("09:00:00", "10:00:00").overlaps(&range("08:00:00", "12:00:00")));
    }

    #[test]
    fn test_touching_ranges_overlap() {
        assert!(range("12:00:00", "14:00:00").overlaps(&range("08:00:00", "12:00:00")));
        assert!(range("06:00:00", "08:00:00").overlaps(&range("08:00:00", "12:00:00")));
    }

    #[test]
    fn test_strict_overlap_ignores_shared_endpoint() {
        let morning = range("06:00:00", "14:00:00");
        assert!(!range("14:00:00", "22:00:00").overlaps_strictly(&morning));
        assert!(!morning.overlaps_strictly(&range("14:00:00", "22:00:00")));
        assert!(range("13:59:00", "22:00:00").overlaps_strictly(&morning));
        assert!(range("08:00:00", "09:00:00").overlaps_strictly(&morning));
    }

    #[test]
    fn test_disjoint_ranges_do_not_overlap() {
        assert!(!range("12:01:00", "14:00:00").overlaps(&range("08:00:00", "12:00:00")));
        assert!(!range("06:00:00", "07:59:00").overlaps(&range("08:00:00", "12:00:00")));
    }

    #[test]
    fn test_clamp_to_bounds() {
        let worked = range("07:30:00", "16:45:00");
        let shift = range("08:00:00", "16:00:00");
        assert_eq!(worked.clamp_to(&shift), Some(shift));
        assert_eq!(range("17:00:00", "18:00:00").clamp_to(&shift), None);
    }

    #[test]
    fn test_minutes_to_hours() {
        assert_eq!(minutes_to_hours(90), Decimal::new(15, 1));
    }

    #[test]
    fn test_stay_interval_nightly_uses_midnights() {
        let stay = Stay {
            check_in_date: make_date("2025-01-10"),
            check_out_date: make_date("2025-01-12"),
            check_in_at: None,
            check_out_at: None,
            is_hourly: false,
        };
        let interval = stay.interval();
        assert_eq!(interval.start, make_datetime("2025-01-10", "00:00:00"));
        assert_eq!(interval.end, make_datetime("2025-01-12", "00:00:00"));
        assert_eq!(stay.billable_units(), 2);
    }

    #[test]
    fn test_stay_hourly_requires_instants() {
        let stay = Stay {
            check_in_date: make_date("2025-01-10"),
            check_out_date: make_date("2025-01-10"),
            check_in_at: None,
            check_out_at: None,
            is_hourly: true,
        };
        assert!(matches!(stay.validate(), Err(HotelError::Validation { .. })));
    }

    #[test]
    fn test_stay_rejects_departure_before_arrival() {
        let stay = Stay {
            check_in_date: make_date("2025-01-12"),
            check_out_date: make_date("2025-01-10"),
            check_in_at: None,
            check_out_at: None,
            is_hourly: false,
        };
        assert!(stay.validate().is_err());
    }

    #[test]
    fn test_stay_hourly_units() {
        let stay = Stay {
            check_in_date: make_date("2025-01-10"),
            check_out_date: make_date("2025-01-10"),
            check_in_at: Some(make_datetime("2025-01-10", "13:00:00")),
            check_out_at: Some(make_datetime("2025-01-10", "15:30:00")),
            is_hourly: true,
        };
        assert!(stay.validate().is_ok());
        assert_eq!(stay.billable_units(), 3);
    }

    fn hourly(date: &str, from: &str, to: &str) -> Stay {
        Stay {
            check_in_date: make_date(date),
            check_out_date: make_date(date),
            check_in_at: Some(make_datetime(date, from)),
            check_out_at: Some(make_datetime(date, to)),
            is_hourly: true,
        }
    }

    #[test]
    fn test_stay_hourly_instants_must_match_dates() {
        let mut stay = hourly("2025-01-10", "13:00:00", "15:00:00");
        stay.check_in_at = Some(make_datetime("2025-01-08", "13:00:00"));
        assert!(matches!(
            stay.validate(),
            Err(HotelError::Validation { ref errors }) if errors[0].field == "check_in_at"
        ));

        let mut stay = hourly("2025-01-10", "22:00:00", "23:00:00");
        stay.check_out_at = Some(make_datetime("2025-01-11", "01:00:00"));
        assert!(matches!(
            stay.validate(),
            Err(HotelError::Validation { ref errors }) if errors[0].field == "check_out_at"
        ));
        stay.check_out_date = make_date("2025-01-11");
        assert!(stay.validate().is_ok());
    }

    #[test]
    fn test_stay_not_past() {
        let now = make_datetime("2025-01-10", "12:00:00");
        assert!(hourly("2025-01-10", "13:00:00", "15:00:00").ensure_not_past(now).is_ok());
        assert!(hourly("2025-01-10", "11:00:00", "15:00:00").ensure_not_past(now).is_err());
        assert!(hourly("2025-01-09", "13:00:00", "15:00:00").ensure_not_past(now).is_err());

        let tonight = Stay {
            check_in_date: make_date("2025-01-10"),
            check_out_date: make_date("2025-01-11"),
            check_in_at: None,
            check_out_at: None,
            is_hourly: false,
        };
        assert!(tonight.ensure_not_past(now).is_ok());
    }
}
