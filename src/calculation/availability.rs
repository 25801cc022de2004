//! Room availability checking.
//!
//! A room is unavailable for a candidate interval when an active booking
//! (Pending, Confirmed or Checked-in) holds it over an overlapping interval.
//! Overlap is inclusive, see [`TimeRange::overlaps`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Booking;

use super::time_range::TimeRange;

/// A room that cannot be booked because another booking holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConflict {
    /// The contested room.
    pub room_id: Uuid,
    /// The booking that holds it.
    pub booking_id: Uuid,
}

/// Whether `room_id` is free over `candidate`.
///
/// `exclude` skips one booking, so a booking being edited does not conflict
/// with itself.
///
/// # Example
///
/// ```
/// use hotel_engine::calculation::{is_available, TimeRange};
/// use hotel_engine::models::Booking;
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// let day = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// let candidate = TimeRange::new(day.and_hms_opt(0, 0, 0).unwrap(), day.and_hms_opt(23, 0, 0).unwrap());
/// let no_bookings: Vec<Booking> = vec![];
/// assert!(is_available(Uuid::new_v4(), &candidate, &no_bookings, None));
/// ```
pub fn is_available<'a, I>(
    room_id: Uuid,
    candidate: &TimeRange,
    bookings: I,
    exclude: Option<Uuid>,
) -> bool
where
    I: IntoIterator<Item = &'a Booking>,
{
    !bookings
        .into_iter()
        .any(|booking| blocks(booking, room_id, candidate, exclude))
}

/// Every conflict for `room_ids` over `candidate`, in request order.
///
/// An empty result means the whole batch can be booked.
pub fn find_conflicts<'a, I>(
    room_ids: &[Uuid],
    candidate: &TimeRange,
    bookings: I,
    exclude: Option<Uuid>,
) -> Vec<RoomConflict>
where
    I: IntoIterator<Item = &'a Booking> + Clone,
{
    let mut conflicts = Vec::new();
    for &room_id in room_ids {
        if let Some(holder) = bookings
            .clone()
            .into_iter()
            .find(|booking| blocks(booking, room_id, candidate, exclude))
        {
            conflicts.push(RoomConflict {
                room_id,
                booking_id: holder.id,
            });
        }
    }
    conflicts
}

fn blocks(booking: &Booking, room_id: Uuid, candidate: &TimeRange, exclude: Option<Uuid>) -> bool {
    exclude != Some(booking.id)
        && booking.status.is_active()
        && booking.holds_room(room_id)
        && candidate.overlaps(&booking.interval())
}
