//! Room inventory: creation, soft deletion, status and availability.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::calculation::{Stay, is_available};
use crate::context::RequestContext;
use crate::error::{HotelError, HotelResult};
use crate::models::{Room, RoomStatus};
use crate::store::Store;

use super::validation::{check, not_blank};

/// Input for creating or updating a room.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoomInput {
    /// Door number, unique among live rooms.
    #[validate(length(min = 1, max = 10), custom = "not_blank")]
    pub number: String,
    /// Room type reference.
    pub room_type_id: Uuid,
}

/// Filters for listing rooms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomFilter {
    /// Only rooms in this status.
    pub status: Option<RoomStatus>,
    /// Only rooms of this type.
    pub room_type_id: Option<Uuid>,
    /// Include soft-deleted rooms.
    #[serde(default)]
    pub include_deleted: bool,
}

/// The stay to check a room against.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    /// Arrival date.
    pub check_in_date: NaiveDate,
    /// Departure date.
    pub check_out_date: NaiveDate,
    /// Precise arrival for hourly stays.
    pub check_in_at: Option<NaiveDateTime>,
    /// Precise departure for hourly stays.
    pub check_out_at: Option<NaiveDateTime>,
    /// Billed per hour.
    #[serde(default)]
    pub is_hourly: bool,
}

impl AvailabilityQuery {
    fn stay(&self) -> Stay {
        Stay {
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
            check_in_at: self.check_in_at,
            check_out_at: self.check_out_at,
            is_hourly: self.is_hourly,
        }
    }
}

/// Result of an availability check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomAvailability {
    /// The room checked.
    pub room_id: Uuid,
    /// Whether the room is free for the stay.
    pub available: bool,
}

/// Lists rooms ordered by number.
pub async fn list_rooms(store: &Store, filter: &RoomFilter) -> Vec<Room> {
    store
        .read(|db| {
            let mut rooms: Vec<Room> = db
                .rooms
                .values()
                .filter(|r| filter.include_deleted || !r.is_deleted())
                .filter(|r| filter.status.is_none_or(|s| r.status == s))
                .filter(|r| filter.room_type_id.is_none_or(|t| r.room_type_id == t))
                .cloned()
                .collect();
            rooms.sort_by(|a, b| a.number.cmp(&b.number));
            rooms
        })
        .await
}

/// Fetches one live room.
pub async fn get_room(store: &Store, id: Uuid) -> HotelResult<Room> {
    store.read(|db| db.live_room(id).cloned()).await
}

/// Creates a room in status `available`.
pub async fn create_room(store: &Store, ctx: &RequestContext, input: RoomInput) -> HotelResult<Room> {
    check(&input)?;
    let room = store
        .transaction(|db| {
            db.room_type(input.room_type_id)?;
            ensure_unique_number(db, input.number.trim(), None)?;
            let room = Room {
                id: Uuid::new_v4(),
                number: input.number.trim().to_string(),
                room_type_id: input.room_type_id,
                status: RoomStatus::Available,
                deleted_at: None,
            };
            db.rooms.insert(room.id, room.clone());
            Ok(room)
        })
        .await?;

    info!(room_id = %room.id, number = %room.number, actor = ?ctx.actor_id, "Room created");
    Ok(room)
}

/// Changes a room's number or type.
pub async fn update_room(
    store: &Store,
    ctx: &RequestContext,
    id: Uuid,
    input: RoomInput,
) -> HotelResult<Room> {
    check(&input)?;
    let room = store
        .transaction(|db| {
            db.room_type(input.room_type_id)?;
            db.live_room(id)?;
            ensure_unique_number(db, input.number.trim(), Some(id))?;
            let room = db.room_mut(id)?;
            room.number = input.number.trim().to_string();
            room.room_type_id = input.room_type_id;
            Ok(room.clone())
        })
        .await?;

    info!(room_id = %id, actor = ?ctx.actor_id, "Room updated");
    Ok(room)
}

fn ensure_unique_number(db: &crate::store::Database, number: &str, except: Option<Uuid>) -> HotelResult<()> {
    let taken = db
        .rooms
        .values()
        .any(|r| !r.is_deleted() && Some(r.id) != except && r.number.eq_ignore_ascii_case(number));
    if taken {
        return Err(HotelError::invalid("number", "a room with this number already exists"));
    }
    Ok(())
}

/// Soft-deletes a room.
///
/// Rooms held by an active booking cannot be deleted.
pub async fn delete_room(store: &Store, ctx: &RequestContext, id: Uuid) -> HotelResult<()> {
    let now = ctx.now;
    store
        .transaction(|db| {
            db.live_room(id)?;
            if let Some(holder) = db
                .bookings
                .values()
                .find(|b| b.status.is_active() && b.holds_room(id))
            {
                return Err(HotelError::rule_with(
                    "Room is held by an active booking",
                    serde_json::json!({ "room_id": id, "booking_id": holder.id }),
                ));
            }
            db.room_mut(id)?.deleted_at = Some(now);
            Ok(())
        })
        .await?;

    warn!(room_id = %id, actor = ?ctx.actor_id, "Room soft-deleted");
    Ok(())
}

/// Clears a room's tombstone.
pub async fn restore_room(store: &Store, ctx: &RequestContext, id: Uuid) -> HotelResult<Room> {
    let room = store
        .transaction(|db| {
            let number = {
                let room = db.room(id)?;
                if !room.is_deleted() {
                    return Err(HotelError::StateConflict {
                        entity: "room",
                        action: "restore",
                        state: "live".to_string(),
                    });
                }
                room.number.clone()
            };
            ensure_unique_number(db, &number, Some(id))?;
            let room = db.room_mut(id)?;
            room.deleted_at = None;
            Ok(room.clone())
        })
        .await?;

    info!(room_id = %id, actor = ?ctx.actor_id, "Room restored");
    Ok(room)
}

/// Sets a room's housekeeping status.
///
/// `booked` is owned by the booking lifecycle and cannot be set or cleared
/// by hand while an active booking holds the room.
pub async fn set_room_status(
    store: &Store,
    ctx: &RequestContext,
    id: Uuid,
    status: RoomStatus,
) -> HotelResult<Room> {
    let room = store
        .transaction(|db| {
            let current = db.live_room(id)?.status;
            let checked_in = db
                .bookings
                .values()
                .any(|b| b.status == crate::models::BookingStatus::CheckedIn && b.holds_room(id));
            if status == RoomStatus::Booked || (current == RoomStatus::Booked && checked_in) {
                return Err(HotelError::StateConflict {
                    entity: "room",
                    action: "change status of",
                    state: current.to_string(),
                });
            }
            let room = db.room_mut(id)?;
            room.status = status;
            Ok(room.clone())
        })
        .await?;

    info!(room_id = %id, status = %status, actor = ?ctx.actor_id, "Room status changed");
    Ok(room)
}

/// Checks whether a room is free for a stay.
pub async fn check_availability(
    store: &Store,
    id: Uuid,
    query: &AvailabilityQuery,
) -> HotelResult<RoomAvailability> {
    let stay = query.stay();
    stay.validate()?;
    let candidate = stay.interval();
    store
        .read(|db| {
            let room = db.live_room(id)?;
            let free = room.status != RoomStatus::Maintenance
                && is_available(id, &candidate, db.bookings.values(), None);
            Ok(RoomAvailability {
                room_id: id,
                available: free,
            })
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoomType;
    use rust_decimal::Decimal;

    fn ctx() -> RequestContext {
        RequestContext::at(
            NaiveDate::from_ymd_opt(2025, 1, 10)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        )
    }

    async fn seed_type(store: &Store) -> Uuid {
        let room_type = RoomType {
            id: Uuid::new_v4(),
            name: "Standard".to_string(),
            nightly_rate: Decimal::from(400_000),
            hourly_rate: Decimal::from(100_000),
            max_occupancy: 2,
            amenities: vec![],
        };
        let id = room_type.id;
        store
            .transaction(|db| {
                db.room_types.insert(id, room_type);
                Ok(())
            })
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn test_delete_and_restore() {
        let store = Store::new();
        let type_id = seed_type(&store).await;
        let room = create_room(
            &store,
            &ctx(),
            RoomInput {
                number: "201".to_string(),
                room_type_id: type_id,
            },
        )
        .await
        .unwrap();

        delete_room(&store, &ctx(), room.id).await.unwrap();
        assert!(list_rooms(&store, &RoomFilter::default()).await.is_empty());
        assert!(matches!(
            get_room(&store, room.id).await,
            Err(HotelError::NotFound { .. })
        ));

        let restored = restore_room(&store, &ctx(), room.id).await.unwrap();
        assert!(restored.deleted_at.is_none());
        assert_eq!(list_rooms(&store, &RoomFilter::default()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_restore_live_room_conflicts() {
        let store = Store::new();
        let type_id = seed_type(&store).await;
        let room = create_room(
            &store,
            &ctx(),
            RoomInput {
                number: "202".to_string(),
                room_type_id: type_id,
            },
        )
        .await
        .unwrap();
        assert!(matches!(
            restore_room(&store, &ctx(), room.id).await,
            Err(HotelError::StateConflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_number_rejected() {
        let store = Store::new();
        let type_id = seed_type(&store).await;
        let input = RoomInput {
            number: "301".to_string(),
            room_type_id: type_id,
        };
        create_room(&store, &ctx(), input.clone()).await.unwrap();
        assert!(create_room(&store, &ctx(), input).await.is_err());
    }

    #[tokio::test]
    async fn test_booked_cannot_be_set_by_hand() {
        let store = Store::new();
        let type_id = seed_type(&store).await;
        let room = create_room(
            &store,
            &ctx(),
            RoomInput {
                number: "401".to_string(),
                room_type_id: type_id,
            },
        )
        .await
        .unwrap();
        assert!(set_room_status(&store, &ctx(), room.id, RoomStatus::Booked).await.is_err());
        let cleaned = set_room_status(&store, &ctx(), room.id, RoomStatus::Cleaning)
            .await
            .unwrap();
        assert_eq!(cleaned.status, RoomStatus::Cleaning);
    }
}
