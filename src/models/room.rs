//! Room, room type and amenity models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Housekeeping/occupancy status of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// Ready to be occupied.
    Available,
    /// Occupied by a checked-in reservation.
    Booked,
    /// Being cleaned.
    Cleaning,
    /// Out of order.
    Maintenance,
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomStatus::Available => write!(f, "available"),
            RoomStatus::Booked => write!(f, "booked"),
            RoomStatus::Cleaning => write!(f, "cleaning"),
            RoomStatus::Maintenance => write!(f, "maintenance"),
        }
    }
}

/// An amenity that room types can include (towels, minibar, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
}

/// An amenity together with the quantity a room type provides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmenityQuantity {
    /// Amenity reference.
    pub amenity_id: Uuid,
    /// Units provided per room.
    pub quantity: u32,
}

/// A category of rooms sharing rates and occupancy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name (e.g., "Deluxe Double").
    pub name: String,
    /// Price per night.
    pub nightly_rate: Decimal,
    /// Price per hour.
    pub hourly_rate: Decimal,
    /// Maximum guests.
    pub max_occupancy: u32,
    /// Amenities provided.
    #[serde(default)]
    pub amenities: Vec<AmenityQuantity>,
}

impl RoomType {
    /// The rate that applies for the given billing granularity.
    ///
    /// # Example
    ///
    /// ```
    /// use hotel_engine::models::RoomType;
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let room_type = RoomType {
    ///     id: Uuid::new_v4(),
    ///     name: "Standard".to_string(),
    ///     nightly_rate: Decimal::from(500_000),
    ///     hourly_rate: Decimal::from(80_000),
    ///     max_occupancy: 2,
    ///     amenities: vec![],
    /// };
    /// assert_eq!(room_type.rate_for(true), Decimal::from(80_000));
    /// assert_eq!(room_type.rate_for(false), Decimal::from(500_000));
    /// ```
    pub fn rate_for(&self, is_hourly: bool) -> Decimal {
        if is_hourly {
            self.hourly_rate
        } else {
            self.nightly_rate
        }
    }
}

/// A physical room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Unique identifier.
    pub id: Uuid,
    /// Door number (e.g., "101").
    pub number: String,
    /// Room type reference.
    pub room_type_id: Uuid,
    /// Current status.
    pub status: RoomStatus,
    /// Soft-deletion tombstone; set rooms are hidden and cannot be booked.
    pub deleted_at: Option<NaiveDateTime>,
}

impl Room {
    /// Whether the room has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_status_serializes_snake_case() {
        let json = serde_json::to_string(&RoomStatus::Maintenance).unwrap();
        assert_eq!(json, "\"maintenance\"");
        let status: RoomStatus = serde_json::from_str("\"booked\"").unwrap();
        assert_eq!(status, RoomStatus::Booked);
    }

    #[test]
    fn test_room_tombstone() {
        let mut room = Room {
            id: Uuid::new_v4(),
            number: "101".to_string(),
            room_type_id: Uuid::new_v4(),
            status: RoomStatus::Available,
            deleted_at: None,
        };
        assert!(!room.is_deleted());
        room.deleted_at = NaiveDateTime::parse_from_str("2025-01-01 00:00:00", "%Y-%m-%d %H:%M:%S").ok();
        assert!(room.is_deleted());
    }
}
