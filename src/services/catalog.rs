//! Room types, amenities, extra services and customers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::context::RequestContext;
use crate::error::{HotelError, HotelResult};
use crate::models::{Amenity, AmenityQuantity, Customer, RoomType, ServiceItem};
use crate::store::Store;

use super::validation::{check, non_negative_decimal, not_blank};

/// Input for creating or replacing a room type.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoomTypeInput {
    /// Display name.
    #[validate(length(min = 1, max = 100), custom = "not_blank")]
    pub name: String,
    /// Rate per night.
    #[validate(custom = "non_negative_decimal")]
    pub nightly_rate: Decimal,
    /// Rate per hour.
    #[validate(custom = "non_negative_decimal")]
    pub hourly_rate: Decimal,
    /// Guest cap.
    #[validate(range(min = 1, max = 20))]
    pub max_occupancy: u32,
    /// Amenities by name with their per-type quantity.
    #[serde(default)]
    pub amenities: Vec<AmenityInput>,
}

/// An amenity requested for a room type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmenityInput {
    /// Amenity name; created on first use.
    pub name: String,
    /// How many of it the type has.
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

/// Input for creating an extra service.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServiceItemInput {
    /// Display name.
    #[validate(length(min = 1, max = 100), custom = "not_blank")]
    pub name: String,
    /// Unit price.
    #[validate(custom = "non_negative_decimal")]
    pub price: Decimal,
    /// Whether the service can be ordered.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Input for registering a customer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerInput {
    /// Full name.
    #[validate(length(min = 1, max = 150), custom = "not_blank")]
    pub full_name: String,
    /// Contact phone.
    #[validate(length(min = 6, max = 20))]
    pub phone: String,
    /// Contact email.
    #[validate(email)]
    pub email: Option<String>,
    /// Identity card or passport number.
    #[validate(length(max = 30))]
    pub id_number: Option<String>,
}

/// Lists room types ordered by name.
pub async fn list_room_types(store: &Store) -> Vec<RoomType> {
    store
        .read(|db| {
            let mut types: Vec<RoomType> = db.room_types.values().cloned().collect();
            types.sort_by(|a, b| a.name.cmp(&b.name));
            types
        })
        .await
}

/// Fetches one room type.
pub async fn get_room_type(store: &Store, id: Uuid) -> HotelResult<RoomType> {
    store.read(|db| db.room_type(id).cloned()).await
}

/// Creates a room type, creating any amenities it names.
pub async fn create_room_type(
    store: &Store,
    ctx: &RequestContext,
    input: RoomTypeInput,
) -> HotelResult<RoomType> {
    check(&input)?;
    let room_type = store
        .transaction(|db| {
            if db
                .room_types
                .values()
                .any(|t| t.name.eq_ignore_ascii_case(input.name.trim()))
            {
                return Err(HotelError::invalid("name", "a room type with this name already exists"));
            }
            let amenities = resolve_amenities(&mut db.amenities, &input.amenities);
            let room_type = RoomType {
                id: Uuid::new_v4(),
                name: input.name.trim().to_string(),
                nightly_rate: input.nightly_rate,
                hourly_rate: input.hourly_rate,
                max_occupancy: input.max_occupancy,
                amenities,
            };
            db.room_types.insert(room_type.id, room_type.clone());
            Ok(room_type)
        })
        .await?;

    info!(room_type_id = %room_type.id, actor = ?ctx.actor_id, name = %room_type.name, "Room type created");
    Ok(room_type)
}

/// Replaces a room type's fields.
///
/// Existing bookings keep the rates captured when they were made.
pub async fn update_room_type(
    store: &Store,
    ctx: &RequestContext,
    id: Uuid,
    input: RoomTypeInput,
) -> HotelResult<RoomType> {
    check(&input)?;
    let room_type = store
        .transaction(|db| {
            let amenities = resolve_amenities(&mut db.amenities, &input.amenities);
            let room_type = db.room_type_mut(id)?;
            room_type.name = input.name.trim().to_string();
            room_type.nightly_rate = input.nightly_rate;
            room_type.hourly_rate = input.hourly_rate;
            room_type.max_occupancy = input.max_occupancy;
            room_type.amenities = amenities;
            Ok(room_type.clone())
        })
        .await?;

    info!(room_type_id = %id, actor = ?ctx.actor_id, "Room type updated");
    Ok(room_type)
}

fn resolve_amenities(
    catalog: &mut std::collections::HashMap<Uuid, Amenity>,
    requested: &[AmenityInput],
) -> Vec<AmenityQuantity> {
    requested
        .iter()
        .filter(|a| !a.name.trim().is_empty())
        .map(|a| {
            let name = a.name.trim();
            let amenity_id = match catalog.values().find(|x| x.name.eq_ignore_ascii_case(name)) {
                Some(existing) => existing.id,
                None => {
                    let amenity = Amenity {
                        id: Uuid::new_v4(),
                        name: name.to_string(),
                    };
                    let id = amenity.id;
                    catalog.insert(id, amenity);
                    id
                }
            };
            AmenityQuantity {
                amenity_id,
                quantity: a.quantity.max(1),
            }
        })
        .collect()
}

/// Lists the amenity catalog ordered by name.
pub async fn list_amenities(store: &Store) -> Vec<Amenity> {
    store
        .read(|db| {
            let mut amenities: Vec<Amenity> = db.amenities.values().cloned().collect();
            amenities.sort_by(|a, b| a.name.cmp(&b.name));
            amenities
        })
        .await
}

/// Lists extra services ordered by name.
pub async fn list_services(store: &Store) -> Vec<ServiceItem> {
    store
        .read(|db| {
            let mut services: Vec<ServiceItem> = db.services.values().cloned().collect();
            services.sort_by(|a, b| a.name.cmp(&b.name));
            services
        })
        .await
}

/// Creates an extra service.
pub async fn create_service(
    store: &Store,
    ctx: &RequestContext,
    input: ServiceItemInput,
) -> HotelResult<ServiceItem> {
    check(&input)?;
    let service = ServiceItem {
        id: Uuid::new_v4(),
        name: input.name.trim().to_string(),
        price: input.price,
        is_active: input.is_active,
    };
    let saved = service.clone();
    store
        .transaction(move |db| {
            db.services.insert(service.id, service);
            Ok(())
        })
        .await?;

    info!(service_id = %saved.id, actor = ?ctx.actor_id, "Service created");
    Ok(saved)
}

/// Lists customers, newest first. `search` matches name or phone.
pub async fn list_customers(store: &Store, search: Option<&str>) -> Vec<Customer> {
    let needle = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
    store
        .read(|db| {
            let mut customers: Vec<Customer> = db
                .customers
                .values()
                .filter(|c| match &needle {
                    Some(n) => c.full_name.to_lowercase().contains(n) || c.phone.contains(n),
                    None => true,
                })
                .cloned()
                .collect();
            customers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            customers
        })
        .await
}

/// Fetches one customer.
pub async fn get_customer(store: &Store, id: Uuid) -> HotelResult<Customer> {
    store.read(|db| db.customer(id).cloned()).await
}

/// Registers a customer. Phone numbers are unique.
pub async fn create_customer(
    store: &Store,
    ctx: &RequestContext,
    input: CustomerInput,
) -> HotelResult<Customer> {
    check(&input)?;
    let now = ctx.now;
    let customer = store
        .transaction(|db| {
            let phone = input.phone.trim();
            if db.customers.values().any(|c| c.phone == phone) {
                return Err(HotelError::invalid("phone", "a customer with this phone already exists"));
            }
            let customer = Customer {
                id: Uuid::new_v4(),
                full_name: input.full_name.trim().to_string(),
                phone: phone.to_string(),
                email: input.email.clone(),
                id_number: input.id_number.clone(),
                created_at: now,
            };
            db.customers.insert(customer.id, customer.clone());
            Ok(customer)
        })
        .await?;

    info!(customer_id = %customer.id, actor = ?ctx.actor_id, "Customer registered");
    Ok(customer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ctx() -> RequestContext {
        RequestContext::at(
            NaiveDate::from_ymd_opt(2025, 1, 10)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        )
    }

    fn deluxe() -> RoomTypeInput {
        RoomTypeInput {
            name: "Deluxe".to_string(),
            nightly_rate: Decimal::from(500_000),
            hourly_rate: Decimal::from(120_000),
            max_occupancy: 2,
            amenities: vec![
                AmenityInput {
                    name: "Minibar".to_string(),
                    quantity: 1,
                },
                AmenityInput {
                    name: "Towel".to_string(),
                    quantity: 4,
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_room_type_amenities_are_shared() {
        let store = Store::new();
        create_room_type(&store, &ctx(), deluxe()).await.unwrap();
        let mut suite = deluxe();
        suite.name = "Suite".to_string();
        create_room_type(&store, &ctx(), suite).await.unwrap();

        assert_eq!(list_amenities(&store).await.len(), 2);
        assert_eq!(list_room_types(&store).await.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_room_type_name_rejected() {
        let store = Store::new();
        create_room_type(&store, &ctx(), deluxe()).await.unwrap();
        let err = create_room_type(&store, &ctx(), deluxe()).await.unwrap_err();
        assert!(matches!(err, HotelError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_negative_rate_rejected() {
        let store = Store::new();
        let mut input = deluxe();
        input.nightly_rate = Decimal::from(-1);
        let err = create_room_type(&store, &ctx(), input).await.unwrap_err();
        match err {
            HotelError::Validation { errors } => assert_eq!(errors[0].field, "nightly_rate"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_customer_email_checked() {
        let store = Store::new();
        let input = CustomerInput {
            full_name: "Nguyen Van A".to_string(),
            phone: "0901234567".to_string(),
            email: Some("not-an-email".to_string()),
            id_number: None,
        };
        assert!(create_customer(&store, &ctx(), input).await.is_err());
    }

    #[tokio::test]
    async fn test_customer_search() {
        let store = Store::new();
        create_customer(
            &store,
            &ctx(),
            CustomerInput {
                full_name: "Nguyen Van A".to_string(),
                phone: "0901234567".to_string(),
                email: None,
                id_number: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(list_customers(&store, Some("nguyen")).await.len(), 1);
        assert_eq!(list_customers(&store, Some("0901")).await.len(), 1);
        assert!(list_customers(&store, Some("tran")).await.is_empty());
    }
}
