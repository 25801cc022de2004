//! In-memory transactional store.
//!
//! All contended state lives in one [`Database`] behind a `tokio` read/write
//! lock. [`Store::transaction`] holds the write lock for the whole closure,
//! works on a copy and commits only when the closure returns `Ok`, so a failed
//! step never leaves partial writes behind.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{HotelError, HotelResult};
use crate::models::{
    Amenity, Attendance, Booking, Customer, Employee, Invoice, OvertimeRequest, Payment,
    Promotion, Room, RoomType, ServiceItem, Shift, ShiftAssignment,
};

/// Every persisted record, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Database {
    /// Amenity catalog.
    pub amenities: HashMap<Uuid, Amenity>,
    /// Room types and their rates.
    pub room_types: HashMap<Uuid, RoomType>,
    /// Rooms, including soft-deleted ones.
    pub rooms: HashMap<Uuid, Room>,
    /// Extra services sold to guests.
    pub services: HashMap<Uuid, ServiceItem>,
    /// Guests.
    pub customers: HashMap<Uuid, Customer>,
    /// Bookings.
    pub bookings: HashMap<Uuid, Booking>,
    /// Promotion codes.
    pub promotions: HashMap<Uuid, Promotion>,
    /// Append-only payment log.
    pub payments: Vec<Payment>,
    /// Append-only invoice log.
    pub invoices: Vec<Invoice>,
    /// Staff.
    pub employees: HashMap<Uuid, Employee>,
    /// Shift definitions.
    pub shifts: HashMap<Uuid, Shift>,
    /// Main-shift assignments.
    pub shift_assignments: HashMap<Uuid, ShiftAssignment>,
    /// Attendance records.
    pub attendances: HashMap<Uuid, Attendance>,
    /// Overtime requests.
    pub overtime_requests: HashMap<Uuid, OvertimeRequest>,
    invoice_sequence: u64,
}

macro_rules! lookup {
    ($get:ident, $get_mut:ident, $field:ident, $ty:ty, $entity:literal) => {
        #[doc = concat!("Looks up a ", $entity, " by id.")]
        pub fn $get(&self, id: Uuid) -> HotelResult<&$ty> {
            self.$field
                .get(&id)
                .ok_or_else(|| HotelError::not_found($entity, id))
        }

        #[doc = concat!("Looks up a ", $entity, " by id for modification.")]
        pub fn $get_mut(&mut self, id: Uuid) -> HotelResult<&mut $ty> {
            self.$field
                .get_mut(&id)
                .ok_or_else(|| HotelError::not_found($entity, id))
        }
    };
}

impl Database {
    lookup!(room_type, room_type_mut, room_types, RoomType, "room type");
    lookup!(room, room_mut, rooms, Room, "room");
    lookup!(service, service_mut, services, ServiceItem, "service");
    lookup!(customer, customer_mut, customers, Customer, "customer");
    lookup!(booking, booking_mut, bookings, Booking, "booking");
    lookup!(promotion, promotion_mut, promotions, Promotion, "promotion");
    lookup!(employee, employee_mut, employees, Employee, "employee");
    lookup!(shift, shift_mut, shifts, Shift, "shift");
    lookup!(
        shift_assignment,
        shift_assignment_mut,
        shift_assignments,
        ShiftAssignment,
        "shift assignment"
    );
    lookup!(attendance, attendance_mut, attendances, Attendance, "attendance");
    lookup!(
        overtime_request,
        overtime_request_mut,
        overtime_requests,
        OvertimeRequest,
        "overtime request"
    );

    /// A room that exists and is not soft-deleted.
    pub fn live_room(&self, id: Uuid) -> HotelResult<&Room> {
        match self.rooms.get(&id) {
            Some(room) if !room.is_deleted() => Ok(room),
            _ => Err(HotelError::not_found("room", id)),
        }
    }

    /// Case-insensitive promotion lookup by code.
    pub fn promotion_by_code(&self, code: &str) -> Option<&Promotion> {
        self.promotions
            .values()
            .find(|p| p.code.eq_ignore_ascii_case(code.trim()))
    }

    /// Next invoice number, e.g. `INV-000042`.
    pub fn next_invoice_number(&mut self) -> String {
        self.invoice_sequence += 1;
        format!("INV-{:06}", self.invoice_sequence)
    }
}

/// Shared handle to the database.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Database>>,
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against a consistent snapshot under the read lock.
    pub async fn read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&Database) -> T,
    {
        let guard = self.inner.read().await;
        f(&guard)
    }

    /// Runs `f` as one atomic unit of work.
    ///
    /// The write lock is held until the closure finishes; concurrent
    /// transactions queue behind it. Changes are committed only on `Ok`.
    pub async fn transaction<T, F>(&self, f: F) -> HotelResult<T>
    where
        F: FnOnce(&mut Database) -> HotelResult<T>,
    {
        let mut guard = self.inner.write().await;
        let mut draft = guard.clone();
        let value = f(&mut draft)?;
        *guard = draft;
        Ok(value)
    }
}
