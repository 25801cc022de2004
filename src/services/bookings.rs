//! Booking lifecycle.
//!
//! Every transition runs inside one store transaction: state checks, room
//! status changes, payments and invoices either all persist or none do.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::calculation::{
    PromotionTerms, Stay, Totals, amount_due, compute_totals, ensure_redeemable, find_conflicts,
    refresh_status, round_money,
};
use crate::context::RequestContext;
use crate::error::{HotelError, HotelResult};
use crate::models::{
    Booking, BookingRoom, BookingService, BookingStatus, Invoice, Payment, PaymentKind,
    PaymentMethod, PaymentStatus, RoomStatus,
};
use crate::store::{Database, Store};

use super::promotions;
use super::validation::{check, non_negative_decimal};

/// Input for creating a booking.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingInput {
    /// Guest reference.
    pub customer_id: Uuid,
    /// Rooms to reserve.
    #[validate(length(min = 1, max = 20))]
    pub room_ids: Vec<Uuid>,
    /// Arrival date.
    pub check_in_date: NaiveDate,
    /// Departure date.
    pub check_out_date: NaiveDate,
    /// Precise arrival for hourly stays.
    pub check_in_at: Option<NaiveDateTime>,
    /// Precise departure for hourly stays.
    pub check_out_at: Option<NaiveDateTime>,
    /// Bill per hour instead of per night.
    #[serde(default)]
    pub is_hourly: bool,
    /// Deposit required to confirm; zero confirms immediately.
    #[serde(default)]
    #[validate(custom = "non_negative_decimal")]
    pub deposit_amount: Decimal,
    /// Free-form notes.
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    /// Services ordered up front.
    #[serde(default)]
    #[validate]
    pub services: Vec<ServiceLineInput>,
    /// Promotion to redeem at creation.
    pub promotion_code: Option<String>,
}

impl BookingInput {
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

/// Input for changing an upcoming booking. Replaces the stay, rooms, deposit
/// and notes; the guest, services and promotion are kept.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingUpdate {
    /// Rooms to reserve.
    #[validate(length(min = 1, max = 20))]
    pub room_ids: Vec<Uuid>,
    /// Arrival date.
    pub check_in_date: NaiveDate,
    /// Departure date.
    pub check_out_date: NaiveDate,
    /// Precise arrival for hourly stays.
    pub check_in_at: Option<NaiveDateTime>,
    /// Precise departure for hourly stays.
    pub check_out_at: Option<NaiveDateTime>,
    /// Bill per hour instead of per night.
    #[serde(default)]
    pub is_hourly: bool,
    /// Deposit required to confirm.
    #[serde(default)]
    #[validate(custom = "non_negative_decimal")]
    pub deposit_amount: Decimal,
    /// Free-form notes.
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl BookingUpdate {
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

/// A service line to add to a booking.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServiceLineInput {
    /// Service reference.
    pub service_id: Uuid,
    /// Units ordered.
    #[validate(range(min = 1, max = 100))]
    pub quantity: u32,
    /// Room the service is delivered to; must be held by the booking.
    pub room_id: Option<Uuid>,
}

/// Filters for listing bookings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    /// Only bookings in this status.
    pub status: Option<BookingStatus>,
    /// Only this guest's bookings.
    pub customer_id: Option<Uuid>,
    /// Only stays arriving on or after this date.
    pub from: Option<NaiveDate>,
    /// Only stays arriving on or before this date.
    pub to: Option<NaiveDate>,
}

/// What checkout produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    /// The closed booking.
    pub booking: Booking,
    /// The invoice issued.
    pub invoice: Invoice,
    /// The settlement payment, absent when nothing was due.
    pub payment: Option<Payment>,
}

/// What a deposit payment produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositReceipt {
    /// The confirmed booking.
    pub booking: Booking,
    /// The recorded payment.
    pub payment: Payment,
}

/// A pricing preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Computed totals, rounded.
    pub totals: Totals,
    /// Whether every room is free for the stay.
    pub available: bool,
    /// Rooms that are not.
    pub unavailable_room_ids: Vec<Uuid>,
    /// Why the promotion code was ignored, if it was.
    pub promotion_error: Option<String>,
}

/// Lists bookings, newest arrival first.
pub async fn list_bookings(store: &Store, filter: &BookingFilter) -> Vec<Booking> {
    store
        .read(|db| {
            let mut bookings: Vec<Booking> = db
                .bookings
                .values()
                .filter(|b| filter.status.is_none_or(|s| b.status == s))
                .filter(|b| filter.customer_id.is_none_or(|c| b.customer_id == c))
                .filter(|b| filter.from.is_none_or(|d| b.check_in_date >= d))
                .filter(|b| filter.to.is_none_or(|d| b.check_in_date <= d))
                .cloned()
                .collect();
            bookings.sort_by(|a, b| {
                b.check_in_date
                    .cmp(&a.check_in_date)
                    .then(b.created_at.cmp(&a.created_at))
            });
            bookings
        })
        .await
}

/// Fetches one booking.
pub async fn get_booking(store: &Store, id: Uuid) -> HotelResult<Booking> {
    store.read(|db| db.booking(id).cloned()).await
}

/// Creates a booking.
///
/// Fails as a whole when any room is unavailable, reporting every conflicting
/// room. The booking starts `Confirmed` when no deposit is required and
/// `Pending` otherwise.
pub async fn create_booking(
    store: &Store,
    ctx: &RequestContext,
    input: BookingInput,
) -> HotelResult<Booking> {
    check(&input)?;
    let stay = input.stay();
    stay.validate()?;
    stay.ensure_not_past(ctx.now)?;
    ensure_distinct(&input.room_ids)?;

    let now = ctx.now;
    let actor = ctx.actor_id;
    let booking = store
        .transaction(|db| {
            db.customer(input.customer_id)?;
            let rooms = capture_rooms(db, &input.room_ids, &[], stay.is_hourly, true)?;
            ensure_rooms_free(db, &input.room_ids, &stay, None)?;

            let mut booking = Booking {
                id: Uuid::new_v4(),
                customer_id: input.customer_id,
                created_by: actor,
                check_in_date: input.check_in_date,
                check_out_date: input.check_out_date,
                check_in_at: input.check_in_at,
                check_out_at: input.check_out_at,
                is_hourly: input.is_hourly,
                status: initial_status(input.deposit_amount),
                rooms,
                services: Vec::new(),
                promotions: Vec::new(),
                raw_total: Decimal::ZERO,
                discount_amount: Decimal::ZERO,
                total_amount: Decimal::ZERO,
                deposit_amount: round_money(input.deposit_amount),
                is_deposit_paid: false,
                actual_check_in_at: None,
                actual_check_out_at: None,
                notes: input.notes.clone(),
                created_at: now,
                updated_at: now,
            };

            for line in &input.services {
                let line = service_line(db, &booking, line, now)?;
                booking.services.push(line);
            }
            if let Some(code) = input.promotion_code.as_deref().filter(|c| !c.trim().is_empty()) {
                promotions::redeem(db, &mut booking, code, now)?;
            }
            recompute_totals(&mut booking);
            ensure_deposit_within_total(&booking)?;

            db.bookings.insert(booking.id, booking.clone());
            Ok(booking)
        })
        .await?;

    info!(
        booking_id = %booking.id,
        status = %booking.status,
        rooms = booking.rooms.len(),
        total = %booking.total_amount,
        actor = ?ctx.actor_id,
        "Booking created"
    );
    Ok(booking)
}

/// Changes the stay, rooms, deposit or notes of an upcoming booking.
///
/// Rooms already on the booking keep their captured rate unless the billing
/// granularity changes; new rooms capture the current rate.
pub async fn update_booking(
    store: &Store,
    ctx: &RequestContext,
    id: Uuid,
    input: BookingUpdate,
) -> HotelResult<Booking> {
    check(&input)?;
    let stay = input.stay();
    stay.validate()?;
    stay.ensure_not_past(ctx.now)?;
    ensure_distinct(&input.room_ids)?;

    let now = ctx.now;
    let booking = store
        .transaction(|db| {
            let mut booking = db.booking(id)?.clone();
            ensure_status(&booking, "update", BookingStatus::is_upcoming)?;
            if booking.is_deposit_paid && input.deposit_amount != booking.deposit_amount {
                return Err(HotelError::invalid(
                    "deposit_amount",
                    "deposit cannot change once it has been paid",
                ));
            }

            let keep: Vec<BookingRoom> = if input.is_hourly == booking.is_hourly {
                booking.rooms.clone()
            } else {
                Vec::new()
            };
            booking.rooms = capture_rooms(db, &input.room_ids, &keep, input.is_hourly, false)?;
            ensure_rooms_free(db, &input.room_ids, &stay, Some(id))?;

            booking.check_in_date = input.check_in_date;
            booking.check_out_date = input.check_out_date;
            booking.check_in_at = input.check_in_at;
            booking.check_out_at = input.check_out_at;
            booking.is_hourly = input.is_hourly;
            booking.deposit_amount = round_money(input.deposit_amount);
            booking.notes = input.notes.clone();
            if !booking.is_deposit_paid {
                booking.status = initial_status(booking.deposit_amount);
            }
            let held: HashSet<Uuid> = booking.room_ids().into_iter().collect();
            for line in booking.services.iter_mut() {
                if line.room_id.is_some_and(|r| !held.contains(&r)) {
                    line.room_id = None;
                }
            }
            recompute_totals(&mut booking);
            ensure_deposit_within_total(&booking)?;
            booking.updated_at = now;

            db.bookings.insert(id, booking.clone());
            Ok(booking)
        })
        .await?;

    info!(booking_id = %id, status = %booking.status, total = %booking.total_amount, actor = ?ctx.actor_id, "Booking updated");
    Ok(booking)
}

/// Checks a guest in: `Pending|Confirmed -> Checked-in`, rooms become `booked`.
pub async fn check_in(store: &Store, ctx: &RequestContext, id: Uuid) -> HotelResult<Booking> {
    let now = ctx.now;
    let booking = store
        .transaction(|db| {
            let mut booking = db.booking(id)?.clone();
            ensure_status(&booking, "check in", BookingStatus::is_upcoming)?;
            for room_id in booking.room_ids() {
                let room = db.room_mut(room_id)?;
                if room.status == RoomStatus::Maintenance {
                    return Err(HotelError::rule_with(
                        format!("Room {} is under maintenance", room.number),
                        serde_json::json!({ "room_id": room_id }),
                    ));
                }
                room.status = RoomStatus::Booked;
            }
            booking.status = BookingStatus::CheckedIn;
            booking.actual_check_in_at = Some(now);
            booking.updated_at = now;
            db.bookings.insert(id, booking.clone());
            Ok(booking)
        })
        .await?;

    info!(booking_id = %id, actor = ?ctx.actor_id, "Guest checked in");
    Ok(booking)
}

/// Checks a guest out: `Checked-in -> Checked-out`.
///
/// Totals are recomputed, an invoice is issued, the balance is recorded as a
/// settlement payment and the rooms are released.
pub async fn check_out(
    store: &Store,
    ctx: &RequestContext,
    id: Uuid,
    method: PaymentMethod,
) -> HotelResult<CheckoutReceipt> {
    let now = ctx.now;
    let receipt = store
        .transaction(|db| {
            let mut booking = db.booking(id)?.clone();
            ensure_status(&booking, "check out", |s| s == BookingStatus::CheckedIn)?;

            let totals = recompute_totals(&mut booking);
            let deposit_paid = if booking.is_deposit_paid {
                booking.deposit_amount
            } else {
                Decimal::ZERO
            };
            let due = round_money(amount_due(booking.total_amount, deposit_paid));

            let invoice = Invoice {
                id: Uuid::new_v4(),
                number: db.next_invoice_number(),
                booking_id: id,
                customer_id: booking.customer_id,
                billable_units: totals.billable_units,
                room_total: totals.room_total,
                service_total: totals.service_total,
                raw_total: totals.raw_total,
                discount_amount: totals.discount,
                total_amount: totals.total_amount,
                deposit_paid,
                amount_due: due,
                issued_at: now,
            };
            let payment = (due > Decimal::ZERO).then(|| Payment {
                id: Uuid::new_v4(),
                booking_id: id,
                kind: PaymentKind::Settlement,
                method,
                amount: due,
                status: PaymentStatus::Succeeded,
                gateway_reference: None,
                paid_at: now,
            });

            release_rooms(db, &booking);
            booking.status = BookingStatus::CheckedOut;
            booking.actual_check_out_at = Some(now);
            booking.updated_at = now;

            db.invoices.push(invoice.clone());
            if let Some(payment) = &payment {
                db.payments.push(payment.clone());
            }
            db.bookings.insert(id, booking.clone());
            Ok(CheckoutReceipt {
                booking,
                invoice,
                payment,
            })
        })
        .await?;

    info!(
        booking_id = %id,
        invoice = %receipt.invoice.number,
        amount_due = %receipt.invoice.amount_due,
        actor = ?ctx.actor_id,
        "Guest checked out"
    );
    Ok(receipt)
}

/// Cancels an upcoming booking, releasing its rooms and promotion slot.
pub async fn cancel(store: &Store, ctx: &RequestContext, id: Uuid) -> HotelResult<Booking> {
    let now = ctx.now;
    let booking = store
        .transaction(|db| {
            let mut booking = db.booking(id)?.clone();
            ensure_status(&booking, "cancel", BookingStatus::is_upcoming)?;
            release_rooms(db, &booking);
            promotions::release(db, &booking, now);
            booking.status = BookingStatus::Canceled;
            booking.updated_at = now;
            db.bookings.insert(id, booking.clone());
            Ok(booking)
        })
        .await?;

    warn!(booking_id = %id, actor = ?ctx.actor_id, "Booking canceled");
    Ok(booking)
}

/// Records the deposit and confirms the booking.
///
/// Rejected when no deposit is required or it was already paid.
pub async fn pay_deposit(
    store: &Store,
    ctx: &RequestContext,
    id: Uuid,
    method: PaymentMethod,
    gateway_reference: Option<String>,
) -> HotelResult<DepositReceipt> {
    let now = ctx.now;
    let receipt = store
        .transaction(|db| record_deposit(db, id, method, gateway_reference, now))
        .await?;

    info!(
        booking_id = %id,
        amount = %receipt.payment.amount,
        method = ?method,
        actor = ?ctx.actor_id,
        "Deposit recorded"
    );
    Ok(receipt)
}

/// Deposit bookkeeping shared by the front desk and the gateway return.
/// Runs inside the caller's transaction.
pub(crate) fn record_deposit(
    db: &mut Database,
    id: Uuid,
    method: PaymentMethod,
    gateway_reference: Option<String>,
    now: NaiveDateTime,
) -> HotelResult<DepositReceipt> {
    let mut booking = db.booking(id)?.clone();
    ensure_status(&booking, "pay the deposit of", BookingStatus::is_upcoming)?;
    if !booking.requires_deposit() {
        return Err(HotelError::rule("Booking does not require a deposit"));
    }
    if booking.is_deposit_paid {
        return Err(HotelError::rule("Deposit has already been paid"));
    }
    let payment = Payment {
        id: Uuid::new_v4(),
        booking_id: id,
        kind: PaymentKind::Deposit,
        method,
        amount: booking.deposit_amount,
        status: PaymentStatus::Succeeded,
        gateway_reference,
        paid_at: now,
    };
    booking.is_deposit_paid = true;
    booking.status = BookingStatus::Confirmed;
    booking.updated_at = now;
    db.payments.push(payment.clone());
    db.bookings.insert(id, booking.clone());
    Ok(DepositReceipt { booking, payment })
}

/// Records a cash deposit at the front desk.
pub async fn pay_by_cash(store: &Store, ctx: &RequestContext, id: Uuid) -> HotelResult<DepositReceipt> {
    pay_deposit(store, ctx, id, PaymentMethod::Cash, None).await
}

/// Adds a service line and recomputes totals.
pub async fn add_service(
    store: &Store,
    ctx: &RequestContext,
    id: Uuid,
    input: ServiceLineInput,
) -> HotelResult<Booking> {
    check(&input)?;
    let now = ctx.now;
    let booking = store
        .transaction(|db| {
            let mut booking = db.booking(id)?.clone();
            ensure_status(&booking, "add a service to", |s| !s.is_terminal())?;
            let line = service_line(db, &booking, &input, now)?;
            booking.services.push(line);
            recompute_totals(&mut booking);
            booking.updated_at = now;
            db.bookings.insert(id, booking.clone());
            Ok(booking)
        })
        .await?;

    info!(booking_id = %id, service_id = %input.service_id, quantity = input.quantity, "Service added");
    Ok(booking)
}

/// Removes a service line and recomputes totals.
pub async fn remove_service(
    store: &Store,
    ctx: &RequestContext,
    id: Uuid,
    line_id: Uuid,
) -> HotelResult<Booking> {
    let now = ctx.now;
    let booking = store
        .transaction(|db| {
            let mut booking = db.booking(id)?.clone();
            ensure_status(&booking, "remove a service from", |s| !s.is_terminal())?;
            let before = booking.services.len();
            booking.services.retain(|line| line.id != line_id);
            if booking.services.len() == before {
                return Err(HotelError::not_found("service line", line_id));
            }
            recompute_totals(&mut booking);
            booking.updated_at = now;
            db.bookings.insert(id, booking.clone());
            Ok(booking)
        })
        .await?;

    info!(booking_id = %id, line_id = %line_id, "Service removed");
    Ok(booking)
}

/// Prices a prospective booking without persisting anything.
///
/// Unavailable rooms and an unusable promotion code do not fail the quote;
/// they are reported alongside the totals.
pub async fn quote(store: &Store, ctx: &RequestContext, input: BookingInput) -> HotelResult<Quote> {
    check(&input)?;
    let stay = input.stay();
    stay.validate()?;
    ensure_distinct(&input.room_ids)?;
    let today = ctx.today();
    let now = ctx.now;

    store
        .read(|db| {
            let rooms = capture_rooms(db, &input.room_ids, &[], stay.is_hourly, true)?;
            let services = input
                .services
                .iter()
                .map(|line| {
                    let service = db.service(line.service_id)?;
                    Ok(BookingService {
                        id: Uuid::new_v4(),
                        service_id: service.id,
                        quantity: line.quantity,
                        unit_price: service.price,
                        room_id: line.room_id,
                        added_at: now,
                    })
                })
                .collect::<HotelResult<Vec<_>>>()?;

            let mut promotion_error = None;
            let terms = match input.promotion_code.as_deref().filter(|c| !c.trim().is_empty()) {
                Some(code) => match db.promotion_by_code(code) {
                    Some(promotion) => {
                        let mut current = promotion.clone();
                        refresh_status(&mut current, today);
                        match ensure_redeemable(&current, today) {
                            Ok(()) => Some(PromotionTerms::from(&current)),
                            Err(err) => {
                                promotion_error = Some(err.to_string());
                                None
                            }
                        }
                    }
                    None => {
                        promotion_error = Some(format!("promotion not found: {}", code.trim()));
                        None
                    }
                },
                None => None,
            };

            let totals = compute_totals(&rooms, stay.billable_units(), &services, terms.as_ref()).rounded();
            let conflicts = find_conflicts(&input.room_ids, &stay.interval(), db.bookings.values(), None);
            Ok(Quote {
                totals,
                available: conflicts.is_empty(),
                unavailable_room_ids: conflicts.iter().map(|c| c.room_id).collect(),
                promotion_error,
            })
        })
        .await
}

/// Recomputes and stores a booking's money fields from its current lines.
///
/// Returns the unrounded-then-rounded totals that were written.
pub(crate) fn recompute_totals(booking: &mut Booking) -> Totals {
    let terms = booking.promotions.first().map(PromotionTerms::from);
    let totals = compute_totals(
        &booking.rooms,
        booking.stay().billable_units(),
        &booking.services,
        terms.as_ref(),
    )
    .rounded();
    booking.raw_total = totals.raw_total;
    booking.discount_amount = totals.discount;
    booking.total_amount = totals.total_amount;
    totals
}

fn initial_status(deposit_amount: Decimal) -> BookingStatus {
    if deposit_amount > Decimal::ZERO {
        BookingStatus::Pending
    } else {
        BookingStatus::Confirmed
    }
}

fn ensure_status<F>(booking: &Booking, action: &'static str, allowed: F) -> HotelResult<()>
where
    F: Fn(BookingStatus) -> bool,
{
    if allowed(booking.status) {
        Ok(())
    } else {
        Err(HotelError::StateConflict {
            entity: "booking",
            action,
            state: booking.status.to_string(),
        })
    }
}

fn ensure_distinct(room_ids: &[Uuid]) -> HotelResult<()> {
    let unique: HashSet<&Uuid> = room_ids.iter().collect();
    if unique.len() != room_ids.len() {
        return Err(HotelError::invalid("room_ids", "room_ids must not contain duplicates"));
    }
    Ok(())
}

fn ensure_deposit_within_total(booking: &Booking) -> HotelResult<()> {
    if booking.deposit_amount > booking.total_amount {
        return Err(HotelError::invalid(
            "deposit_amount",
            "deposit_amount cannot exceed the booking total",
        ));
    }
    Ok(())
}

/// Room lines for `room_ids`, reusing rates from `keep` where present.
fn capture_rooms(
    db: &Database,
    room_ids: &[Uuid],
    keep: &[BookingRoom],
    is_hourly: bool,
    reject_maintenance: bool,
) -> HotelResult<Vec<BookingRoom>> {
    room_ids
        .iter()
        .map(|&room_id| {
            if let Some(existing) = keep.iter().find(|r| r.room_id == room_id) {
                return Ok(existing.clone());
            }
            let room = db.live_room(room_id)?;
            if reject_maintenance && room.status == RoomStatus::Maintenance {
                return Err(HotelError::rule_with(
                    format!("Room {} is under maintenance", room.number),
                    serde_json::json!({ "room_id": room_id }),
                ));
            }
            let room_type = db.room_type(room.room_type_id)?;
            Ok(BookingRoom {
                room_id,
                rate: room_type.rate_for(is_hourly),
            })
        })
        .collect()
}

fn ensure_rooms_free(
    db: &Database,
    room_ids: &[Uuid],
    stay: &Stay,
    exclude: Option<Uuid>,
) -> HotelResult<()> {
    let conflicts = find_conflicts(room_ids, &stay.interval(), db.bookings.values(), exclude);
    if conflicts.is_empty() {
        return Ok(());
    }
    Err(HotelError::rule_with(
        "Rooms are not available for the requested stay",
        serde_json::json!({
            "room_ids": conflicts.iter().map(|c| c.room_id).collect::<Vec<_>>(),
            "conflicts": conflicts,
        }),
    ))
}

fn service_line(
    db: &Database,
    booking: &Booking,
    input: &ServiceLineInput,
    now: NaiveDateTime,
) -> HotelResult<BookingService> {
    let service = db.service(input.service_id)?;
    if !service.is_active {
        return Err(HotelError::rule(format!("Service {} is not available", service.name)));
    }
    if let Some(room_id) = input.room_id {
        if !booking.holds_room(room_id) {
            return Err(HotelError::invalid("room_id", "room is not part of this booking"));
        }
    }
    Ok(BookingService {
        id: Uuid::new_v4(),
        service_id: service.id,
        quantity: input.quantity,
        unit_price: service.price,
        room_id: input.room_id,
        added_at: now,
    })
}

/// Returns the booking's rooms to `available` unless another checked-in
/// booking still holds them.
fn release_rooms(db: &mut Database, booking: &Booking) {
    for room_id in booking.room_ids() {
        let still_held = db.bookings.values().any(|other| {
            other.id != booking.id
                && other.status == BookingStatus::CheckedIn
                && other.holds_room(room_id)
        });
        if still_held {
            continue;
        }
        if let Some(room) = db.rooms.get_mut(&room_id) {
            if room.status == RoomStatus::Booked {
                room.status = RoomStatus::Available;
            }
        }
    }
}
