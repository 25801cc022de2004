//! Revenue and occupancy statistics.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HotelError, HotelResult};
use crate::models::PaymentKind;
use crate::store::Store;

/// Date range for a revenue report, both ends inclusive.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RevenueQuery {
    /// First day.
    pub from: NaiveDate,
    /// Last day.
    pub to: NaiveDate,
}

/// Invoice revenue for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenue {
    /// Issue date.
    pub date: NaiveDate,
    /// Sum of invoice totals.
    pub amount: Decimal,
    /// Invoices issued.
    pub invoices: usize,
}

/// Revenue and occupancy figures for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueReport {
    /// First day.
    pub from: NaiveDate,
    /// Last day.
    pub to: NaiveDate,
    /// Invoices issued in the range.
    pub invoice_count: usize,
    /// Sum of their totals.
    pub invoice_total: Decimal,
    /// Per-day breakdown, days without invoices omitted.
    pub revenue_by_day: Vec<DailyRevenue>,
    /// Deposits received in the range.
    pub deposits_collected: Decimal,
    /// Bookings arriving in the range, by status.
    pub bookings_by_status: BTreeMap<String, usize>,
    /// Current live rooms by status.
    pub rooms_by_status: BTreeMap<String, usize>,
}

/// Builds the revenue report for `query`.
pub async fn revenue_report(store: &Store, query: RevenueQuery) -> HotelResult<RevenueReport> {
    if query.to < query.from {
        return Err(HotelError::invalid("to", "to must not be before from"));
    }
    let in_range = |date: NaiveDate| query.from <= date && date <= query.to;

    let report = store
        .read(|db| {
            let mut by_day: BTreeMap<NaiveDate, DailyRevenue> = BTreeMap::new();
            let mut invoice_total = Decimal::ZERO;
            let mut invoice_count = 0;
            for invoice in db.invoices.iter().filter(|i| in_range(i.issued_at.date())) {
                let date = invoice.issued_at.date();
                let day = by_day.entry(date).or_insert_with(|| DailyRevenue {
                    date,
                    amount: Decimal::ZERO,
                    invoices: 0,
                });
                day.amount += invoice.total_amount;
                day.invoices += 1;
                invoice_total += invoice.total_amount;
                invoice_count += 1;
            }

            let deposits_collected = db
                .payments
                .iter()
                .filter(|p| p.kind == PaymentKind::Deposit && in_range(p.paid_at.date()))
                .map(|p| p.amount)
                .sum();

            let mut bookings_by_status = BTreeMap::new();
            for booking in db.bookings.values().filter(|b| in_range(b.check_in_date)) {
                *bookings_by_status.entry(booking.status.to_string()).or_insert(0) += 1;
            }

            let mut rooms_by_status = BTreeMap::new();
            for room in db.rooms.values().filter(|r| !r.is_deleted()) {
                *rooms_by_status.entry(room.status.to_string()).or_insert(0) += 1;
            }

            RevenueReport {
                from: query.from,
                to: query.to,
                invoice_count,
                invoice_total,
                revenue_by_day: by_day.into_values().collect(),
                deposits_collected,
                bookings_by_status,
                rooms_by_status,
            }
        })
        .await;

    debug!(
        from = %query.from,
        to = %query.to,
        invoice_total = %report.invoice_total,
        "Revenue report built"
    );
    Ok(report)
}
