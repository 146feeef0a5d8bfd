use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use bdticket_inventory::{Airline, Ticket, TicketStatus};

use crate::models::{Booking, BookingStatus};

/// Figures for the dashboard cards, computed over live data.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub todays_sales: TodaysSales,
    pub total_bookings: usize,
    pub locked_tickets: usize,
    pub total_inventory: usize,
    pub estimated_profit: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TodaysSales {
    pub amount: i64,
    pub count: usize,
}

/// The total bookings card counts pending bookings only. Estimated
/// profit sums selling minus buying over sold batches.
pub fn dashboard_stats(bookings: &[Booking], tickets: &[Ticket], today: NaiveDate) -> DashboardStats {
    let todays: Vec<&Booking> = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Confirmed && b.created_at.date_naive() == today)
        .collect();

    DashboardStats {
        todays_sales: TodaysSales {
            amount: todays.iter().map(|b| b.selling_price).sum(),
            count: todays.len(),
        },
        total_bookings: bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Pending)
            .count(),
        locked_tickets: tickets
            .iter()
            .filter(|t| t.status == TicketStatus::Locked)
            .count(),
        total_inventory: tickets
            .iter()
            .filter(|t| t.status == TicketStatus::Available)
            .count(),
        estimated_profit: tickets
            .iter()
            .filter(|t| t.status == TicketStatus::Sold)
            .map(|t| t.selling_price - t.buying_price)
            .sum(),
    }
}

/// One confirmed sale, joined with its flight.
#[derive(Debug, Clone, Serialize)]
pub struct SalesRow {
    pub id: String,
    pub flight_number: String,
    pub airline_name: String,
    pub total_amount: i64,
    pub passenger_name: String,
    pub passenger_phone: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub profit: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesSummary {
    pub total_bookings: usize,
    pub total_revenue: i64,
    pub total_profit: i64,
    pub average_ticket_price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub data: Vec<SalesRow>,
    pub summary: SalesSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryRow {
    pub id: Uuid,
    pub flight_number: String,
    pub airline_name: String,
    pub status: TicketStatus,
    pub available_seats: i32,
    pub total_seats: i32,
    pub buying_price: i64,
    pub selling_price: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventorySummary {
    pub available: usize,
    pub locked: usize,
    pub sold: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryReport {
    pub data: Vec<InventoryRow>,
    pub summary: InventorySummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfitRow {
    #[serde(flatten)]
    pub sale: SalesRow,
    pub profit_margin: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfitSummary {
    pub total_profit: i64,
    pub total_cost: i64,
    pub total_revenue: i64,
    pub profit_margin: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfitReport {
    pub data: Vec<ProfitRow>,
    pub summary: ProfitSummary,
}

pub fn sales_report(bookings: &[Booking], tickets: &[Ticket], airlines: &[Airline]) -> SalesReport {
    let data = sales_rows(bookings, tickets, airlines);
    let total_revenue: i64 = data.iter().map(|r| r.total_amount).sum();
    let total_profit: i64 = data.iter().map(|r| r.profit).sum();
    let average_ticket_price = if data.is_empty() {
        0.0
    } else {
        round2(total_revenue as f64 / data.len() as f64)
    };

    SalesReport {
        summary: SalesSummary {
            total_bookings: data.len(),
            total_revenue,
            total_profit,
            average_ticket_price,
        },
        data,
    }
}

pub fn inventory_report(tickets: &[Ticket], airlines: &[Airline]) -> InventoryReport {
    let airline_names = airline_lookup(airlines);
    let data = tickets
        .iter()
        .map(|ticket| InventoryRow {
            id: ticket.id,
            flight_number: ticket.flight_number.clone(),
            airline_name: name_for(&airline_names, ticket.airline_id),
            status: ticket.status,
            available_seats: ticket.available_seats,
            total_seats: ticket.total_seats,
            buying_price: ticket.buying_price,
            selling_price: ticket.selling_price,
        })
        .collect();

    let count = |status: TicketStatus| tickets.iter().filter(|t| t.status == status).count();
    InventoryReport {
        data,
        summary: InventorySummary {
            available: count(TicketStatus::Available),
            locked: count(TicketStatus::Locked),
            sold: count(TicketStatus::Sold),
            total: tickets.len(),
        },
    }
}

/// Margin is profit over revenue as a percentage, zero when there is
/// no revenue to divide by. Total cost covers the whole inventory, not
/// only the sold part.
pub fn profit_report(bookings: &[Booking], tickets: &[Ticket], airlines: &[Airline]) -> ProfitReport {
    let rows = sales_rows(bookings, tickets, airlines);
    let total_revenue: i64 = rows.iter().map(|r| r.total_amount).sum();
    let total_profit: i64 = rows.iter().map(|r| r.profit).sum();
    let total_cost: i64 = tickets.iter().map(|t| t.buying_price).sum();
    let profit_margin = if total_revenue == 0 {
        0.0
    } else {
        round2(total_profit as f64 / total_revenue as f64 * 100.0)
    };

    let data = rows
        .into_iter()
        .map(|row| {
            let margin = if row.total_amount == 0 {
                0.0
            } else {
                round2(row.profit as f64 / row.total_amount as f64 * 100.0)
            };
            ProfitRow {
                sale: row,
                profit_margin: margin,
            }
        })
        .collect();

    ProfitReport {
        data,
        summary: ProfitSummary {
            total_profit,
            total_cost,
            total_revenue,
            profit_margin,
        },
    }
}

/// Sales rows cover confirmed bookings only. A booking whose batch was
/// removed is skipped rather than shown with blank flight details;
/// batch deletion is blocked while bookings reference it, so this only
/// guards historical data.
fn sales_rows(bookings: &[Booking], tickets: &[Ticket], airlines: &[Airline]) -> Vec<SalesRow> {
    let by_id: HashMap<Uuid, &Ticket> = tickets.iter().map(|t| (t.id, t)).collect();
    let airline_names = airline_lookup(airlines);

    bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Confirmed)
        .filter_map(|booking| {
            let ticket = by_id.get(&booking.ticket_id)?;
            Some(SalesRow {
                id: booking.reference.clone(),
                flight_number: ticket.flight_number.clone(),
                airline_name: name_for(&airline_names, ticket.airline_id),
                total_amount: booking.selling_price,
                passenger_name: booking.passenger.name.clone(),
                passenger_phone: booking.passenger.phone.0.clone(),
                status: booking.status,
                created_at: booking.created_at,
                profit: booking.selling_price - ticket.buying_price,
            })
        })
        .collect()
}

fn airline_lookup(airlines: &[Airline]) -> HashMap<Uuid, &str> {
    airlines.iter().map(|a| (a.id, a.name.as_str())).collect()
}

fn name_for(names: &HashMap<Uuid, &str>, airline_id: Uuid) -> String {
    names.get(&airline_id).copied().unwrap_or("Unknown").to_string()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
