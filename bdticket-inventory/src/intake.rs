use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{Ticket, TicketStatus};

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Prices must be positive")]
    InvalidPrice,
}

/// Payload for creating a single ticket batch.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTicket {
    pub airline_id: Uuid,
    pub country_id: Uuid,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub departure_time: String,
    pub arrival_time: Option<String>,
    pub buying_price: i64,
    pub selling_price: i64,
    #[serde(default = "default_seats")]
    pub total_seats: i32,
    pub batch_number: Option<String>,
    pub notes: Option<String>,
}

fn default_seats() -> i32 {
    1
}

/// Payload for bulk intake: one row per physical seat, sharing a batch
/// number.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkIntake {
    pub airline_id: Uuid,
    pub country_id: Uuid,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub departure_time: String,
    pub arrival_time: Option<String>,
    pub buying_price: i64,
    pub selling_price: i64,
    pub quantity: i32,
    pub batch_number: Option<String>,
    pub notes: Option<String>,
}

impl NewTicket {
    pub fn build(self, created_by: Uuid, now: DateTime<Utc>) -> Result<Ticket, IntakeError> {
        check_required(&[
            &self.flight_number,
            &self.origin,
            &self.destination,
            &self.departure_time,
        ])?;
        check_prices(self.buying_price, self.selling_price)?;
        if self.total_seats < 1 {
            return Err(IntakeError::InvalidQuantity(self.total_seats));
        }

        let batch_number = self
            .batch_number
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| default_batch_number(now));

        Ok(Ticket {
            id: Uuid::new_v4(),
            airline_id: self.airline_id,
            country_id: self.country_id,
            flight_number: self.flight_number,
            origin: self.origin,
            destination: self.destination,
            departure_date: self.departure_date,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            buying_price: self.buying_price,
            selling_price: self.selling_price,
            total_seats: self.total_seats,
            available_seats: self.total_seats,
            status: TicketStatus::Available,
            locked_until: None,
            batch_number,
            notes: self.notes,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }
}

impl BulkIntake {
    /// Expand into `quantity` single-seat tickets sharing one batch
    /// number, the way paper batches are bought from airlines.
    pub fn expand(self, created_by: Uuid, now: DateTime<Utc>) -> Result<Vec<Ticket>, IntakeError> {
        check_required(&[
            &self.flight_number,
            &self.origin,
            &self.destination,
            &self.departure_time,
        ])?;
        check_prices(self.buying_price, self.selling_price)?;
        if self.quantity < 1 {
            return Err(IntakeError::InvalidQuantity(self.quantity));
        }

        let batch_number = self
            .batch_number
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| default_batch_number(now));

        let tickets = (0..self.quantity)
            .map(|_| Ticket {
                id: Uuid::new_v4(),
                airline_id: self.airline_id,
                country_id: self.country_id,
                flight_number: self.flight_number.clone(),
                origin: self.origin.clone(),
                destination: self.destination.clone(),
                departure_date: self.departure_date,
                departure_time: self.departure_time.clone(),
                arrival_time: self.arrival_time.clone(),
                buying_price: self.buying_price,
                selling_price: self.selling_price,
                total_seats: 1,
                available_seats: 1,
                status: TicketStatus::Available,
                locked_until: None,
                batch_number: batch_number.clone(),
                notes: self.notes.clone(),
                created_by,
                created_at: now,
                updated_at: now,
            })
            .collect();

        Ok(tickets)
    }
}

fn check_required(fields: &[&str]) -> Result<(), IntakeError> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(IntakeError::MissingFields);
    }
    Ok(())
}

fn check_prices(buying: i64, selling: i64) -> Result<(), IntakeError> {
    if buying <= 0 || selling <= 0 {
        return Err(IntakeError::InvalidPrice);
    }
    Ok(())
}

fn default_batch_number(now: DateTime<Utc>) -> String {
    format!("BATCH-{}", now.timestamp_millis())
}

#[cfg(test)]
pub fn test_ticket(flight: &str, origin: &str, destination: &str) -> Ticket {
    let now = Utc::now();
    Ticket {
        id: Uuid::new_v4(),
        airline_id: Uuid::new_v4(),
        country_id: Uuid::new_v4(),
        flight_number: flight.to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        departure_date: now.date_naive() + chrono::Duration::days(14),
        departure_time: "10:30".to_string(),
        arrival_time: None,
        buying_price: 85_000,
        selling_price: 95_000,
        total_seats: 10,
        available_seats: 10,
        status: TicketStatus::Available,
        locked_until: None,
        batch_number: "BATCH-TEST".to_string(),
        notes: None,
        created_by: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulk() -> BulkIntake {
        BulkIntake {
            airline_id: Uuid::new_v4(),
            country_id: Uuid::new_v4(),
            flight_number: "BG-1001".to_string(),
            origin: "DAC".to_string(),
            destination: "DXB".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
            departure_time: "10:30".to_string(),
            arrival_time: Some("14:45".to_string()),
            buying_price: 85_000,
            selling_price: 95_000,
            quantity: 5,
            batch_number: None,
            notes: None,
        }
    }

    #[test]
    fn bulk_expands_to_single_seat_tickets() {
        let now = Utc::now();
        let tickets = bulk().expand(Uuid::new_v4(), now).unwrap();

        assert_eq!(tickets.len(), 5);
        let batch = &tickets[0].batch_number;
        assert!(batch.starts_with("BATCH-"));
        for ticket in &tickets {
            assert_eq!(ticket.total_seats, 1);
            assert_eq!(ticket.available_seats, 1);
            assert_eq!(ticket.status, TicketStatus::Available);
            assert_eq!(&ticket.batch_number, batch);
        }
    }

    #[test]
    fn bulk_keeps_caller_batch_number() {
        let mut req = bulk();
        req.batch_number = Some("BATCH-2025-007".to_string());
        let tickets = req.expand(Uuid::new_v4(), Utc::now()).unwrap();
        assert!(tickets.iter().all(|t| t.batch_number == "BATCH-2025-007"));
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let mut req = bulk();
        req.flight_number = "  ".to_string();
        assert!(matches!(
            req.expand(Uuid::new_v4(), Utc::now()),
            Err(IntakeError::MissingFields)
        ));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let mut req = bulk();
        req.quantity = 0;
        assert!(matches!(
            req.expand(Uuid::new_v4(), Utc::now()),
            Err(IntakeError::InvalidQuantity(0))
        ));
    }

    #[test]
    fn single_ticket_defaults_available_to_total() {
        let req = NewTicket {
            airline_id: Uuid::new_v4(),
            country_id: Uuid::new_v4(),
            flight_number: "QR-3003".to_string(),
            origin: "DAC".to_string(),
            destination: "DOH".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2025, 11, 2).unwrap(),
            departure_time: "09:15".to_string(),
            arrival_time: None,
            buying_price: 75_000,
            selling_price: 85_000,
            total_seats: 15,
            batch_number: Some("BATCH-2025-003".to_string()),
            notes: Some("Corporate allocation".to_string()),
        };

        let ticket = req.build(Uuid::new_v4(), Utc::now()).unwrap();
        assert_eq!(ticket.available_seats, 15);
        assert_eq!(ticket.status, TicketStatus::Available);
        assert_eq!(ticket.batch_number, "BATCH-2025-003");
    }
}
