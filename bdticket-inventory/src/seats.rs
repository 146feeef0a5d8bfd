use chrono::{DateTime, Utc};

use crate::models::{Ticket, TicketStatus};

#[derive(Debug, thiserror::Error)]
pub enum SeatError {
    #[error("Insufficient seats: requested {requested}, available {available}")]
    InsufficientSeats { requested: i32, available: i32 },

    #[error("Ticket is not sellable: {0}")]
    NotSellable(String),

    #[error("Invalid seat count: {0}")]
    InvalidQuantity(i32),
}

impl Ticket {
    /// Reserve seats for a new booking. The batch goes to `locked` and
    /// stays there until the hold window passes or the booking settles.
    pub fn reserve_seats(
        &mut self,
        seats: i32,
        locked_until: DateTime<Utc>,
    ) -> Result<(), SeatError> {
        if seats < 1 {
            return Err(SeatError::InvalidQuantity(seats));
        }
        if self.status == TicketStatus::Sold {
            return Err(SeatError::NotSellable(format!(
                "batch {} is sold out",
                self.batch_number
            )));
        }
        if seats > self.available_seats {
            return Err(SeatError::InsufficientSeats {
                requested: seats,
                available: self.available_seats,
            });
        }

        self.available_seats -= seats;
        self.status = TicketStatus::Locked;
        self.locked_until = Some(locked_until);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Make a reservation permanent after the sale is confirmed. Seats
    /// stay drawn down; the hold is released.
    pub fn commit_sale(&mut self) {
        self.locked_until = None;
        self.status = if self.available_seats == 0 {
            TicketStatus::Sold
        } else {
            TicketStatus::Available
        };
        self.updated_at = Utc::now();
    }

    /// Return seats from a cancelled booking.
    pub fn release_seats(&mut self, seats: i32) {
        self.available_seats = (self.available_seats + seats.max(0)).min(self.total_seats);
        self.locked_until = None;
        self.status = if self.available_seats == 0 {
            TicketStatus::Sold
        } else {
            TicketStatus::Available
        };
        self.updated_at = Utc::now();
    }

    /// Drop a hold whose window has passed. Seats held by still-pending
    /// bookings are not returned here; only the lock flag is cleared.
    /// Returns true when the ticket changed.
    pub fn expire_lock(&mut self, now: DateTime<Utc>) -> bool {
        match self.locked_until {
            Some(until) if until <= now => {
                self.locked_until = None;
                self.status = if self.available_seats == 0 {
                    TicketStatus::Sold
                } else {
                    TicketStatus::Available
                };
                self.updated_at = now;
                true
            }
            _ => false,
        }
    }

    pub fn is_lock_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.locked_until, Some(until) if until <= now)
    }
}
