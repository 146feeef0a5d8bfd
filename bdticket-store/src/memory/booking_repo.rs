use async_trait::async_trait;
use uuid::Uuid;

use bdticket_booking::{Booking, BookingStatus, Payment};
use bdticket_core::repository::{BookingRepository, PaymentRepository};
use bdticket_inventory::Ticket;

use super::MemoryStore;

type RepoError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn list_bookings(&self) -> Result<Vec<Booking>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.bookings.values().cloned().collect())
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.bookings.get(&id).cloned())
    }

    async fn count_bookings(&self) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.bookings.len() as u64)
    }

    async fn create_booking(&self, booking: &Booking, ticket: &Ticket) -> Result<(), RepoError> {
        // Single write lock, so booking and seat counts land together.
        let mut tables = self.tables.write().await;
        tables.bookings.insert(booking.id, booking.clone());
        tables.tickets.insert(ticket.id, ticket.clone());
        Ok(())
    }

    async fn update_booking(&self, booking: &Booking, ticket: &Ticket) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.bookings.insert(booking.id, booking.clone());
        tables.tickets.insert(ticket.id, ticket.clone());
        Ok(())
    }

    async fn has_active_for_ticket(&self, ticket_id: Uuid) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.bookings.values().any(|b| {
            b.ticket_id == ticket_id
                && matches!(b.status, BookingStatus::Pending | BookingStatus::Confirmed)
        }))
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn list_payments(&self, booking_id: Option<Uuid>) -> Result<Vec<Payment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .payments
            .iter()
            .filter(|p| booking_id.map_or(true, |id| p.booking_id == id))
            .cloned()
            .collect())
    }

    async fn create_payment(&self, payment: &Payment) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.payments.push(payment.clone());
        Ok(())
    }

    async fn count_payments(&self) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.payments.len() as u64)
    }
}
