use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use bdticket_booking::{Booking, Payment};
use bdticket_inventory::{Airline, Country, Ticket};
use bdticket_shared::{ActivityFilter, ActivityLog, SettingsDocument};
use bdticket_umrah::{UmrahBooking, UmrahPackage};

use crate::auth::User;

type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for ticket batch access
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, RepoError>;

    async fn get_ticket(&self, id: Uuid) -> Result<Option<Ticket>, RepoError>;

    async fn create_ticket(&self, ticket: &Ticket) -> Result<(), RepoError>;

    /// Bulk intake: one batch expanded into many rows.
    async fn create_tickets(&self, tickets: &[Ticket]) -> Result<(), RepoError>;

    async fn update_ticket(&self, ticket: &Ticket) -> Result<(), RepoError>;

    /// Returns false when the ticket does not exist.
    async fn delete_ticket(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Tickets whose hold timestamp has passed, for the expiry sweep.
    async fn expired_locks(&self, now: DateTime<Utc>) -> Result<Vec<Ticket>, RepoError>;
}

/// Repository trait for booking access. Bookings move seats, so the
/// writes that touch a booking and its ticket store both atomically.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn list_bookings(&self) -> Result<Vec<Booking>, RepoError>;

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, RepoError>;

    /// Total bookings ever taken, for reference numbering.
    async fn count_bookings(&self) -> Result<u64, RepoError>;

    async fn create_booking(&self, booking: &Booking, ticket: &Ticket) -> Result<(), RepoError>;

    async fn update_booking(&self, booking: &Booking, ticket: &Ticket) -> Result<(), RepoError>;

    /// Whether any pending or confirmed booking still references the
    /// ticket. Guards batch deletion.
    async fn has_active_for_ticket(&self, ticket_id: Uuid) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait CountryRepository: Send + Sync {
    async fn list_countries(&self) -> Result<Vec<Country>, RepoError>;

    async fn create_country(&self, country: &Country) -> Result<(), RepoError>;
}

#[async_trait]
pub trait AirlineRepository: Send + Sync {
    async fn list_airlines(&self) -> Result<Vec<Airline>, RepoError>;

    async fn create_airline(&self, airline: &Airline) -> Result<(), RepoError>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn list_payments(&self, booking_id: Option<Uuid>) -> Result<Vec<Payment>, RepoError>;

    async fn create_payment(&self, payment: &Payment) -> Result<(), RepoError>;

    /// Total payments ever recorded, for transaction numbering.
    async fn count_payments(&self) -> Result<u64, RepoError>;
}

/// Repository trait for Umrah packages and their group bookings.
#[async_trait]
pub trait UmrahRepository: Send + Sync {
    async fn list_packages(&self) -> Result<Vec<UmrahPackage>, RepoError>;

    async fn get_package(&self, id: Uuid) -> Result<Option<UmrahPackage>, RepoError>;

    async fn create_package(&self, package: &UmrahPackage) -> Result<(), RepoError>;

    async fn update_package(&self, package: &UmrahPackage) -> Result<(), RepoError>;

    async fn list_group_bookings(&self) -> Result<Vec<UmrahBooking>, RepoError>;

    async fn get_group_booking(&self, id: Uuid) -> Result<Option<UmrahBooking>, RepoError>;

    /// Group bookings take pilgrim seats, so booking and package store
    /// atomically, like bookings and tickets.
    async fn create_group_booking(
        &self,
        booking: &UmrahBooking,
        package: &UmrahPackage,
    ) -> Result<(), RepoError>;

    async fn update_group_booking(
        &self,
        booking: &UmrahBooking,
        package: &UmrahPackage,
    ) -> Result<(), RepoError>;
}

#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    async fn list_activity(&self, filter: &ActivityFilter) -> Result<Vec<ActivityLog>, RepoError>;

    async fn record_activity(&self, entry: &ActivityLog) -> Result<(), RepoError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn list_users(&self) -> Result<Vec<User>, RepoError>;
}

/// Settings persist as one document; merging happens in the domain
/// layer and the merged document is written back whole.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn load_settings(&self) -> Result<SettingsDocument, RepoError>;

    async fn save_settings(&self, settings: &SettingsDocument) -> Result<(), RepoError>;
}
