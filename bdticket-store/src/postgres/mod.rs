//! Postgres backend on sqlx. Queries are checked at runtime so the
//! crate builds without a live database; the schema lives under
//! `migrations/` at the workspace root.

mod admin_repo;
mod booking_repo;
mod inventory_repo;
mod umrah_repo;

use sqlx::PgPool;
use tracing::info;

use bdticket_core::repository::{
    ActivityLogRepository, AirlineRepository, BookingRepository, CountryRepository,
    PaymentRepository, SettingsRepository, TicketRepository, UmrahRepository,
};

use crate::database::DbClient;
use crate::seed::SeedData;

type RepoError = Box<dyn std::error::Error + Send + Sync>;

pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    pub fn new(db: &DbClient) -> Self {
        Self {
            pool: db.pool.clone(),
        }
    }

    /// Load the demo dataset on first run, keyed off an empty users
    /// table. Existing databases are left untouched.
    pub async fn seed_if_empty(&self) -> Result<(), RepoError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(());
        }

        info!("Empty database, loading demo dataset");
        let seed = SeedData::demo();

        for user in &seed.users {
            sqlx::query(
                "INSERT INTO users (id, username, name, email, role, status, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.role.to_string())
            .bind(user.status.to_string())
            .bind(user.created_at)
            .execute(&self.pool)
            .await?;
        }

        for country in &seed.countries {
            self.create_country(country).await?;
        }

        for airline in &seed.airlines {
            self.create_airline(airline).await?;
        }

        self.create_tickets(&seed.tickets).await?;

        for booking in &seed.bookings {
            let ticket = seed
                .tickets
                .iter()
                .find(|t| t.id == booking.ticket_id)
                .ok_or("seed booking references a missing ticket")?;
            self.create_booking(booking, ticket).await?;
        }

        for payment in &seed.payments {
            self.create_payment(payment).await?;
        }

        for package in &seed.packages {
            self.create_package(package).await?;
        }

        for group in &seed.group_bookings {
            let package = seed
                .packages
                .iter()
                .find(|p| p.id == group.package_id)
                .ok_or("seed group booking references a missing package")?;
            self.create_group_booking(group, package).await?;
        }

        for entry in &seed.activity {
            self.record_activity(entry).await?;
        }

        self.save_settings(&seed.settings).await?;

        info!("Demo dataset loaded");
        Ok(())
    }
}
