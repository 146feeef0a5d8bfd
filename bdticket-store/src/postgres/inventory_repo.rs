use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use bdticket_core::repository::{AirlineRepository, CountryRepository, TicketRepository};
use bdticket_inventory::{Airline, Country, Ticket, TicketStatus};

use super::{PgStore, RepoError};

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    airline_id: Uuid,
    country_id: Uuid,
    flight_number: String,
    origin: String,
    destination: String,
    departure_date: NaiveDate,
    departure_time: String,
    arrival_time: Option<String>,
    buying_price: i64,
    selling_price: i64,
    total_seats: i32,
    available_seats: i32,
    status: String,
    locked_until: Option<DateTime<Utc>>,
    batch_number: String,
    notes: Option<String>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TicketRow {
    fn into_ticket(self) -> Result<Ticket, RepoError> {
        let status = self
            .status
            .parse::<TicketStatus>()
            .map_err(|_| format!("unknown ticket status: {}", self.status))?;
        Ok(Ticket {
            id: self.id,
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
            available_seats: self.available_seats,
            status,
            locked_until: self.locked_until,
            batch_number: self.batch_number,
            notes: self.notes,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_TICKET: &str = "SELECT id, airline_id, country_id, flight_number, origin, \
     destination, departure_date, departure_time, arrival_time, buying_price, selling_price, \
     total_seats, available_seats, status, locked_until, batch_number, notes, created_by, \
     created_at, updated_at FROM tickets";

pub(super) async fn insert_ticket<'e, E>(executor: E, ticket: &Ticket) -> Result<(), sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO tickets (id, airline_id, country_id, flight_number, origin, destination, \
         departure_date, departure_time, arrival_time, buying_price, selling_price, total_seats, \
         available_seats, status, locked_until, batch_number, notes, created_by, created_at, \
         updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
         $18, $19, $20)",
    )
    .bind(ticket.id)
    .bind(ticket.airline_id)
    .bind(ticket.country_id)
    .bind(&ticket.flight_number)
    .bind(&ticket.origin)
    .bind(&ticket.destination)
    .bind(ticket.departure_date)
    .bind(&ticket.departure_time)
    .bind(&ticket.arrival_time)
    .bind(ticket.buying_price)
    .bind(ticket.selling_price)
    .bind(ticket.total_seats)
    .bind(ticket.available_seats)
    .bind(ticket.status.to_string())
    .bind(ticket.locked_until)
    .bind(&ticket.batch_number)
    .bind(&ticket.notes)
    .bind(ticket.created_by)
    .bind(ticket.created_at)
    .bind(ticket.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub(super) async fn update_ticket_row<'e, E>(executor: E, ticket: &Ticket) -> Result<(), sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        "UPDATE tickets SET airline_id = $2, country_id = $3, flight_number = $4, origin = $5, \
         destination = $6, departure_date = $7, departure_time = $8, arrival_time = $9, \
         buying_price = $10, selling_price = $11, total_seats = $12, available_seats = $13, \
         status = $14, locked_until = $15, batch_number = $16, notes = $17, updated_at = $18 \
         WHERE id = $1",
    )
    .bind(ticket.id)
    .bind(ticket.airline_id)
    .bind(ticket.country_id)
    .bind(&ticket.flight_number)
    .bind(&ticket.origin)
    .bind(&ticket.destination)
    .bind(ticket.departure_date)
    .bind(&ticket.departure_time)
    .bind(&ticket.arrival_time)
    .bind(ticket.buying_price)
    .bind(ticket.selling_price)
    .bind(ticket.total_seats)
    .bind(ticket.available_seats)
    .bind(ticket.status.to_string())
    .bind(ticket.locked_until)
    .bind(&ticket.batch_number)
    .bind(&ticket.notes)
    .bind(ticket.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl TicketRepository for PgStore {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, RepoError> {
        let rows: Vec<TicketRow> =
            sqlx::query_as(&format!("{SELECT_TICKET} ORDER BY departure_date, departure_time"))
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(TicketRow::into_ticket).collect()
    }

    async fn get_ticket(&self, id: Uuid) -> Result<Option<Ticket>, RepoError> {
        let row: Option<TicketRow> = sqlx::query_as(&format!("{SELECT_TICKET} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(TicketRow::into_ticket).transpose()
    }

    async fn create_ticket(&self, ticket: &Ticket) -> Result<(), RepoError> {
        insert_ticket(&self.pool, ticket).await?;
        Ok(())
    }

    async fn create_tickets(&self, tickets: &[Ticket]) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;
        for ticket in tickets {
            insert_ticket(&mut *tx, ticket).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn update_ticket(&self, ticket: &Ticket) -> Result<(), RepoError> {
        update_ticket_row(&self.pool, ticket).await?;
        Ok(())
    }

    async fn delete_ticket(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn expired_locks(&self, now: DateTime<Utc>) -> Result<Vec<Ticket>, RepoError> {
        let rows: Vec<TicketRow> = sqlx::query_as(&format!(
            "{SELECT_TICKET} WHERE locked_until IS NOT NULL AND locked_until <= $1"
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(TicketRow::into_ticket).collect()
    }
}

#[derive(sqlx::FromRow)]
struct CountryRow {
    id: Uuid,
    name: String,
    code: String,
    flag: String,
}

#[async_trait]
impl CountryRepository for PgStore {
    async fn list_countries(&self) -> Result<Vec<Country>, RepoError> {
        let rows: Vec<CountryRow> =
            sqlx::query_as("SELECT id, name, code, flag FROM countries ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|r| Country {
                id: r.id,
                name: r.name,
                code: r.code,
                flag: r.flag,
            })
            .collect())
    }

    async fn create_country(&self, country: &Country) -> Result<(), RepoError> {
        sqlx::query("INSERT INTO countries (id, name, code, flag) VALUES ($1, $2, $3, $4)")
            .bind(country.id)
            .bind(&country.name)
            .bind(&country.code)
            .bind(&country.flag)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct AirlineRow {
    id: Uuid,
    name: String,
    code: String,
    logo_url: Option<String>,
}

#[async_trait]
impl AirlineRepository for PgStore {
    async fn list_airlines(&self) -> Result<Vec<Airline>, RepoError> {
        let rows: Vec<AirlineRow> =
            sqlx::query_as("SELECT id, name, code, logo_url FROM airlines ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|r| Airline {
                id: r.id,
                name: r.name,
                code: r.code,
                logo_url: r.logo_url,
            })
            .collect())
    }

    async fn create_airline(&self, airline: &Airline) -> Result<(), RepoError> {
        sqlx::query("INSERT INTO airlines (id, name, code, logo_url) VALUES ($1, $2, $3, $4)")
            .bind(airline.id)
            .bind(&airline.name)
            .bind(&airline.code)
            .bind(&airline.logo_url)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
