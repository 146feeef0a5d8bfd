use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use bdticket_booking::{
    AgentInfo, Booking, BookingStatus, PassengerInfo, Payment, PaymentMethod, PaymentStatus,
    PaymentType,
};
use bdticket_core::repository::{BookingRepository, PaymentRepository};
use bdticket_inventory::Ticket;
use bdticket_shared::pii::Masked;

use super::inventory_repo::update_ticket_row;
use super::{PgStore, RepoError};

// Agent and passenger details are stored flat; the nested shape is
// rebuilt when rows are mapped back into the domain.
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    reference: String,
    ticket_id: Uuid,
    agent_name: String,
    agent_phone: String,
    agent_email: String,
    passenger_name: String,
    passport_no: String,
    passenger_phone: String,
    passenger_email: String,
    pax_count: i32,
    selling_price: i64,
    payment_type: String,
    partial_amount: Option<i64>,
    payment_method: String,
    comments: Option<String>,
    status: String,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking, RepoError> {
        let payment_type = self
            .payment_type
            .parse::<PaymentType>()
            .map_err(|_| format!("unknown payment type: {}", self.payment_type))?;
        let payment_method = self
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|_| format!("unknown payment method: {}", self.payment_method))?;
        let status = self
            .status
            .parse::<BookingStatus>()
            .map_err(|_| format!("unknown booking status: {}", self.status))?;
        Ok(Booking {
            id: self.id,
            reference: self.reference,
            ticket_id: self.ticket_id,
            agent: AgentInfo {
                name: self.agent_name,
                phone: self.agent_phone,
                email: self.agent_email,
            },
            passenger: PassengerInfo {
                name: self.passenger_name,
                passport_no: Masked(self.passport_no),
                phone: Masked(self.passenger_phone),
                email: self.passenger_email,
                pax_count: self.pax_count,
            },
            selling_price: self.selling_price,
            payment_type,
            partial_amount: self.partial_amount,
            payment_method,
            comments: self.comments,
            status,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_BOOKING: &str = "SELECT id, reference, ticket_id, agent_name, agent_phone, \
     agent_email, passenger_name, passport_no, passenger_phone, passenger_email, pax_count, \
     selling_price, payment_type, partial_amount, payment_method, comments, status, created_by, \
     created_at, updated_at FROM bookings";

async fn insert_booking<'e, E>(executor: E, booking: &Booking) -> Result<(), sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO bookings (id, reference, ticket_id, agent_name, agent_phone, agent_email, \
         passenger_name, passport_no, passenger_phone, passenger_email, pax_count, selling_price, \
         payment_type, partial_amount, payment_method, comments, status, created_by, created_at, \
         updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
         $18, $19, $20)",
    )
    .bind(booking.id)
    .bind(&booking.reference)
    .bind(booking.ticket_id)
    .bind(&booking.agent.name)
    .bind(&booking.agent.phone)
    .bind(&booking.agent.email)
    .bind(&booking.passenger.name)
    .bind(&booking.passenger.passport_no.0)
    .bind(&booking.passenger.phone.0)
    .bind(&booking.passenger.email)
    .bind(booking.passenger.pax_count)
    .bind(booking.selling_price)
    .bind(booking.payment_type.to_string())
    .bind(booking.partial_amount)
    .bind(booking.payment_method.to_string())
    .bind(&booking.comments)
    .bind(booking.status.to_string())
    .bind(booking.created_by)
    .bind(booking.created_at)
    .bind(booking.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

async fn update_booking_row<'e, E>(executor: E, booking: &Booking) -> Result<(), sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        "UPDATE bookings SET agent_name = $2, agent_phone = $3, agent_email = $4, \
         passenger_name = $5, passport_no = $6, passenger_phone = $7, passenger_email = $8, \
         pax_count = $9, selling_price = $10, payment_type = $11, partial_amount = $12, \
         payment_method = $13, comments = $14, status = $15, updated_at = $16 \
         WHERE id = $1",
    )
    .bind(booking.id)
    .bind(&booking.agent.name)
    .bind(&booking.agent.phone)
    .bind(&booking.agent.email)
    .bind(&booking.passenger.name)
    .bind(&booking.passenger.passport_no.0)
    .bind(&booking.passenger.phone.0)
    .bind(&booking.passenger.email)
    .bind(booking.passenger.pax_count)
    .bind(booking.selling_price)
    .bind(booking.payment_type.to_string())
    .bind(booking.partial_amount)
    .bind(booking.payment_method.to_string())
    .bind(&booking.comments)
    .bind(booking.status.to_string())
    .bind(booking.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl BookingRepository for PgStore {
    async fn list_bookings(&self) -> Result<Vec<Booking>, RepoError> {
        let rows: Vec<BookingRow> = sqlx::query_as(SELECT_BOOKING)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!("{SELECT_BOOKING} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(BookingRow::into_booking).transpose()
    }

    async fn count_bookings(&self) -> Result<u64, RepoError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn create_booking(&self, booking: &Booking, ticket: &Ticket) -> Result<(), RepoError> {
        // Booking and the seat hold on its batch commit together.
        let mut tx = self.pool.begin().await?;
        insert_booking(&mut *tx, booking).await?;
        update_ticket_row(&mut *tx, ticket).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_booking(&self, booking: &Booking, ticket: &Ticket) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;
        update_booking_row(&mut *tx, booking).await?;
        update_ticket_row(&mut *tx, ticket).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn has_active_for_ticket(&self, ticket_id: Uuid) -> Result<bool, RepoError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM bookings \
             WHERE ticket_id = $1 AND status IN ('pending', 'confirmed'))",
        )
        .bind(ticket_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    booking_id: Uuid,
    booking_reference: String,
    passenger_name: String,
    amount: i64,
    payment_method: String,
    payment_date: DateTime<Utc>,
    status: String,
    transaction_id: String,
    recorded_by: Uuid,
}

impl PaymentRow {
    fn into_payment(self) -> Result<Payment, RepoError> {
        let payment_method = self
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|_| format!("unknown payment method: {}", self.payment_method))?;
        let status = self
            .status
            .parse::<PaymentStatus>()
            .map_err(|_| format!("unknown payment status: {}", self.status))?;
        Ok(Payment {
            id: self.id,
            booking_id: self.booking_id,
            booking_reference: self.booking_reference,
            passenger_name: self.passenger_name,
            amount: self.amount,
            payment_method,
            payment_date: self.payment_date,
            status,
            transaction_id: self.transaction_id,
            recorded_by: self.recorded_by,
        })
    }
}

#[async_trait]
impl PaymentRepository for PgStore {
    async fn list_payments(&self, booking_id: Option<Uuid>) -> Result<Vec<Payment>, RepoError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(
            "SELECT id, booking_id, booking_reference, passenger_name, amount, payment_method, \
             payment_date, status, transaction_id, recorded_by FROM payments \
             WHERE ($1::uuid IS NULL OR booking_id = $1) ORDER BY payment_date DESC",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(PaymentRow::into_payment).collect()
    }

    async fn create_payment(&self, payment: &Payment) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO payments (id, booking_id, booking_reference, passenger_name, amount, \
             payment_method, payment_date, status, transaction_id, recorded_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(payment.id)
        .bind(payment.booking_id)
        .bind(&payment.booking_reference)
        .bind(&payment.passenger_name)
        .bind(payment.amount)
        .bind(payment.payment_method.to_string())
        .bind(payment.payment_date)
        .bind(payment.status.to_string())
        .bind(&payment.transaction_id)
        .bind(payment.recorded_by)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn count_payments(&self) -> Result<u64, RepoError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM payments")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
