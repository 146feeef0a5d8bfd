use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use bdticket_core::repository::UmrahRepository;
use bdticket_shared::pii::Masked;
use bdticket_umrah::{
    GroupBookingStatus, GroupLeader, PackageStatus, PackageType, UmrahBooking, UmrahPackage,
};

use super::{PgStore, RepoError};

#[derive(sqlx::FromRow)]
struct PackageRow {
    id: Uuid,
    package_name: String,
    package_type: String,
    duration_days: i32,
    makkah_hotel: String,
    madinah_hotel: String,
    makkah_nights: i32,
    madinah_nights: i32,
    departure_date: NaiveDate,
    return_date: NaiveDate,
    total_seats: i32,
    available_seats: i32,
    package_price: i64,
    status: String,
    airline_id: Uuid,
    created_at: DateTime<Utc>,
}

impl PackageRow {
    fn into_package(self) -> Result<UmrahPackage, RepoError> {
        let package_type = self
            .package_type
            .parse::<PackageType>()
            .map_err(|_| format!("unknown package type: {}", self.package_type))?;
        let status = self
            .status
            .parse::<PackageStatus>()
            .map_err(|_| format!("unknown package status: {}", self.status))?;
        Ok(UmrahPackage {
            id: self.id,
            package_name: self.package_name,
            package_type,
            duration_days: self.duration_days,
            makkah_hotel: self.makkah_hotel,
            madinah_hotel: self.madinah_hotel,
            makkah_nights: self.makkah_nights,
            madinah_nights: self.madinah_nights,
            departure_date: self.departure_date,
            return_date: self.return_date,
            total_seats: self.total_seats,
            available_seats: self.available_seats,
            package_price: self.package_price,
            status,
            airline_id: self.airline_id,
            created_at: self.created_at,
        })
    }
}

const SELECT_PACKAGE: &str = "SELECT id, package_name, package_type, duration_days, \
     makkah_hotel, madinah_hotel, makkah_nights, madinah_nights, departure_date, return_date, \
     total_seats, available_seats, package_price, status, airline_id, created_at \
     FROM umrah_packages";

async fn update_package_row<'e, E>(executor: E, package: &UmrahPackage) -> Result<(), sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        "UPDATE umrah_packages SET package_name = $2, package_type = $3, duration_days = $4, \
         makkah_hotel = $5, madinah_hotel = $6, makkah_nights = $7, madinah_nights = $8, \
         departure_date = $9, return_date = $10, total_seats = $11, available_seats = $12, \
         package_price = $13, status = $14, airline_id = $15 \
         WHERE id = $1",
    )
    .bind(package.id)
    .bind(&package.package_name)
    .bind(package.package_type.to_string())
    .bind(package.duration_days)
    .bind(&package.makkah_hotel)
    .bind(&package.madinah_hotel)
    .bind(package.makkah_nights)
    .bind(package.madinah_nights)
    .bind(package.departure_date)
    .bind(package.return_date)
    .bind(package.total_seats)
    .bind(package.available_seats)
    .bind(package.package_price)
    .bind(package.status.to_string())
    .bind(package.airline_id)
    .execute(executor)
    .await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct GroupBookingRow {
    id: Uuid,
    package_id: Uuid,
    group_leader_name: String,
    group_leader_phone: String,
    group_leader_email: String,
    number_of_pilgrims: i32,
    total_amount: i64,
    booking_reference: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl GroupBookingRow {
    fn into_booking(self) -> Result<UmrahBooking, RepoError> {
        let status = self
            .status
            .parse::<GroupBookingStatus>()
            .map_err(|_| format!("unknown group booking status: {}", self.status))?;
        Ok(UmrahBooking {
            id: self.id,
            package_id: self.package_id,
            group_leader: GroupLeader {
                name: self.group_leader_name,
                phone: Masked(self.group_leader_phone),
                email: self.group_leader_email,
            },
            number_of_pilgrims: self.number_of_pilgrims,
            total_amount: self.total_amount,
            booking_reference: self.booking_reference,
            status,
            created_at: self.created_at,
        })
    }
}

const SELECT_GROUP_BOOKING: &str = "SELECT id, package_id, group_leader_name, \
     group_leader_phone, group_leader_email, number_of_pilgrims, total_amount, \
     booking_reference, status, created_at FROM umrah_bookings";

async fn insert_group_booking<'e, E>(
    executor: E,
    booking: &UmrahBooking,
) -> Result<(), sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO umrah_bookings (id, package_id, group_leader_name, group_leader_phone, \
         group_leader_email, number_of_pilgrims, total_amount, booking_reference, status, \
         created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(booking.id)
    .bind(booking.package_id)
    .bind(&booking.group_leader.name)
    .bind(&booking.group_leader.phone.0)
    .bind(&booking.group_leader.email)
    .bind(booking.number_of_pilgrims)
    .bind(booking.total_amount)
    .bind(&booking.booking_reference)
    .bind(booking.status.to_string())
    .bind(booking.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

async fn update_group_booking_row<'e, E>(
    executor: E,
    booking: &UmrahBooking,
) -> Result<(), sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        "UPDATE umrah_bookings SET group_leader_name = $2, group_leader_phone = $3, \
         group_leader_email = $4, number_of_pilgrims = $5, total_amount = $6, status = $7 \
         WHERE id = $1",
    )
    .bind(booking.id)
    .bind(&booking.group_leader.name)
    .bind(&booking.group_leader.phone.0)
    .bind(&booking.group_leader.email)
    .bind(booking.number_of_pilgrims)
    .bind(booking.total_amount)
    .bind(booking.status.to_string())
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl UmrahRepository for PgStore {
    async fn list_packages(&self) -> Result<Vec<UmrahPackage>, RepoError> {
        let rows: Vec<PackageRow> =
            sqlx::query_as(&format!("{SELECT_PACKAGE} ORDER BY departure_date"))
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(PackageRow::into_package).collect()
    }

    async fn get_package(&self, id: Uuid) -> Result<Option<UmrahPackage>, RepoError> {
        let row: Option<PackageRow> = sqlx::query_as(&format!("{SELECT_PACKAGE} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(PackageRow::into_package).transpose()
    }

    async fn create_package(&self, package: &UmrahPackage) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO umrah_packages (id, package_name, package_type, duration_days, \
             makkah_hotel, madinah_hotel, makkah_nights, madinah_nights, departure_date, \
             return_date, total_seats, available_seats, package_price, status, airline_id, \
             created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(package.id)
        .bind(&package.package_name)
        .bind(package.package_type.to_string())
        .bind(package.duration_days)
        .bind(&package.makkah_hotel)
        .bind(&package.madinah_hotel)
        .bind(package.makkah_nights)
        .bind(package.madinah_nights)
        .bind(package.departure_date)
        .bind(package.return_date)
        .bind(package.total_seats)
        .bind(package.available_seats)
        .bind(package.package_price)
        .bind(package.status.to_string())
        .bind(package.airline_id)
        .bind(package.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_package(&self, package: &UmrahPackage) -> Result<(), RepoError> {
        update_package_row(&self.pool, package).await?;
        Ok(())
    }

    async fn list_group_bookings(&self) -> Result<Vec<UmrahBooking>, RepoError> {
        let rows: Vec<GroupBookingRow> = sqlx::query_as(SELECT_GROUP_BOOKING)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(GroupBookingRow::into_booking).collect()
    }

    async fn get_group_booking(&self, id: Uuid) -> Result<Option<UmrahBooking>, RepoError> {
        let row: Option<GroupBookingRow> =
            sqlx::query_as(&format!("{SELECT_GROUP_BOOKING} WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(GroupBookingRow::into_booking).transpose()
    }

    async fn create_group_booking(
        &self,
        booking: &UmrahBooking,
        package: &UmrahPackage,
    ) -> Result<(), RepoError> {
        // Group booking and the pilgrim seat hold commit together.
        let mut tx = self.pool.begin().await?;
        insert_group_booking(&mut *tx, booking).await?;
        update_package_row(&mut *tx, package).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_group_booking(
        &self,
        booking: &UmrahBooking,
        package: &UmrahPackage,
    ) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;
        update_group_booking_row(&mut *tx, booking).await?;
        update_package_row(&mut *tx, package).await?;
        tx.commit().await?;
        Ok(())
    }
}
