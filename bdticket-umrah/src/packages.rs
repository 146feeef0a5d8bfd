use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{PackageStatus, PackageType, UmrahPackage};

#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Hotel nights {makkah} + {madinah} must add up to {duration} days")]
    NightsMismatch {
        makkah: i32,
        madinah: i32,
        duration: i32,
    },

    #[error("Return date must fall after departure")]
    InvalidDates,

    #[error("Seat count {0} must be at least 1")]
    InvalidSeats(i32),

    #[error("Package price must be positive")]
    InvalidPrice,
}

/// Payload for creating a package. Seats open at full capacity and the
/// package starts active.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPackage {
    pub package_name: String,
    pub package_type: PackageType,
    pub duration_days: i32,
    pub makkah_hotel: String,
    pub madinah_hotel: String,
    pub makkah_nights: i32,
    pub madinah_nights: i32,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub total_seats: i32,
    pub package_price: i64,
    pub airline_id: Uuid,
}

impl NewPackage {
    pub fn build(self, now: DateTime<Utc>) -> Result<UmrahPackage, PackageError> {
        let blank = [
            &self.package_name,
            &self.makkah_hotel,
            &self.madinah_hotel,
        ]
        .iter()
        .any(|field| field.trim().is_empty());
        if blank {
            return Err(PackageError::MissingFields);
        }

        if self.makkah_nights < 0
            || self.madinah_nights < 0
            || self.makkah_nights + self.madinah_nights != self.duration_days
        {
            return Err(PackageError::NightsMismatch {
                makkah: self.makkah_nights,
                madinah: self.madinah_nights,
                duration: self.duration_days,
            });
        }

        if self.return_date <= self.departure_date {
            return Err(PackageError::InvalidDates);
        }

        if self.total_seats < 1 {
            return Err(PackageError::InvalidSeats(self.total_seats));
        }

        if self.package_price <= 0 {
            return Err(PackageError::InvalidPrice);
        }

        Ok(UmrahPackage {
            id: Uuid::new_v4(),
            package_name: self.package_name,
            package_type: self.package_type,
            duration_days: self.duration_days,
            makkah_hotel: self.makkah_hotel,
            madinah_hotel: self.madinah_hotel,
            makkah_nights: self.makkah_nights,
            madinah_nights: self.madinah_nights,
            departure_date: self.departure_date,
            return_date: self.return_date,
            total_seats: self.total_seats,
            available_seats: self.total_seats,
            package_price: self.package_price,
            status: PackageStatus::Active,
            airline_id: self.airline_id,
            created_at: now,
        })
    }
}

#[cfg(test)]
pub fn test_package(name: &str) -> UmrahPackage {
    UmrahPackage {
        id: Uuid::new_v4(),
        package_name: name.to_string(),
        package_type: PackageType::Standard,
        duration_days: 7,
        makkah_hotel: "Al Noor Hotel".to_string(),
        madinah_hotel: "Al Hana Hotel".to_string(),
        makkah_nights: 4,
        madinah_nights: 3,
        departure_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
        return_date: NaiveDate::from_ymd_opt(2025, 10, 8).unwrap(),
        total_seats: 30,
        available_seats: 30,
        package_price: 85_000,
        status: PackageStatus::Active,
        airline_id: Uuid::new_v4(),
        created_at: Utc::now(),
    }
}
