use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{GroupBookingStatus, GroupLeader, PackageStatus, UmrahBooking, UmrahPackage};

#[derive(Debug, thiserror::Error)]
pub enum UmrahError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Package is not open for bookings")]
    PackageInactive,

    #[error("Group size {0} must be at least 1")]
    InvalidGroupSize(i32),

    #[error("Group of {requested} exceeds the {available} seats left")]
    InsufficientSeats { requested: i32, available: i32 },

    #[error("Cannot change a {from} booking to {to}")]
    InvalidTransition {
        from: GroupBookingStatus,
        to: GroupBookingStatus,
    },
}

impl UmrahPackage {
    /// Take pilgrim seats for a new group. Fails without touching the
    /// package when it is inactive or the group does not fit.
    pub fn reserve_pilgrims(&mut self, pilgrims: i32) -> Result<(), UmrahError> {
        if self.status != PackageStatus::Active {
            return Err(UmrahError::PackageInactive);
        }
        if pilgrims < 1 {
            return Err(UmrahError::InvalidGroupSize(pilgrims));
        }
        if pilgrims > self.available_seats {
            return Err(UmrahError::InsufficientSeats {
                requested: pilgrims,
                available: self.available_seats,
            });
        }
        self.available_seats -= pilgrims;
        Ok(())
    }

    /// Return a cancelled group's seats, capped at capacity.
    pub fn release_pilgrims(&mut self, pilgrims: i32) {
        self.available_seats = (self.available_seats + pilgrims.max(0)).min(self.total_seats);
    }
}

/// Payload for booking a group onto a package. The total is priced
/// server side from the package rate.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGroupBooking {
    pub package_id: Uuid,
    pub group_leader: GroupLeader,
    pub number_of_pilgrims: i32,
}

impl NewGroupBooking {
    pub fn build(
        self,
        package: &mut UmrahPackage,
        reference: String,
        now: DateTime<Utc>,
    ) -> Result<UmrahBooking, UmrahError> {
        let blank = [
            &self.group_leader.name,
            &self.group_leader.phone.0,
            &self.group_leader.email,
        ]
        .iter()
        .any(|field| field.trim().is_empty());
        if blank {
            return Err(UmrahError::MissingFields);
        }

        package.reserve_pilgrims(self.number_of_pilgrims)?;

        Ok(UmrahBooking {
            id: Uuid::new_v4(),
            package_id: package.id,
            group_leader: self.group_leader,
            number_of_pilgrims: self.number_of_pilgrims,
            total_amount: package.package_price * self.number_of_pilgrims as i64,
            booking_reference: reference,
            status: GroupBookingStatus::Pending,
            created_at: now,
        })
    }
}

/// References carry the last six digits of the booking timestamp,
/// e.g. UMH-493817.
pub fn booking_reference(now: DateTime<Utc>) -> String {
    format!("UMH-{:06}", now.timestamp_millis() % 1_000_000)
}

/// Move a group booking to a new status. Returns true when the
/// group's seats go back to the package. Same-state updates are
/// accepted and change nothing; a cancelled group is final.
pub fn apply_group_transition(
    booking: &mut UmrahBooking,
    to: GroupBookingStatus,
) -> Result<bool, UmrahError> {
    if booking.status == to {
        return Ok(false);
    }

    let releases = match (booking.status, to) {
        (GroupBookingStatus::Pending, GroupBookingStatus::Confirmed) => false,
        (GroupBookingStatus::Pending, GroupBookingStatus::Cancelled) => true,
        (GroupBookingStatus::Confirmed, GroupBookingStatus::Cancelled) => true,
        (from, to) => return Err(UmrahError::InvalidTransition { from, to }),
    };

    booking.status = to;
    Ok(releases)
}

#[cfg(test)]
pub fn test_group_booking(package_id: Uuid, reference: &str) -> UmrahBooking {
    use bdticket_shared::Masked;

    UmrahBooking {
        id: Uuid::new_v4(),
        package_id,
        group_leader: GroupLeader {
            name: "Sheikh Ahmed".to_string(),
            phone: Masked("+880171234567".to_string()),
            email: "sheikh@example.com".to_string(),
        },
        number_of_pilgrims: 25,
        total_amount: 2_125_000,
        booking_reference: reference.to_string(),
        status: GroupBookingStatus::Pending,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::test_package;
    use bdticket_shared::Masked;

    fn group_of(package_id: Uuid, pilgrims: i32) -> NewGroupBooking {
        NewGroupBooking {
            package_id,
            group_leader: GroupLeader {
                name: "Sheikh Ahmed".to_string(),
                phone: Masked("+880171234567".to_string()),
                email: "sheikh@example.com".to_string(),
            },
            number_of_pilgrims: pilgrims,
        }
    }

    #[test]
    fn group_booking_takes_seats_and_prices_the_total() {
        let mut package = test_package("Standard Umrah 2025");

        let booking = group_of(package.id, 25)
            .build(&mut package, booking_reference(Utc::now()), Utc::now())
            .unwrap();

        assert_eq!(package.available_seats, 5);
        assert_eq!(booking.total_amount, 25 * 85_000);
        assert_eq!(booking.status, GroupBookingStatus::Pending);
        assert!(booking.booking_reference.starts_with("UMH-"));
        assert_eq!(booking.booking_reference.len(), "UMH-".len() + 6);
    }

    #[test]
    fn oversized_group_is_rejected_without_taking_seats() {
        let mut package = test_package("Standard Umrah 2025");
        package.available_seats = 10;

        let err = group_of(package.id, 11)
            .build(&mut package, booking_reference(Utc::now()), Utc::now())
            .unwrap_err();

        assert!(matches!(
            err,
            UmrahError::InsufficientSeats {
                requested: 11,
                available: 10
            }
        ));
        assert_eq!(package.available_seats, 10);
    }

    #[test]
    fn inactive_package_takes_no_groups() {
        let mut package = test_package("Standard Umrah 2024");
        package.status = PackageStatus::Inactive;

        let err = group_of(package.id, 5)
            .build(&mut package, booking_reference(Utc::now()), Utc::now())
            .unwrap_err();
        assert!(matches!(err, UmrahError::PackageInactive));
    }

    #[test]
    fn blank_leader_contact_is_rejected() {
        let mut package = test_package("Standard Umrah 2025");
        let mut group = group_of(package.id, 5);
        group.group_leader.email = String::new();

        let err = group
            .build(&mut package, booking_reference(Utc::now()), Utc::now())
            .unwrap_err();
        assert!(matches!(err, UmrahError::MissingFields));
        assert_eq!(package.available_seats, 30);
    }

    #[test]
    fn cancelling_returns_pilgrim_seats() {
        let mut package = test_package("Standard Umrah 2025");
        let mut booking = group_of(package.id, 25)
            .build(&mut package, booking_reference(Utc::now()), Utc::now())
            .unwrap();
        assert_eq!(package.available_seats, 5);

        let releases = apply_group_transition(&mut booking, GroupBookingStatus::Cancelled).unwrap();
        assert!(releases);
        package.release_pilgrims(booking.number_of_pilgrims);
        assert_eq!(package.available_seats, 30);
    }

    #[test]
    fn confirm_is_guarded_and_idempotent() {
        let mut booking = test_group_booking(Uuid::new_v4(), "UMH-000001");

        assert!(!apply_group_transition(&mut booking, GroupBookingStatus::Confirmed).unwrap());
        assert_eq!(booking.status, GroupBookingStatus::Confirmed);

        // Same-state update is a no-op.
        assert!(!apply_group_transition(&mut booking, GroupBookingStatus::Confirmed).unwrap());

        let err = apply_group_transition(&mut booking, GroupBookingStatus::Pending).unwrap_err();
        assert!(matches!(err, UmrahError::InvalidTransition { .. }));
    }
}
