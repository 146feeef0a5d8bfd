use bdticket_shared::Masked;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Standard,
    Premium,
    Vip,
}

impl std::fmt::Display for PackageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageType::Standard => write!(f, "standard"),
            PackageType::Premium => write!(f, "premium"),
            PackageType::Vip => write!(f, "vip"),
        }
    }
}

impl std::str::FromStr for PackageType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(PackageType::Standard),
            "premium" => Ok(PackageType::Premium),
            "vip" => Ok(PackageType::Vip),
            _ => Err(()),
        }
    }
}

/// Inactive packages stay listed for history but take no new groups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PackageStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageStatus::Active => write!(f, "active"),
            PackageStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for PackageStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PackageStatus::Active),
            "inactive" => Ok(PackageStatus::Inactive),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GroupBookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl std::fmt::Display for GroupBookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupBookingStatus::Pending => write!(f, "pending"),
            GroupBookingStatus::Confirmed => write!(f, "confirmed"),
            GroupBookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for GroupBookingStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(GroupBookingStatus::Pending),
            "confirmed" => Ok(GroupBookingStatus::Confirmed),
            "cancelled" => Ok(GroupBookingStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// A seasonal Umrah package with fixed hotel allocations. Pilgrim
/// seats are tracked on the package the way ticket batches track
/// theirs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UmrahPackage {
    pub id: Uuid,
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
    pub available_seats: i32,
    pub package_price: i64,
    pub status: PackageStatus,
    pub airline_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Contact person for a pilgrim group. The phone number is masked in
/// debug output like other traveller contact details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupLeader {
    pub name: String,
    pub phone: Masked<String>,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UmrahBooking {
    pub id: Uuid,
    pub package_id: Uuid,
    pub group_leader: GroupLeader,
    pub number_of_pilgrims: i32,
    pub total_amount: i64,
    pub booking_reference: String,
    pub status: GroupBookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Query parameters accepted by the package listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageFilter {
    pub status: Option<PackageStatus>,
    #[serde(rename = "type")]
    pub package_type: Option<PackageType>,
}

impl PackageFilter {
    pub fn matches(&self, package: &UmrahPackage) -> bool {
        if let Some(status) = self.status {
            if package.status != status {
                return false;
            }
        }
        if let Some(package_type) = self.package_type {
            if package.package_type != package_type {
                return false;
            }
        }
        true
    }
}

/// Query parameters accepted by the group booking listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UmrahBookingFilter {
    pub status: Option<GroupBookingStatus>,
    pub package_id: Option<Uuid>,
}

impl UmrahBookingFilter {
    pub fn matches(&self, booking: &UmrahBooking) -> bool {
        if let Some(status) = self.status {
            if booking.status != status {
                return false;
            }
        }
        if let Some(package_id) = self.package_id {
            if booking.package_id != package_id {
                return false;
            }
        }
        true
    }
}

/// Listing order for group bookings: newest first.
pub fn sort_newest_first(bookings: &mut [UmrahBooking]) {
    bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::test_package;
    use chrono::Duration;

    #[test]
    fn package_filter_by_type_and_status() {
        let mut premium = test_package("Premium Umrah 2025");
        premium.package_type = PackageType::Premium;

        let filter = PackageFilter {
            package_type: Some(PackageType::Premium),
            ..Default::default()
        };
        assert!(filter.matches(&premium));

        premium.status = PackageStatus::Inactive;
        let active_only = PackageFilter {
            status: Some(PackageStatus::Active),
            ..Default::default()
        };
        assert!(!active_only.matches(&premium));
    }

    #[test]
    fn booking_filter_by_package() {
        let package = test_package("Standard Umrah 2025");
        let booking = crate::groups::test_group_booking(package.id, "UMH-000001");

        let same = UmrahBookingFilter {
            package_id: Some(package.id),
            ..Default::default()
        };
        assert!(same.matches(&booking));

        let other = UmrahBookingFilter {
            package_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(!other.matches(&booking));
    }

    #[test]
    fn bookings_sort_newest_first() {
        let package_id = Uuid::new_v4();
        let mut older = crate::groups::test_group_booking(package_id, "UMH-000001");
        older.created_at = Utc::now() - Duration::days(5);
        let newer = crate::groups::test_group_booking(package_id, "UMH-000002");

        let mut bookings = vec![older, newer];
        sort_newest_first(&mut bookings);
        assert_eq!(bookings[0].booking_reference, "UMH-000002");
        assert_eq!(bookings[1].booking_reference, "UMH-000001");
    }
}
