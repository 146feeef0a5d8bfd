//! Umrah package and group booking domain: seasonal packages with
//! Makkah/Madinah hotel allocations and the group bookings sold
//! against their seat quotas.

pub mod groups;
pub mod models;
pub mod packages;

pub use groups::{NewGroupBooking, UmrahError};
pub use models::{
    sort_newest_first, GroupBookingStatus, GroupLeader, PackageFilter, PackageStatus, PackageType,
    UmrahBooking, UmrahBookingFilter, UmrahPackage,
};
pub use packages::{NewPackage, PackageError};
