use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

/// Permission names checked by the API layer. The strings travel in
/// responses so the front end can gate its controls with the same
/// vocabulary.
pub mod perm {
    pub const VIEW_BUYING_PRICE: &str = "view_buying_price";
    pub const EDIT_BATCHES: &str = "edit_batches";
    pub const DELETE_BATCHES: &str = "delete_batches";
    pub const CREATE_BATCHES: &str = "create_batches";
    pub const VIEW_PROFIT: &str = "view_profit";
    pub const OVERRIDE_LOCKS: &str = "override_locks";
    pub const MANAGE_USERS: &str = "manage_users";
    pub const VIEW_ALL_BOOKINGS: &str = "view_all_bookings";
    pub const CONFIRM_SALES: &str = "confirm_sales";
    pub const SYSTEM_SETTINGS: &str = "system_settings";
    pub const VIEW_TICKETS: &str = "view_tickets";
    pub const CREATE_BOOKINGS: &str = "create_bookings";
    pub const PARTIAL_PAYMENTS: &str = "partial_payments";
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Staff,
}

impl Role {
    /// The access matrix. Admin is not a superset: batch management
    /// and settings are admin-only, while booking creation belongs to
    /// the selling roles.
    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            Role::Admin => &[
                perm::VIEW_BUYING_PRICE,
                perm::EDIT_BATCHES,
                perm::DELETE_BATCHES,
                perm::CREATE_BATCHES,
                perm::VIEW_PROFIT,
                perm::OVERRIDE_LOCKS,
                perm::MANAGE_USERS,
                perm::VIEW_ALL_BOOKINGS,
                perm::CONFIRM_SALES,
                perm::SYSTEM_SETTINGS,
            ],
            Role::Manager => &[
                perm::VIEW_TICKETS,
                perm::CREATE_BOOKINGS,
                perm::CONFIRM_SALES,
                perm::VIEW_ALL_BOOKINGS,
            ],
            Role::Staff => &[
                perm::VIEW_TICKETS,
                perm::CREATE_BOOKINGS,
                perm::PARTIAL_PAYMENTS,
            ],
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions().contains(&permission)
    }

    pub fn require(&self, permission: &str) -> CoreResult<()> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied(permission.to_string()))
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Manager => write!(f, "manager"),
            Role::Staff => write!(f, "staff"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            other => Err(CoreError::ValidationError(format!(
                "unknown role: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            other => Err(CoreError::ValidationError(format!(
                "unknown user status: {other}"
            ))),
        }
    }
}

/// A back-office user. Passwords are not stored; the demo credential
/// rule lives in the login handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn admin_is_not_a_superset() {
        assert!(Role::Admin.has_permission(perm::VIEW_BUYING_PRICE));
        assert!(Role::Admin.has_permission(perm::SYSTEM_SETTINGS));
        assert!(!Role::Admin.has_permission(perm::CREATE_BOOKINGS));

        assert!(Role::Manager.has_permission(perm::CONFIRM_SALES));
        assert!(!Role::Manager.has_permission(perm::VIEW_BUYING_PRICE));

        assert!(Role::Staff.has_permission(perm::PARTIAL_PAYMENTS));
        assert!(!Role::Staff.has_permission(perm::CONFIRM_SALES));
    }

    #[test]
    fn require_names_the_missing_permission() {
        assert!(Role::Staff.require(perm::CREATE_BOOKINGS).is_ok());

        let err = Role::Staff.require(perm::SYSTEM_SETTINGS).unwrap_err();
        assert!(err.to_string().contains("system_settings"));
    }

    #[test]
    fn roles_parse_from_their_wire_names() {
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("staff").unwrap(), Role::Staff);
        assert!(Role::from_str("root").is_err());
    }
}
