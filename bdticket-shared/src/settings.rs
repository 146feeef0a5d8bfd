use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sectioned settings document backing the admin settings screens.
/// Sections are merged shallowly on update, so a PUT only needs to
/// carry the keys it wants to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsDocument {
    pub system: SystemSettings,
    pub notifications: NotificationSettings,
    pub business: BusinessSettings,
    pub integrations: IntegrationSettings,
    pub backup: BackupSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSettings {
    pub company_name: String,
    pub company_email: String,
    pub timezone: String,
    pub currency: String,
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub booking_confirmation: bool,
    pub payment_reminder: bool,
    pub ticket_expiry: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessSettings {
    pub profit_margin_percentage: f64,
    pub lock_duration_minutes: i64,
    pub auto_confirm_bookings: bool,
    pub require_payment_confirmation: bool,
    pub tax_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationSettings {
    pub database: Integration,
    pub sms: Integration,
    pub email: Integration,
    pub payment: Integration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupSettings {
    pub last_backup: Option<DateTime<Utc>>,
    pub auto_backup: bool,
    pub backup_frequency: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Invalid section")]
    UnknownSection,

    #[error("Invalid settings data: {0}")]
    InvalidData(#[from] serde_json::Error),
}

impl SettingsDocument {
    pub const SECTIONS: [&'static str; 5] =
        ["system", "notifications", "business", "integrations", "backup"];

    /// Read one section as JSON. `None` means the section does not exist.
    pub fn section(&self, name: &str) -> Option<Value> {
        match name {
            "system" => serde_json::to_value(&self.system).ok(),
            "notifications" => serde_json::to_value(&self.notifications).ok(),
            "business" => serde_json::to_value(&self.business).ok(),
            "integrations" => serde_json::to_value(&self.integrations).ok(),
            "backup" => serde_json::to_value(&self.backup).ok(),
            _ => None,
        }
    }

    /// Shallow-merge `patch` into a section and return the merged section.
    /// Unknown keys in the patch are rejected by deserialization; unknown
    /// sections are rejected up front.
    pub fn merge_section(&mut self, name: &str, patch: &Value) -> Result<Value, SettingsError> {
        let mut current = self.section(name).ok_or(SettingsError::UnknownSection)?;

        if let (Some(target), Some(changes)) = (current.as_object_mut(), patch.as_object()) {
            for (key, value) in changes {
                target.insert(key.clone(), value.clone());
            }
        }

        match name {
            "system" => self.system = serde_json::from_value(current.clone())?,
            "notifications" => self.notifications = serde_json::from_value(current.clone())?,
            "business" => self.business = serde_json::from_value(current.clone())?,
            "integrations" => self.integrations = serde_json::from_value(current.clone())?,
            "backup" => self.backup = serde_json::from_value(current.clone())?,
            _ => return Err(SettingsError::UnknownSection),
        }

        Ok(current)
    }
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self {
            system: SystemSettings {
                company_name: "TravelHub Tickets".to_string(),
                company_email: "info@travelhub.com".to_string(),
                timezone: "Asia/Dhaka".to_string(),
                currency: "BDT".to_string(),
                language: "en".to_string(),
            },
            notifications: NotificationSettings {
                email_notifications: true,
                sms_notifications: true,
                booking_confirmation: true,
                payment_reminder: true,
                ticket_expiry: true,
            },
            business: BusinessSettings {
                profit_margin_percentage: 18.5,
                lock_duration_minutes: 30,
                auto_confirm_bookings: true,
                require_payment_confirmation: true,
                tax_percentage: 15.0,
            },
            integrations: IntegrationSettings {
                database: Integration {
                    enabled: false,
                    provider: None,
                    status: "not_configured".to_string(),
                },
                sms: Integration {
                    enabled: true,
                    provider: Some("twilio".to_string()),
                    status: "active".to_string(),
                },
                email: Integration {
                    enabled: true,
                    provider: Some("sendgrid".to_string()),
                    status: "active".to_string(),
                },
                payment: Integration {
                    enabled: true,
                    provider: Some("stripe".to_string()),
                    status: "active".to_string(),
                },
            },
            backup: BackupSettings {
                last_backup: Some(Utc::now() - Duration::hours(24)),
                auto_backup: true,
                backup_frequency: "daily".to_string(),
            },
        }
    }
}
