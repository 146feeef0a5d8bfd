use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted audit trail entry. Every state change in the back office
/// (booking created, sale confirmed, lock expired...) lands here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl ActivityLog {
    pub fn record(
        user_id: Uuid,
        action: &str,
        description: String,
        booking_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            action: action.to_string(),
            description,
            booking_id,
            created_at: Utc::now(),
        }
    }

    /// Wire event for the live feed, mirroring the stored entry.
    pub fn event(&self) -> ActivityEvent {
        ActivityEvent {
            id: self.id,
            user_id: self.user_id,
            action: self.action.clone(),
            description: self.description.clone(),
            booking_id: self.booking_id,
            occurred_at: self.created_at.timestamp(),
        }
    }
}

/// Broadcast payload pushed to SSE subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub description: String,
    pub booking_id: Option<Uuid>,
    pub occurred_at: i64,
}

/// Query parameters accepted by the activity log listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityFilter {
    pub user_id: Option<Uuid>,
    pub action: Option<String>,
    pub limit: Option<usize>,
}
