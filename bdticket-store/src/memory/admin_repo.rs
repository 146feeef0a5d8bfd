use async_trait::async_trait;
use uuid::Uuid;

use bdticket_core::auth::User;
use bdticket_core::repository::{ActivityLogRepository, SettingsRepository, UserRepository};
use bdticket_shared::{ActivityFilter, ActivityLog, SettingsDocument};

use super::MemoryStore;

type RepoError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
impl ActivityLogRepository for MemoryStore {
    async fn list_activity(&self, filter: &ActivityFilter) -> Result<Vec<ActivityLog>, RepoError> {
        let tables = self.tables.read().await;
        let mut entries: Vec<ActivityLog> = tables
            .activity
            .iter()
            .filter(|log| filter.user_id.map_or(true, |id| log.user_id == id))
            .filter(|log| {
                filter
                    .action
                    .as_ref()
                    .map_or(true, |action| &log.action == action)
            })
            .cloned()
            .collect();

        // Newest first, then the limit.
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = filter.limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    async fn record_activity(&self, entry: &ActivityLog) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.activity.push(entry.clone());
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.clone())
    }
}

#[async_trait]
impl SettingsRepository for MemoryStore {
    async fn load_settings(&self) -> Result<SettingsDocument, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.settings.clone())
    }

    async fn save_settings(&self, settings: &SettingsDocument) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.settings = settings.clone();
        Ok(())
    }
}
