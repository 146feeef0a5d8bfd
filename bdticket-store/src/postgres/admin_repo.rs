use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use bdticket_core::auth::{Role, User, UserStatus};
use bdticket_core::repository::{ActivityLogRepository, SettingsRepository, UserRepository};
use bdticket_shared::{ActivityFilter, ActivityLog, SettingsDocument};

use super::{PgStore, RepoError};

#[derive(sqlx::FromRow)]
struct ActivityRow {
    id: Uuid,
    user_id: Uuid,
    action: String,
    description: String,
    booking_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl ActivityRow {
    fn into_log(self) -> ActivityLog {
        ActivityLog {
            id: self.id,
            user_id: self.user_id,
            action: self.action,
            description: self.description,
            booking_id: self.booking_id,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
impl ActivityLogRepository for PgStore {
    async fn list_activity(&self, filter: &ActivityFilter) -> Result<Vec<ActivityLog>, RepoError> {
        // LIMIT NULL means no limit, so the optional cap binds directly.
        let limit = filter.limit.map(|l| l as i64);
        let rows: Vec<ActivityRow> = sqlx::query_as(
            "SELECT id, user_id, action, description, booking_id, created_at \
             FROM activity_logs \
             WHERE ($1::uuid IS NULL OR user_id = $1) \
               AND ($2::text IS NULL OR action = $2) \
             ORDER BY created_at DESC LIMIT $3",
        )
        .bind(filter.user_id)
        .bind(&filter.action)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ActivityRow::into_log).collect())
    }

    async fn record_activity(&self, entry: &ActivityLog) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO activity_logs (id, user_id, action, description, booking_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(&entry.description)
        .bind(entry.booking_id)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    name: String,
    email: String,
    role: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepoError> {
        let role = self.role.parse::<Role>()?;
        let status = self.status.parse::<UserStatus>()?;
        Ok(User {
            id: self.id,
            username: self.username,
            name: self.name,
            email: self.email,
            role,
            status,
            created_at: self.created_at,
        })
    }
}

const SELECT_USER: &str =
    "SELECT id, username, name, email, role, status, created_at FROM users";

#[async_trait]
impl UserRepository for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE username = $1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.map(UserRow::into_user).transpose()
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(UserRow::into_user).transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!("{SELECT_USER} ORDER BY username"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(UserRow::into_user).collect()
    }
}

#[async_trait]
impl SettingsRepository for PgStore {
    async fn load_settings(&self) -> Result<SettingsDocument, RepoError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT data FROM app_settings WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;
        match row {
            Some((data,)) => Ok(serde_json::from_value(data)?),
            None => Ok(SettingsDocument::default()),
        }
    }

    async fn save_settings(&self, settings: &SettingsDocument) -> Result<(), RepoError> {
        let data = serde_json::to_value(settings)?;
        sqlx::query(
            "INSERT INTO app_settings (id, data) VALUES (1, $1) \
             ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()",
        )
        .bind(data)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
