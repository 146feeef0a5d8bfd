use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use bdticket_core::auth::perm;
use bdticket_shared::settings::SettingsError;

use crate::{error::ApiError, middleware::Claims, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/settings", get(get_settings).put(update_settings))
}

#[derive(Debug, Deserialize)]
struct SettingsQuery {
    section: Option<String>,
}

/// GET /v1/settings?section=
/// Without a section the whole document comes back. `section=users`
/// is a read-only composite served from the user table rather than
/// the settings document.
async fn get_settings(
    State(state): State<AppState>,
    Query(query): Query<SettingsQuery>,
) -> Result<Json<Value>, ApiError> {
    let document = state.settings.load_settings().await?;

    let payload = match query.section.as_deref() {
        None => serde_json::to_value(&document)?,
        Some("users") => {
            let users = state.users.list_users().await?;
            json!({ "users": users })
        }
        Some(section) => document
            .section(section)
            .ok_or_else(|| ApiError::BadRequest("Invalid section".to_string()))?,
    };

    Ok(Json(payload))
}

#[derive(Debug, Deserialize)]
struct UpdateSettings {
    section: String,
    data: Value,
}

/// PUT /v1/settings with `{section, data}`. The patch is shallow-merged
/// into the named section and the merged section is echoed back.
async fn update_settings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateSettings>,
) -> Result<Json<Value>, ApiError> {
    claims.require(perm::SYSTEM_SETTINGS)?;

    let mut document = state.settings.load_settings().await?;
    let merged = document
        .merge_section(&req.section, &req.data)
        .map_err(|err| match err {
            SettingsError::UnknownSection => ApiError::BadRequest("Invalid section".to_string()),
            SettingsError::InvalidData(e) => {
                ApiError::BadRequest(format!("Invalid settings data: {}", e))
            }
        })?;
    state.settings.save_settings(&document).await?;

    tracing::info!("Settings section {} updated by {}", req.section, claims.username);

    Ok(Json(json!({
        "success": true,
        "message": "Settings updated successfully",
        req.section: merged,
    })))
}
