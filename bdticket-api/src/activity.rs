use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Extension, Json, Router,
};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use bdticket_shared::activity::{ActivityFilter, ActivityLog};

use crate::{error::ApiError, middleware::Claims, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/activity-logs", get(list_activity).post(record_activity))
        .route("/v1/activity/stream", get(stream_activity))
}

/// GET /v1/activity-logs?user_id=&action=&limit=
/// Newest first. Without an explicit limit the feed is capped at 50.
async fn list_activity(
    State(state): State<AppState>,
    Query(mut filter): Query<ActivityFilter>,
) -> Result<Json<Vec<ActivityLog>>, ApiError> {
    filter.limit = Some(filter.limit.unwrap_or(50));
    let entries = state.activity.list_activity(&filter).await?;
    Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
struct NewActivity {
    action: String,
    description: String,
    booking_id: Option<Uuid>,
}

/// POST /v1/activity-logs
/// Manual audit entry, recorded under the caller's id and pushed to
/// live subscribers like any other event.
async fn record_activity(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<NewActivity>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if req.action.trim().is_empty() || req.description.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }

    let entry = ActivityLog::record(claims.sub, &req.action, req.description, req.booking_id);
    state.activity.record_activity(&entry).await?;
    let _ = state.events_tx.send(entry.event());

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "activity": entry })),
    ))
}

/// GET /v1/activity/stream
/// Server-sent events feed of audit entries as they are recorded.
async fn stream_activity(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.events_tx.subscribe()).filter_map(|event| async move {
        match event {
            Ok(event) => Event::default()
                .event("activity")
                .json_data(&event)
                .ok()
                .map(Ok),
            // A lagged subscriber skips ahead instead of tearing down.
            Err(_) => None,
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
