use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;

use bdticket_booking::finance::{dashboard_stats, DashboardStats};

use crate::{error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/dashboard/stats", get(stats))
}

/// GET /v1/dashboard/stats
async fn stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, ApiError> {
    let bookings = state.bookings.list_bookings().await?;
    let tickets = state.tickets.list_tickets().await?;
    let today = Utc::now().date_naive();
    Ok(Json(dashboard_stats(&bookings, &tickets, today)))
}
