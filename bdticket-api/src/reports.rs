use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use bdticket_booking::finance::{inventory_report, profit_report, sales_report};
use bdticket_core::auth::perm;

use crate::{error::ApiError, middleware::Claims, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/reports", get(build_report))
}

#[derive(Debug, Deserialize)]
struct ReportQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// GET /v1/reports?type=sales|inventory|profit
/// Every report is `{data, summary}`, computed live from bookings and
/// inventory. The profit report exposes buying prices, so it sits
/// behind `view_profit`.
async fn build_report(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Value>, ApiError> {
    let kind = query.kind.as_deref().unwrap_or_default();

    let payload = match kind {
        "sales" => {
            let bookings = state.bookings.list_bookings().await?;
            let tickets = state.tickets.list_tickets().await?;
            let airlines = state.airlines.list_airlines().await?;
            serde_json::to_value(sales_report(&bookings, &tickets, &airlines))?
        }
        "inventory" => {
            let tickets = state.tickets.list_tickets().await?;
            let airlines = state.airlines.list_airlines().await?;
            serde_json::to_value(inventory_report(&tickets, &airlines))?
        }
        "profit" => {
            claims.require(perm::VIEW_PROFIT)?;
            let bookings = state.bookings.list_bookings().await?;
            let tickets = state.tickets.list_tickets().await?;
            let airlines = state.airlines.list_airlines().await?;
            serde_json::to_value(profit_report(&bookings, &tickets, &airlines))?
        }
        _ => return Err(ApiError::BadRequest("Invalid report type".to_string())),
    };

    Ok(Json(payload))
}
