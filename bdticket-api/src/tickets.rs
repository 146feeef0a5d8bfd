use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use bdticket_core::auth::perm;
use bdticket_inventory::{
    sort_by_departure, BulkIntake, NewTicket, Ticket, TicketFilter, TicketStatus,
};

use crate::{error::ApiError, middleware::Claims, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tickets", get(list_tickets).post(create_ticket))
        .route("/v1/tickets/bulk", post(bulk_intake))
        .route(
            "/v1/tickets/{id}",
            get(get_ticket).patch(update_ticket).delete(delete_ticket),
        )
}

/// Buying prices are the agency's margin secret; only roles holding
/// `view_buying_price` see them on the wire.
fn ticket_payload(ticket: &Ticket, claims: &Claims) -> Result<Value, ApiError> {
    let mut value = serde_json::to_value(ticket)?;
    if !claims.has(perm::VIEW_BUYING_PRICE) {
        if let Some(map) = value.as_object_mut() {
            map.remove("buying_price");
        }
    }
    Ok(value)
}

/// GET /v1/tickets
/// Listing with substring search, status and destination filters,
/// soonest departure first.
async fn list_tickets(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(filter): Query<TicketFilter>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let mut tickets = state.tickets.list_tickets().await?;
    let countries = state.countries.list_countries().await?;

    sort_by_departure(&mut tickets);

    let mut payload = Vec::new();
    for ticket in &tickets {
        let code = countries
            .iter()
            .find(|c| c.id == ticket.country_id)
            .map(|c| c.code.as_str());
        if filter.matches(ticket, code) {
            payload.push(ticket_payload(ticket, &claims)?);
        }
    }

    Ok(Json(payload))
}

/// POST /v1/tickets
async fn create_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<NewTicket>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    claims.require(perm::CREATE_BATCHES)?;

    let ticket = req
        .build(claims.sub, Utc::now())
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    state.tickets.create_ticket(&ticket).await?;

    tracing::info!("Ticket batch {} created", ticket.batch_number);
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// POST /v1/tickets/bulk
/// Batch intake: expands a purchase into one single-seat ticket per
/// physical seat, all sharing a batch number.
async fn bulk_intake(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<BulkIntake>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    claims.require(perm::CREATE_BATCHES)?;

    let tickets = req
        .expand(claims.sub, Utc::now())
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    state.tickets.create_tickets(&tickets).await?;

    tracing::info!(
        "Bulk intake of {} tickets in batch {}",
        tickets.len(),
        tickets[0].batch_number
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "count": tickets.len(),
            "tickets": tickets,
        })),
    ))
}

/// GET /v1/tickets/:id
async fn get_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let ticket = state
        .tickets
        .get_ticket(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;
    Ok(Json(ticket_payload(&ticket, &claims)?))
}

#[derive(Debug, Deserialize)]
struct UpdateTicket {
    buying_price: Option<i64>,
    selling_price: Option<i64>,
    status: Option<TicketStatus>,
    departure_date: Option<NaiveDate>,
    departure_time: Option<String>,
    arrival_time: Option<String>,
    notes: Option<String>,
}

/// PATCH /v1/tickets/:id
async fn update_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTicket>,
) -> Result<Json<Ticket>, ApiError> {
    claims.require(perm::EDIT_BATCHES)?;

    let mut ticket = state
        .tickets
        .get_ticket(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    if let Some(buying_price) = req.buying_price {
        ticket.buying_price = buying_price;
    }
    if let Some(selling_price) = req.selling_price {
        ticket.selling_price = selling_price;
    }
    if let Some(status) = req.status {
        ticket.status = status;
    }
    if let Some(departure_date) = req.departure_date {
        ticket.departure_date = departure_date;
    }
    if let Some(departure_time) = req.departure_time {
        ticket.departure_time = departure_time;
    }
    if let Some(arrival_time) = req.arrival_time {
        ticket.arrival_time = Some(arrival_time);
    }
    if let Some(notes) = req.notes {
        ticket.notes = Some(notes);
    }
    ticket.updated_at = Utc::now();

    state.tickets.update_ticket(&ticket).await?;
    Ok(Json(ticket))
}

/// DELETE /v1/tickets/:id
/// Refused while any pending or confirmed booking still references
/// the batch.
async fn delete_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    claims.require(perm::DELETE_BATCHES)?;

    if state.bookings.has_active_for_ticket(id).await? {
        return Err(ApiError::Conflict(
            "Ticket has active bookings".to_string(),
        ));
    }

    let deleted = state.tickets.delete_ticket(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Ticket not found".to_string()));
    }

    tracing::info!("Ticket {} deleted", id);
    Ok(Json(json!({ "success": true })))
}
