use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use bdticket_booking::{
    lifecycle::apply_transition, payments, AgentInfo, Booking, BookingFilter, BookingStatus,
    PassengerInfo, PaymentMethod, PaymentType, SeatEffect,
};
use bdticket_core::auth::perm;
use bdticket_inventory::SeatError;
use bdticket_shared::ActivityLog;

use crate::{error::ApiError, middleware::Claims, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", get(list_bookings).post(create_booking))
        .route(
            "/v1/bookings/{id}",
            get(get_booking).patch(update_booking).delete(cancel_booking),
        )
}

/// GET /v1/bookings
async fn list_bookings(
    State(state): State<AppState>,
    Query(filter): Query<BookingFilter>,
) -> Result<Json<Value>, ApiError> {
    let mut bookings = state.bookings.list_bookings().await?;
    bookings.retain(|b| filter.matches(b));
    bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(json!({ "bookings": bookings })))
}

#[derive(Debug, Deserialize)]
struct CreateBooking {
    ticket_id: Uuid,
    agent: AgentInfo,
    passenger: PassengerInfo,
    selling_price: i64,
    payment_type: PaymentType,
    partial_amount: Option<i64>,
    payment_method: PaymentMethod,
    comments: Option<String>,
}

impl CreateBooking {
    fn check_required(&self) -> Result<(), ApiError> {
        let required = [
            self.agent.name.as_str(),
            self.agent.phone.as_str(),
            self.passenger.name.as_str(),
            self.passenger.passport_no.0.as_str(),
            self.passenger.phone.0.as_str(),
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(ApiError::BadRequest("Missing required fields".to_string()));
        }
        Ok(())
    }
}

/// POST /v1/bookings
/// Takes seats off the ticket batch and holds them for the configured
/// lock window. The first payment row (full amount, or the advance) is
/// recorded in the same request.
async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateBooking>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    claims.require(perm::CREATE_BOOKINGS)?;
    req.check_required()?;

    if req.payment_type == PaymentType::Partial {
        claims.require(perm::PARTIAL_PAYMENTS)?;
    }
    payments::validate_payment(req.payment_type, req.partial_amount, req.selling_price)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let mut ticket = state
        .tickets
        .get_ticket(req.ticket_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    let settings = state.settings.load_settings().await?;
    let hold_until = Utc::now() + Duration::minutes(settings.business.lock_duration_minutes);
    ticket
        .reserve_seats(req.passenger.pax_count, hold_until)
        .map_err(|e| match e {
            SeatError::InvalidQuantity(_) => ApiError::BadRequest(e.to_string()),
            _ => ApiError::Conflict(e.to_string()),
        })?;

    let reference = format!("BK{:03}", state.bookings.count_bookings().await? + 1);
    let booking = Booking::new(
        reference,
        req.ticket_id,
        req.agent,
        req.passenger,
        req.selling_price,
        req.payment_type,
        req.partial_amount,
        req.payment_method,
        req.comments,
        claims.sub,
    );

    let transaction_id = payments::transaction_id(state.payments.count_payments().await? + 1);
    let payment = payments::initial_payment(&booking, transaction_id, claims.sub);

    state.bookings.create_booking(&booking, &ticket).await?;
    state.payments.create_payment(&payment).await?;

    let entry = ActivityLog::record(
        claims.sub,
        "booking_created",
        format!(
            "New booking {} for {}",
            booking.reference, booking.passenger.name
        ),
        Some(booking.id),
    );
    state.activity.record_activity(&entry).await?;
    let _ = state.events_tx.send(entry.event());

    state.metrics.bookings_created.inc();
    tracing::info!("Booking {} created against ticket {}", booking.reference, ticket.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "booking": booking })),
    ))
}

/// GET /v1/bookings/:id
async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state
        .bookings
        .get_booking(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;
    Ok(Json(booking))
}

#[derive(Debug, Deserialize)]
struct UpdateBooking {
    status: BookingStatus,
}

/// PATCH /v1/bookings/:id
async fn update_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBooking>,
) -> Result<Json<Booking>, ApiError> {
    let booking = transition(&state, &claims, id, req.status).await?;
    Ok(Json(booking))
}

/// DELETE /v1/bookings/:id
/// Cancels; bookings are never hard-deleted.
async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let booking = transition(&state, &claims, id, BookingStatus::Cancelled).await?;
    Ok(Json(json!({ "success": true, "booking": booking })))
}

/// Guarded status change with its seat ledger side effect. Confirming
/// needs `confirm_sales`; the rest only needs a valid session.
async fn transition(
    state: &AppState,
    claims: &Claims,
    id: Uuid,
    to: BookingStatus,
) -> Result<Booking, ApiError> {
    if to == BookingStatus::Confirmed {
        claims.require(perm::CONFIRM_SALES)?;
    }

    let mut booking = state
        .bookings
        .get_booking(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    let effect =
        apply_transition(&mut booking, to).map_err(|e| ApiError::Conflict(e.to_string()))?;
    if effect == SeatEffect::None {
        return Ok(booking);
    }

    let mut ticket = state
        .tickets
        .get_ticket(booking.ticket_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    match effect {
        SeatEffect::Commit => ticket.commit_sale(),
        SeatEffect::Release => ticket.release_seats(booking.passenger.pax_count),
        SeatEffect::None => {}
    }

    state.bookings.update_booking(&booking, &ticket).await?;

    let (action, verb) = match to {
        BookingStatus::Confirmed => ("booking_confirmed", "confirmed"),
        BookingStatus::Cancelled => ("booking_cancelled", "cancelled"),
        BookingStatus::Pending => ("booking_updated", "updated"),
    };
    let entry = ActivityLog::record(
        claims.sub,
        action,
        format!("Booking {} {}", booking.reference, verb),
        Some(booking.id),
    );
    state.activity.record_activity(&entry).await?;
    let _ = state.events_tx.send(entry.event());

    if to == BookingStatus::Confirmed {
        state.metrics.bookings_confirmed.inc();
    }
    tracing::info!("Booking {} {}", booking.reference, verb);

    Ok(booking)
}
