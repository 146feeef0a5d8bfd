use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use bdticket_booking::{payments, BookingStatus, Payment, PaymentMethod, PaymentStatus};
use bdticket_shared::ActivityLog;

use crate::{error::ApiError, middleware::Claims, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/payments", get(list_payments).post(record_payment))
}

#[derive(Debug, Deserialize)]
struct PaymentQuery {
    booking_id: Option<Uuid>,
}

/// GET /v1/payments
async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<PaymentQuery>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    let mut payments = state.payments.list_payments(query.booking_id).await?;
    payments.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
    Ok(Json(payments))
}

#[derive(Debug, Deserialize)]
struct RecordPayment {
    booking_id: Uuid,
    amount: i64,
    payment_method: PaymentMethod,
}

/// POST /v1/payments
/// Settlement payment against an existing booking, e.g. the balance of
/// a partial sale.
async fn record_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RecordPayment>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if req.amount <= 0 {
        return Err(ApiError::BadRequest("Amount must be positive".to_string()));
    }

    let booking = state
        .bookings
        .get_booking(req.booking_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;
    if booking.status == BookingStatus::Cancelled {
        return Err(ApiError::Conflict(
            "Cannot record a payment against a cancelled booking".to_string(),
        ));
    }

    let payment = Payment {
        id: Uuid::new_v4(),
        booking_id: booking.id,
        booking_reference: booking.reference.clone(),
        passenger_name: booking.passenger.name.clone(),
        amount: req.amount,
        payment_method: req.payment_method,
        payment_date: Utc::now(),
        status: PaymentStatus::Completed,
        transaction_id: payments::transaction_id(state.payments.count_payments().await? + 1),
        recorded_by: claims.sub,
    };
    state.payments.create_payment(&payment).await?;

    let entry = ActivityLog::record(
        claims.sub,
        "payment_received",
        format!(
            "Payment of {} BDT received for {}",
            payment.amount, payment.booking_reference
        ),
        Some(booking.id),
    );
    state.activity.record_activity(&entry).await?;
    let _ = state.events_tx.send(entry.event());

    tracing::info!(
        "Payment {} recorded for booking {}",
        payment.transaction_id,
        payment.booking_reference
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "payment": payment })),
    ))
}
