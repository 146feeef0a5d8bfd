use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use bdticket_shared::ActivityLog;
use bdticket_umrah::{
    groups::{apply_group_transition, booking_reference},
    sort_newest_first, GroupBookingStatus, NewGroupBooking, NewPackage, PackageFilter,
    UmrahBooking, UmrahBookingFilter, UmrahError, UmrahPackage,
};

use crate::{error::ApiError, middleware::Claims, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/umrah/packages", get(list_packages).post(create_package))
        .route("/v1/umrah/packages/{id}", get(get_package))
        .route("/v1/umrah/bookings", get(list_group_bookings).post(create_group_booking))
        .route("/v1/umrah/bookings/{id}", get(get_group_booking).patch(update_group_booking))
}

/// GET /v1/umrah/packages
async fn list_packages(
    State(state): State<AppState>,
    Query(filter): Query<PackageFilter>,
) -> Result<Json<Vec<UmrahPackage>>, ApiError> {
    let mut packages = state.umrah.list_packages().await?;
    packages.retain(|p| filter.matches(p));
    packages.sort_by_key(|p| p.departure_date);
    Ok(Json(packages))
}

/// POST /v1/umrah/packages
async fn create_package(
    State(state): State<AppState>,
    Json(req): Json<NewPackage>,
) -> Result<(StatusCode, Json<UmrahPackage>), ApiError> {
    let package = req
        .build(Utc::now())
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    state.umrah.create_package(&package).await?;

    tracing::info!("Umrah package {} created", package.package_name);
    Ok((StatusCode::CREATED, Json(package)))
}

/// GET /v1/umrah/packages/:id
async fn get_package(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UmrahPackage>, ApiError> {
    let package = state
        .umrah
        .get_package(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Package not found".to_string()))?;
    Ok(Json(package))
}

/// GET /v1/umrah/bookings
async fn list_group_bookings(
    State(state): State<AppState>,
    Query(filter): Query<UmrahBookingFilter>,
) -> Result<Json<Vec<UmrahBooking>>, ApiError> {
    let mut bookings = state.umrah.list_group_bookings().await?;
    bookings.retain(|b| filter.matches(b));
    sort_newest_first(&mut bookings);
    Ok(Json(bookings))
}

/// POST /v1/umrah/bookings
/// Reserves pilgrim seats on the package; booking and package persist
/// atomically.
async fn create_group_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<NewGroupBooking>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut package = state
        .umrah
        .get_package(req.package_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Package not found".to_string()))?;

    let now = Utc::now();
    let booking = req
        .build(&mut package, booking_reference(now), now)
        .map_err(group_error)?;

    state.umrah.create_group_booking(&booking, &package).await?;

    let entry = ActivityLog::record(
        claims.sub,
        "umrah_booking_created",
        format!(
            "Umrah group booking {} for {} pilgrims",
            booking.booking_reference, booking.number_of_pilgrims
        ),
        None,
    );
    state.activity.record_activity(&entry).await?;
    let _ = state.events_tx.send(entry.event());

    tracing::info!(
        "Umrah group booking {} created on package {}",
        booking.booking_reference,
        package.package_name
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "booking": booking })),
    ))
}

/// GET /v1/umrah/bookings/:id
async fn get_group_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UmrahBooking>, ApiError> {
    let booking = state
        .umrah
        .get_group_booking(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group booking not found".to_string()))?;
    Ok(Json(booking))
}

#[derive(Debug, Deserialize)]
struct UpdateGroupBooking {
    status: GroupBookingStatus,
}

/// PATCH /v1/umrah/bookings/:id
/// Guarded transition; cancelling returns pilgrim seats to the package.
async fn update_group_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateGroupBooking>,
) -> Result<Json<UmrahBooking>, ApiError> {
    let mut booking = state
        .umrah
        .get_group_booking(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group booking not found".to_string()))?;

    let from = booking.status;
    let release_seats = apply_group_transition(&mut booking, req.status).map_err(group_error)?;
    if from == req.status {
        // Same-state noop, nothing written.
        return Ok(Json(booking));
    }

    let mut package = state
        .umrah
        .get_package(booking.package_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Package not found".to_string()))?;
    if release_seats {
        package.release_pilgrims(booking.number_of_pilgrims);
    }
    state.umrah.update_group_booking(&booking, &package).await?;

    let entry = ActivityLog::record(
        claims.sub,
        "umrah_booking_updated",
        format!(
            "Umrah group booking {} moved to {}",
            booking.booking_reference, booking.status
        ),
        None,
    );
    state.activity.record_activity(&entry).await?;
    let _ = state.events_tx.send(entry.event());

    Ok(Json(booking))
}

fn group_error(err: UmrahError) -> ApiError {
    match err {
        UmrahError::MissingFields | UmrahError::InvalidGroupSize(_) => {
            ApiError::BadRequest(err.to_string())
        }
        _ => ApiError::Conflict(err.to_string()),
    }
}
