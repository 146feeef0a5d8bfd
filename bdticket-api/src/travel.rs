use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use bdticket_inventory::{country_stats, Airline, Country};

use crate::{error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/countries", get(list_countries).post(create_country))
        .route("/v1/countries/stats", get(list_country_stats))
        .route("/v1/airlines", get(list_airlines).post(create_airline))
}

#[derive(Debug, Serialize)]
struct CountryView {
    #[serde(flatten)]
    country: Country,
    ticket_count: usize,
}

/// GET /v1/countries
/// Destinations with how many ticket batches point at each.
async fn list_countries(
    State(state): State<AppState>,
) -> Result<Json<Vec<CountryView>>, ApiError> {
    let countries = state.countries.list_countries().await?;
    let tickets = state.tickets.list_tickets().await?;

    let payload = countries
        .into_iter()
        .map(|country| {
            let ticket_count = tickets.iter().filter(|t| t.country_id == country.id).count();
            CountryView {
                country,
                ticket_count,
            }
        })
        .collect();
    Ok(Json(payload))
}

#[derive(Debug, Deserialize)]
struct NewCountry {
    name: String,
    code: String,
    flag: String,
}

/// POST /v1/countries
async fn create_country(
    State(state): State<AppState>,
    Json(req): Json<NewCountry>,
) -> Result<(StatusCode, Json<Country>), ApiError> {
    if req.name.trim().is_empty() || req.code.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }

    let country = Country {
        id: Uuid::new_v4(),
        name: req.name,
        code: req.code,
        flag: req.flag,
    };
    state.countries.create_country(&country).await?;
    Ok((StatusCode::CREATED, Json(country)))
}

/// GET /v1/countries/stats
/// Seat totals per destination, for the countries overview cards.
async fn list_country_stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let countries = state.countries.list_countries().await?;
    let tickets = state.tickets.list_tickets().await?;
    let stats = country_stats(&countries, &tickets);
    Ok(Json(json!({ "countries": stats })))
}

/// GET /v1/airlines
async fn list_airlines(State(state): State<AppState>) -> Result<Json<Vec<Airline>>, ApiError> {
    let airlines = state.airlines.list_airlines().await?;
    Ok(Json(airlines))
}

#[derive(Debug, Deserialize)]
struct NewAirline {
    name: String,
    code: String,
    logo_url: Option<String>,
}

/// POST /v1/airlines
async fn create_airline(
    State(state): State<AppState>,
    Json(req): Json<NewAirline>,
) -> Result<(StatusCode, Json<Airline>), ApiError> {
    if req.name.trim().is_empty() || req.code.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }

    let airline = Airline {
        id: Uuid::new_v4(),
        name: req.name,
        code: req.code,
        logo_url: req.logo_url,
    };
    state.airlines.create_airline(&airline).await?;
    Ok((StatusCode::CREATED, Json(airline)))
}
