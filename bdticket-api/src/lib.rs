use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::IntoResponse,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod activity;
pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod payments;
pub mod reports;
pub mod settings;
pub mod state;
pub mod tickets;
pub mod travel;
pub mod umrah;
pub mod worker;

pub use state::AppState;

/// Whole API surface. Login, health and metrics are open; everything
/// else sits behind the JWT middleware.
pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::USER_AGENT,
        ]);

    let protected = Router::new()
        .merge(tickets::routes())
        .merge(bookings::routes())
        .merge(payments::routes())
        .merge(travel::routes())
        .merge(reports::routes())
        .merge(dashboard::routes())
        .merge(umrah::routes())
        .merge(settings::routes())
        .merge(activity::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .merge(auth::routes())
        .merge(metrics::routes())
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            metrics::track_requests,
        ))
        .with_state(state)
}

/// Per-IP fixed window limit backed by Redis. Without a Redis client
/// (memory deployments, tests) requests pass straight through.
async fn rate_limit_middleware(
    State(state): State<AppState>,
    connect_info: Result<ConnectInfo<SocketAddr>, axum::extract::rejection::ExtensionRejection>,
    req: Request,
    next: Next,
) -> impl IntoResponse {
    let (Some(redis), Ok(ConnectInfo(addr))) = (state.redis.as_ref(), connect_info) else {
        return next.run(req).await;
    };

    let key = format!("ratelimit:{}", addr.ip());
    match redis
        .check_rate_limit(&key, state.business_rules.rate_limit_per_minute, 60)
        .await
    {
        Ok(true) => next.run(req).await,
        Ok(false) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Rate limit exceeded" })),
        )
            .into_response(),
        Err(_) => next.run(req).await, // Fail open
    }
}
