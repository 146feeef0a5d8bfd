use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    routing::get,
    Router,
};
use prometheus::{IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::state::AppState;

/// Request and business counters exposed at /metrics.
pub struct Metrics {
    registry: Registry,
    pub http_requests: IntCounterVec,
    pub bookings_created: IntCounter,
    pub bookings_confirmed: IntCounter,
    pub locks_expired: IntCounter,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new("bdticket_http_requests_total", "HTTP requests by method and status"),
            &["method", "status"],
        )
        .expect("valid metric");

        let bookings_created = IntCounter::new(
            "bdticket_bookings_created_total",
            "Bookings taken since startup",
        )
        .expect("valid metric");

        let bookings_confirmed = IntCounter::new(
            "bdticket_bookings_confirmed_total",
            "Sales confirmed since startup",
        )
        .expect("valid metric");

        let locks_expired = IntCounter::new(
            "bdticket_locks_expired_total",
            "Ticket holds released by the expiry sweep",
        )
        .expect("valid metric");

        registry
            .register(Box::new(http_requests.clone()))
            .expect("register metric");
        registry
            .register(Box::new(bookings_created.clone()))
            .expect("register metric");
        registry
            .register(Box::new(bookings_confirmed.clone()))
            .expect("register metric");
        registry
            .register(Box::new(locks_expired.clone()))
            .expect("register metric");

        Self {
            registry,
            http_requests,
            bookings_created,
            bookings_confirmed,
            locks_expired,
        }
    }

    /// Prometheus text exposition of everything registered.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        encoder
            .encode_to_string(&self.registry.gather())
            .unwrap_or_else(|e| format!("# Error encoding metrics: {e}\n"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/metrics", get(render_metrics))
}

async fn render_metrics(State(state): State<AppState>) -> String {
    state.metrics.render()
}

pub async fn track_requests(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let response = next.run(req).await;
    state
        .metrics
        .http_requests
        .with_label_values(&[method.as_str(), response.status().as_str()])
        .inc();
    response
}
