use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use bdticket_core::repository::{
    ActivityLogRepository, AirlineRepository, BookingRepository, CountryRepository,
    PaymentRepository, SettingsRepository, TicketRepository, UmrahRepository, UserRepository,
};
use bdticket_shared::ActivityEvent;
use bdticket_store::app_config::BusinessRules;
use bdticket_store::RedisClient;

use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

/// Shared handler state. Every repository is a trait object so the
/// memory and Postgres backends are interchangeable behind one router.
#[derive(Clone)]
pub struct AppState {
    pub tickets: Arc<dyn TicketRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub countries: Arc<dyn CountryRepository>,
    pub airlines: Arc<dyn AirlineRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub umrah: Arc<dyn UmrahRepository>,
    pub activity: Arc<dyn ActivityLogRepository>,
    pub users: Arc<dyn UserRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    /// Optional: without Redis the rate limiter is skipped.
    pub redis: Option<Arc<RedisClient>>,
    pub events_tx: broadcast::Sender<ActivityEvent>,
    pub auth: AuthConfig,
    pub business_rules: BusinessRules,
    pub metrics: Arc<Metrics>,
    pub backend: &'static str,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wire every repository slot to one store that implements them all.
    pub fn for_store<S>(
        store: Arc<S>,
        redis: Option<Arc<RedisClient>>,
        auth: AuthConfig,
        business_rules: BusinessRules,
        backend: &'static str,
    ) -> Self
    where
        S: TicketRepository
            + BookingRepository
            + CountryRepository
            + AirlineRepository
            + PaymentRepository
            + UmrahRepository
            + ActivityLogRepository
            + UserRepository
            + SettingsRepository
            + 'static,
    {
        let (events_tx, _) = broadcast::channel(100);
        Self {
            tickets: store.clone(),
            bookings: store.clone(),
            countries: store.clone(),
            airlines: store.clone(),
            payments: store.clone(),
            umrah: store.clone(),
            activity: store.clone(),
            users: store.clone(),
            settings: store,
            redis,
            events_tx,
            auth,
            business_rules,
            metrics: Arc::new(Metrics::new()),
            backend,
            started_at: Utc::now(),
        }
    }
}
