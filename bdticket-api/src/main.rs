use std::net::SocketAddr;
use std::sync::Arc;

use bdticket_api::state::AuthConfig;
use bdticket_api::{app, worker, AppState};
use bdticket_store::{Config, DbClient, MemoryStore, PgStore, RedisClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bdticket_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting BDTicket API on port {}", config.server.port);

    // Redis Connection (optional: without it the rate limiter is off)
    let redis = match &config.redis.url {
        Some(url) => {
            let client = RedisClient::new(url)
                .await
                .expect("Failed to create Redis client");
            Some(Arc::new(client))
        }
        None => None,
    };

    let auth = AuthConfig {
        secret: config.auth.jwt_secret.clone(),
        expiration: config.auth.jwt_expiration_seconds,
    };

    let state = match config.storage.backend.as_str() {
        "postgres" => {
            let db = DbClient::new(&config.database.url)
                .await
                .expect("Failed to connect to database");
            db.migrate().await.expect("Failed to run migrations");

            let store = Arc::new(PgStore::new(&db));
            store.seed_if_empty().await.expect("Failed to seed database");

            AppState::for_store(store, redis, auth, config.business_rules.clone(), "postgres")
        }
        _ => {
            tracing::info!("Using the in-memory store with demo data");
            let store = Arc::new(MemoryStore::with_demo_data());
            AppState::for_store(store, redis, auth, config.business_rules.clone(), "memory")
        }
    };

    tokio::spawn(worker::start_lock_sweeper(state.clone()));

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
