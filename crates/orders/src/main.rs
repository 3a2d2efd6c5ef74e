//! Clementine Orders - Order service and checkout saga.
//!
//! This binary serves the order API on port 9003.
//!
//! # Architecture
//!
//! - Axum web framework, JSON API
//! - reqwest client to the catalog service for pricing and reservation
//! - `PostgreSQL` for order storage (`clementine_orders`)
//! - Bearer-token verification with the fleet-wide HMAC secret; every order
//!   endpoint requires an authenticated caller
//!
//! A checkout walks the cart sequentially, reserving remote stock per line,
//! and commits the order locally only when every line succeeded. There is no
//! compensation for reservations made before an abort.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use sentry::integrations::tracing as sentry_tracing;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clementine_core::ApiMessage;
use clementine_orders::config::OrdersConfig;
use clementine_orders::state::AppState;
use clementine_orders::{db, middleware, routes};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &OrdersConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = OrdersConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "clementine_orders=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // Initialize database connection pool and schema
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Database ready");

    // Build application state; bad secret or client config must stop startup
    let state = AppState::new(config.clone(), pool).expect("Failed to initialize state");

    // Build router
    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .merge(routes::routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::token_trust,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("orders listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
async fn healthz() -> Json<ApiMessage> {
    Json(ApiMessage::ok())
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
async fn readyz(State(state): State<AppState>) -> Result<Json<ApiMessage>, StatusCode> {
    let Some(pool) = state.pool() else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => Ok(Json(ApiMessage::ok())),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
