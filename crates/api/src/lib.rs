//! # Clinic API
//!
//! The web server for the clinic scheduling service: free-slot lookup,
//! employee schedules and appointment booking.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Parse requests and call into `clinic_core`
//! - **Middleware**: Error mapping to HTTP responses
//! - **Config**: Environment based application configuration
//!
//! Storage is reached only through the `ProviderDirectory` and
//! `BookingStore` traits held in [`ApiState`], so handlers can be tested
//! against mocks.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error handling middleware
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use clinic_core::{
    availability::SlotFinder,
    store::{BookingStore, ProviderDirectory},
};
use clinic_db::{DbPool, PgClinicStore};
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub directory: Arc<dyn ProviderDirectory>,
    pub bookings: Arc<dyn BookingStore>,
    /// Step between candidate slot starts, in minutes
    pub granularity_minutes: i64,
    /// Duration used by slot queries that do not name one
    pub default_duration_minutes: i64,
    pub timezone: Tz,
}

impl ApiState {
    pub fn slot_finder(&self) -> SlotFinder<'_> {
        SlotFinder::new(
            self.directory.as_ref(),
            self.bookings.as_ref(),
            self.granularity_minutes,
        )
    }

    /// Current wall-clock time at the clinic.
    pub fn clinic_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }
}

/// Builds the application router with all routes attached to `state`.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Slot lookup endpoints
        .merge(routes::availability::routes())
        // Employee schedule endpoints
        .merge(routes::employee::routes())
        // Booking endpoints
        .merge(routes::appointment::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(origins)
}

/// Starts the API server with the provided configuration and database connection
///
/// Sets up logging, wires the Postgres store into the shared state and
/// serves until the listener fails.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = clinic_api::config::ApiConfig::from_env()?;
/// let db_pool = clinic_db::create_pool(&config.database_url, config.database_max_connections).await?;
/// clinic_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = Arc::new(PgClinicStore::new(db_pool, config.timezone));
    let state = Arc::new(ApiState {
        directory: store.clone(),
        bookings: store,
        granularity_minutes: config.slot_granularity_minutes,
        default_duration_minutes: config.default_duration_minutes,
        timezone: config.timezone,
    });

    info!(
        "Slots every {} minutes, default duration {} minutes, timezone {}",
        config.slot_granularity_minutes, config.default_duration_minutes, config.timezone
    );

    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
