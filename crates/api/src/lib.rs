//! # Clinic API
//!
//! The web server for the clinic booking service: patients register, log in,
//! list free 30-minute slots and book them; administrators list every
//! booking.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into service calls
//! - **Services**: Authentication and booking rules
//! - **Middleware**: Password hashing, bearer-token extraction, login
//!   throttling and error mapping
//! - **Config**: Environment configuration
//!
//! Persistence goes through the [`clinic_db::Store`] trait, so the whole
//! router can run against Postgres or the in-memory store.

/// Configuration module for API settings
pub mod config;
/// Request handlers that adapt HTTP to the services
pub mod handlers;
/// Middleware for authentication, throttling and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Authentication and booking operations
pub mod services;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use clinic_db::Store;
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::{
    config::ApiConfig, middleware::rate_limit::LoginThrottle, services::auth::TokenKeys,
};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Persistence gateway
    pub store: Arc<dyn Store>,
    /// Token signing and verification keys
    pub keys: TokenKeys,
    /// Per-source login attempt counter
    pub throttle: LoginThrottle,
}

impl ApiState {
    pub fn new(store: Arc<dyn Store>, config: &ApiConfig) -> Self {
        Self {
            store,
            keys: TokenKeys::new(config.jwt_secret.as_bytes()),
            throttle: LoginThrottle::new(config.login_max_attempts, config.login_window),
        }
    }
}

/// Builds the application router with every endpoint attached.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Registration and login
        .merge(routes::auth::routes())
        // Slot listing
        .merge(routes::slots::routes())
        // Booking endpoints
        .merge(routes::bookings::routes())
        // Attach shared state to all routes
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true)
}

/// Starts the API server with the provided configuration and store
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// use std::sync::Arc;
/// use clinic_api::config::ApiConfig;
/// use clinic_db::{create_pool, PgStore};
///
/// let config = ApiConfig::from_env()?;
/// let pool = create_pool(&config.database_url).await?;
/// clinic_api::start_server(config, Arc::new(PgStore::new(pool))).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: ApiConfig, store: Arc<dyn Store>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if config.uses_default_jwt_secret() {
        warn!("JWT_SECRET is not set; tokens are signed with an insecure development key");
    }

    let state = Arc::new(ApiState::new(store, &config));

    let app = app(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    // Start the HTTP server; peer addresses feed the login throttle
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
