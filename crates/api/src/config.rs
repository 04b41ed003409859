//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the clinic API
//! server. It retrieves configuration values from environment variables and
//! provides defaults where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `JWT_SECRET`: Secret key for signing bearer tokens
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `LOGIN_MAX_ATTEMPTS`: Login attempts allowed per window (default: 20)
//! - `LOGIN_WINDOW_SECONDS`: Length of the login throttle window (default: 900)

use clinic_core::errors::{ClinicError, ClinicResult};
use std::{env, time::Duration};
use tracing::Level;

/// Signing key used when `JWT_SECRET` is unset. Only suitable for local
/// development.
pub const DEFAULT_JWT_SECRET: &str = "dev-secret-change-me";

/// Configuration for the clinic API server
///
/// # Example
///
/// ```no_run
/// use clinic_api::config::ApiConfig;
///
/// let config = ApiConfig::from_env().expect("DATABASE_URL must be set");
/// println!("Starting server on {}", config.server_addr());
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Secret used to sign and verify bearer tokens
    pub jwt_secret: String,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Login attempts allowed from one source within `login_window`
    pub login_max_attempts: u32,

    /// Length of the login throttle window
    pub login_window: Duration,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ClinicError::Config` if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    pub fn from_env() -> ClinicResult<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> ClinicResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Network settings
        let host = var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("API_PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| ClinicError::Config(format!("Invalid API_PORT value: {}", port)))?,
            None => 3000,
        };

        // Database settings
        let database_url = var("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ClinicError::Config("DATABASE_URL is not configured".to_string()))?;

        // Logging settings
        let log_level = match var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = var("API_CORS_ORIGINS")
            .map(|origins| origins.split(',').map(|s| s.trim().to_string()).collect());

        // Security settings
        let jwt_secret = var("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());

        // Performance settings
        let request_timeout = var("API_REQUEST_TIMEOUT_SECONDS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(30);

        // Login throttle
        let login_max_attempts = var("LOGIN_MAX_ATTEMPTS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(20);
        let login_window = Duration::from_secs(
            var("LOGIN_WINDOW_SECONDS")
                .and_then(|value| value.parse().ok())
                .unwrap_or(15 * 60),
        );

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            jwt_secret,
            request_timeout,
            login_max_attempts,
            login_window,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether tokens are signed with the built-in development key.
    pub fn uses_default_jwt_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}
