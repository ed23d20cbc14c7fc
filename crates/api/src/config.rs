//! # API Configuration Module
//!
//! Loads the clinic API settings from environment variables, falling back to
//! defaults where that is safe.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `SLOT_GRANULARITY_MINUTES`: Step between candidate slot starts (default: 30)
//! - `DEFAULT_APPOINTMENT_DURATION_MINUTES`: Duration used when a slot query
//!   omits one (default: 45)
//! - `CLINIC_TIMEZONE`: IANA zone the weekly schedules are written in
//!   (default: "Europe/Warsaw")

use chrono_tz::Tz;
use eyre::{Result, WrapErr, eyre};
use std::env;
use tracing::Level;

/// Configuration for the clinic API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use clinic_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    pub database_max_connections: u32,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    pub slot_granularity_minutes: i64,

    pub default_duration_minutes: i64,

    /// Zone in which schedules and slot times are interpreted
    pub timezone: Tz,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - A slot setting is not a positive number of minutes
    /// - CLINIC_TIMEZONE is not a known IANA zone
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;
        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .wrap_err("Invalid DATABASE_MAX_CONNECTIONS value")?;

        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_default());

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Scheduling settings
        let slot_granularity_minutes = parse_positive_minutes(
            "SLOT_GRANULARITY_MINUTES",
            env::var("SLOT_GRANULARITY_MINUTES").ok(),
            30,
        )?;
        let default_duration_minutes = parse_positive_minutes(
            "DEFAULT_APPOINTMENT_DURATION_MINUTES",
            env::var("DEFAULT_APPOINTMENT_DURATION_MINUTES").ok(),
            45,
        )?;
        let timezone = parse_timezone(
            &env::var("CLINIC_TIMEZONE").unwrap_or_else(|_| "Europe/Warsaw".to_string()),
        )?;

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            log_level,
            cors_origins,
            request_timeout,
            slot_granularity_minutes,
            default_duration_minutes,
            timezone,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Unknown or empty values fall back to `INFO`.
pub fn parse_log_level(value: &str) -> Level {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

pub fn parse_positive_minutes(name: &str, value: Option<String>, default: i64) -> Result<i64> {
    let Some(raw) = value else {
        return Ok(default);
    };
    let minutes: i64 = raw
        .trim()
        .parse()
        .wrap_err_with(|| format!("Invalid {} value", name))?;
    if minutes <= 0 {
        return Err(eyre!("{} must be a positive number of minutes, got {}", name, minutes));
    }
    Ok(minutes)
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|err| eyre!("Invalid CLINIC_TIMEZONE {:?}: {}", name, err))
}
