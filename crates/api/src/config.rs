//! # API Configuration Module
//!
//! Loads server and external-service configuration from environment
//! variables, with defaults where sensible.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: bind address (default: "0.0.0.0")
//! - `API_PORT`: listen port (default: 3000)
//! - `LOG_LEVEL`: logging level (default: "info")
//! - `API_CORS_ORIGINS`: comma-separated allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: request and external-call timeout
//!   (default: 30)
//! - `OPENAI_API_KEY`: chat-completions key (required)
//! - `OPENAI_BASE_URL`: alternate completions endpoint (optional)
//! - `CHAT_MODEL`: completions model (default: "gpt-3.5-turbo")
//! - `OWNER_NAME`: portfolio owner's name for the persona prompt (required)
//! - `KNOWLEDGE_BASE_URL`: vector store endpoint (default:
//!   "http://localhost:8000")
//! - `KNOWLEDGE_COLLECTION`: collection name (default: "portfolio_data")
//! - `CALENDAR_ID`: bookings calendar (default: "primary")
//! - `MEETING_TIMEZONE`: IANA timezone for slots (default:
//!   "America/New_York")
//! - `GOOGLE_CLIENT_ID` / `GOOGLE_CLIENT_SECRET` / `GOOGLE_REFRESH_TOKEN`:
//!   refreshing calendar credentials, or `GOOGLE_ACCESS_TOKEN` for a static
//!   bearer token

use eyre::{Result, WrapErr};
use std::env;
use tracing::Level;

use portfolio_core::config::SchedulingConfig;

/// Configuration for the assistant API server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request and external-call timeout in seconds
    pub request_timeout: u64,

    /// Chat-completions API key
    pub openai_api_key: String,

    /// Alternate completions endpoint (optional)
    pub openai_base_url: Option<String>,

    /// Completions model name
    pub chat_model: String,

    /// Portfolio owner's name, used in the persona prompt
    pub owner_name: String,

    /// Vector store endpoint
    pub knowledge_base_url: String,

    /// Vector store collection name
    pub knowledge_collection: String,

    /// Refreshing calendar credentials (all three required together)
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_refresh_token: Option<String>,

    /// Static calendar bearer token (fallback when no refresh credentials)
    pub google_access_token: Option<String>,

    /// Slot generation and booking policy
    pub scheduling: SchedulingConfig,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Fails when a required variable is missing or a value cannot be
    /// parsed (port, timezone, numeric overrides).
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Logging settings
        let log_level = match env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS")
            .ok()
            .map(|origins| origins.split(',').map(|s| s.trim().to_string()).collect());

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Language-model boundary
        let openai_api_key = env::var("OPENAI_API_KEY")
            .wrap_err("OPENAI_API_KEY environment variable must be set")?;
        let openai_base_url = env::var("OPENAI_BASE_URL").ok();
        let chat_model = env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());
        let owner_name =
            env::var("OWNER_NAME").wrap_err("OWNER_NAME environment variable must be set")?;

        // Similarity-index boundary
        let knowledge_base_url =
            env::var("KNOWLEDGE_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
        let knowledge_collection =
            env::var("KNOWLEDGE_COLLECTION").unwrap_or_else(|_| "portfolio_data".to_string());

        // Calendar boundary
        let google_client_id = env::var("GOOGLE_CLIENT_ID").ok();
        let google_client_secret = env::var("GOOGLE_CLIENT_SECRET").ok();
        let google_refresh_token = env::var("GOOGLE_REFRESH_TOKEN").ok();
        let google_access_token = env::var("GOOGLE_ACCESS_TOKEN").ok();

        let scheduling = scheduling_from_env()?;

        Ok(Self {
            host,
            port,
            log_level,
            cors_origins,
            request_timeout,
            openai_api_key,
            openai_base_url,
            chat_model,
            owner_name,
            knowledge_base_url,
            knowledge_collection,
            google_client_id,
            google_client_secret,
            google_refresh_token,
            google_access_token,
            scheduling,
        })
    }

    /// The server address as a string, e.g. "0.0.0.0:3000".
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn scheduling_from_env() -> Result<SchedulingConfig> {
    let mut scheduling = SchedulingConfig::default();

    if let Ok(tz) = env::var("MEETING_TIMEZONE") {
        scheduling.timezone = tz
            .parse()
            .map_err(|e| eyre::eyre!("Invalid MEETING_TIMEZONE {tz:?}: {e}"))?;
    }
    if let Ok(id) = env::var("CALENDAR_ID") {
        scheduling.calendar_id = id;
    }
    if let Ok(hour) = env::var("BUSINESS_START_HOUR") {
        scheduling.business_start_hour = hour.parse().wrap_err("Invalid BUSINESS_START_HOUR")?;
    }
    if let Ok(hour) = env::var("BUSINESS_END_HOUR") {
        scheduling.business_end_hour = hour.parse().wrap_err("Invalid BUSINESS_END_HOUR")?;
    }
    if let Ok(minutes) = env::var("SLOT_MINUTES") {
        scheduling.slot_minutes = minutes.parse().wrap_err("Invalid SLOT_MINUTES")?;
    }
    if let Ok(days) = env::var("SCAN_HORIZON_DAYS") {
        scheduling.horizon_days = days.parse().wrap_err("Invalid SCAN_HORIZON_DAYS")?;
    }

    Ok(scheduling)
}
