//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::ledger::{LedgerConfig, RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_STORE_NAME};

/// Where account state lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateBackend {
    /// Dapr sidecar state API
    Dapr,
    /// Process-local map (development only, not durable)
    Memory,
}

impl FromStr for StateBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dapr" => Ok(Self::Dapr),
            "memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// State store component name
    pub state_store_name: String,

    /// Pub/sub component name advertised in subscriptions
    pub pubsub_name: String,

    /// State backend
    pub state_backend: StateBackend,

    /// Dapr sidecar host
    pub dapr_http_host: String,

    /// Dapr sidecar HTTP port
    pub dapr_http_port: u16,

    /// Optional `dapr-api-token`
    pub dapr_api_token: Option<String>,

    /// Timeout for a single state store request
    pub state_request_timeout: Duration,

    /// Save attempts per ledger operation
    pub ledger_max_attempts: u32,

    /// Linear backoff step between conflicting attempts
    pub ledger_retry_backoff: Duration,

    /// Whether withdrawals may overdraw an account
    pub allow_negative_balance: bool,

    /// Emit JSON log lines
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let var = |name: &'static str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "127.0.0.1");
        let port = parse(&var("PORT", "3000"), "PORT")?;

        let state_store_name = var("STATE_STORE_NAME", DEFAULT_STORE_NAME);
        let pubsub_name = var("PUBSUB_NAME", "pubsub");

        let state_backend = parse(&var("STATE_BACKEND", "dapr"), "STATE_BACKEND")?;
        let dapr_http_host = var("DAPR_HTTP_HOST", "127.0.0.1");
        let dapr_http_port = parse(&var("DAPR_HTTP_PORT", "3500"), "DAPR_HTTP_PORT")?;
        let dapr_api_token = lookup("DAPR_API_TOKEN").filter(|t| !t.is_empty());

        let timeout_ms: u64 = parse(
            &var("STATE_REQUEST_TIMEOUT_MS", "2000"),
            "STATE_REQUEST_TIMEOUT_MS",
        )?;

        let ledger_max_attempts: u32 = parse(
            &var("LEDGER_MAX_ATTEMPTS", &DEFAULT_MAX_ATTEMPTS.to_string()),
            "LEDGER_MAX_ATTEMPTS",
        )?;
        if ledger_max_attempts == 0 {
            return Err(ConfigError::InvalidValue("LEDGER_MAX_ATTEMPTS"));
        }

        let backoff_ms: u64 = parse(
            &var("LEDGER_RETRY_BACKOFF_MS", "0"),
            "LEDGER_RETRY_BACKOFF_MS",
        )?;

        let allow_negative_balance =
            parse_bool(&var("ALLOW_NEGATIVE_BALANCE", "true"), "ALLOW_NEGATIVE_BALANCE")?;

        let log_json = var("LOG_FORMAT", "text").eq_ignore_ascii_case("json");

        Ok(Self {
            host,
            port,
            state_store_name,
            pubsub_name,
            state_backend,
            dapr_http_host,
            dapr_http_port,
            dapr_api_token,
            state_request_timeout: Duration::from_millis(timeout_ms),
            ledger_max_attempts,
            ledger_retry_backoff: Duration::from_millis(backoff_ms),
            allow_negative_balance,
            log_json,
        })
    }

    /// Ledger settings derived from this configuration
    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            store_name: self.state_store_name.clone(),
            retry: RetryPolicy::new(self.ledger_max_attempts, self.ledger_retry_backoff),
            allow_negative_balance: self.allow_negative_balance,
        }
    }
}

fn parse<T: FromStr>(value: &str, name: &'static str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue(name))
}

fn parse_bool(value: &str, name: &'static str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(name)),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
