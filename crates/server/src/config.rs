use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::orchestrator::FailurePolicy;

const DEFAULT_PORT: u16 = 80;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_CORS: &str = "*";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 10;

/// Which entrypoint the process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Local,
    Lambda,
}

impl RunMode {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "lambda" => Self::Lambda,
            _ => Self::Local,
        }
    }
}

/// Top-level configuration for the job service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: RunMode,
    pub server: ServerConfig,
    /// Value of `Access-Control-Allow-Origin` on every response
    pub cors_origin: String,
    pub telemetry: TelemetryConfig,
    pub aggregation: AggregationConfig,
}

impl AppConfig {
    /// Load from the process environment, reading a `.env` file first if one exists.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset and empty values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mode = RunMode::from_str(&get("MODE").unwrap_or_default());

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get("PORT") {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };

        let cors_origin = get("CORS").unwrap_or_else(|| DEFAULT_CORS.to_string());
        HeaderValue::from_str(&cors_origin).map_err(|_| ConfigError::InvalidCors {
            value: cors_origin.clone(),
        })?;

        let log_level = get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let source_timeout = match get("SOURCE_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout { value: raw }),
            },
            None => Duration::from_secs(DEFAULT_SOURCE_TIMEOUT_SECS),
        };

        let failure_policy = match get("FAILURE_POLICY") {
            Some(raw) => raw
                .parse::<FailurePolicy>()
                .map_err(|value| ConfigError::InvalidPolicy { value })?,
            None => FailurePolicy::default(),
        };

        Ok(Self {
            mode,
            server: ServerConfig { host, port },
            cors_origin,
            telemetry: TelemetryConfig { log_level },
            aggregation: AggregationConfig {
                source_timeout,
                failure_policy,
            },
        })
    }
}

/// Accepts both `8080` and the `:8080` listen-address form.
fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix(':')
        .unwrap_or(trimmed)
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidPort {
            value: raw.to_string(),
        })
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Limits applied to every aggregation.
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    pub source_timeout: Duration,
    pub failure_policy: FailurePolicy,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("PORT must be a valid u16, got '{value}'")]
    InvalidPort { value: String },

    #[error("HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost {
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("SOURCE_TIMEOUT_SECS must be a positive integer, got '{value}'")]
    InvalidTimeout { value: String },

    #[error("FAILURE_POLICY must be 'isolate' or 'fail-fast', got '{value}'")]
    InvalidPolicy { value: String },

    #[error("CORS must be a valid header value, got '{value}'")]
    InvalidCors { value: String },
}
