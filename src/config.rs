//! Configuration loaded from the environment.
//!
//! `main` loads `.env` through dotenvy first; everything here reads plain
//! variables so tests can feed values through [`Config::from_lookup`].

use std::net::SocketAddr;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::distance::matrix::DEFAULT_DISTANCE_MATRIX_URL;
use crate::pricing::models::{FuelLevyPercent, QuotePolicy, ServiceTypeParsing};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub distance_matrix_url: String,
    pub distance_matrix_api_key: Option<String>,
    pub distance_timeout: Duration,
    pub distance_cache_ttl: Duration,
    pub default_fuel_levy_percent: FuelLevyPercent,
    pub service_type_parsing: ServiceTypeParsing,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            distance_matrix_url: DEFAULT_DISTANCE_MATRIX_URL.to_string(),
            distance_matrix_api_key: None,
            distance_timeout: Duration::from_secs(10),
            distance_cache_ttl: Duration::from_secs(60 * 60),
            default_fuel_levy_percent: FuelLevyPercent::default(),
            service_type_parsing: ServiceTypeParsing::Lenient,
            log_level: "info".to_string(),
        }
    }
}

fn invalid(name: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_secs(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| invalid(name, value, e.to_string()))
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(name, value, "expected true or false")),
    }
}

impl Config {
    /// Boundary rules for incoming quote requests.
    pub fn quote_policy(&self) -> QuotePolicy {
        QuotePolicy {
            parsing: self.service_type_parsing,
            default_fuel_levy_percent: self.default_fuel_levy_percent,
        }
    }

    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup("BIND_ADDR") {
            config.bind_addr = value
                .trim()
                .parse()
                .map_err(|e: std::net::AddrParseError| invalid("BIND_ADDR", &value, e.to_string()))?;
        }
        if let Some(value) = lookup("DISTANCE_MATRIX_URL") {
            config.distance_matrix_url = value;
        }
        config.distance_matrix_api_key =
            lookup("DISTANCE_MATRIX_API_KEY").filter(|key| !key.trim().is_empty());
        if let Some(value) = lookup("DISTANCE_TIMEOUT_SECS") {
            config.distance_timeout = parse_secs("DISTANCE_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("DISTANCE_CACHE_TTL_SECS") {
            config.distance_cache_ttl = parse_secs("DISTANCE_CACHE_TTL_SECS", &value)?;
        }
        if let Some(value) = lookup("DEFAULT_FUEL_LEVY_PERCENT") {
            let percent = value
                .trim()
                .parse::<Decimal>()
                .map_err(|e| invalid("DEFAULT_FUEL_LEVY_PERCENT", &value, e.to_string()))?;
            config.default_fuel_levy_percent = FuelLevyPercent::from_decimal(percent)
                .map_err(|e| invalid("DEFAULT_FUEL_LEVY_PERCENT", &value, e.to_string()))?;
        }
        if let Some(value) = lookup("STRICT_SERVICE_TYPES") {
            config.service_type_parsing = if parse_bool("STRICT_SERVICE_TYPES", &value)? {
                ServiceTypeParsing::Strict
            } else {
                ServiceTypeParsing::Lenient
            };
        }
        if let Some(value) = lookup("LOG_LEVEL") {
            config.log_level = value;
        }

        Ok(config)
    }
}
