//! Configuration management for the server.

use farmdesk_engine::IdStrategy;
use std::env;
use std::path::PathBuf;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Sleep before every store operation
    pub simulate_latency: bool,
    /// Optional seed document loaded at startup
    pub seed_path: Option<PathBuf>,
    /// Optional weather fixture replacing the bundled one
    pub weather_fixture: Option<PathBuf>,
    /// How collections pick new Ids
    pub id_strategy: IdStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            simulate_latency: true,
            seed_path: None,
            weather_fixture: None,
            id_strategy: IdStrategy::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };

        let simulate_latency = match lookup("FARMDESK_SIMULATE_LATENCY") {
            Some(raw) => parse_flag("FARMDESK_SIMULATE_LATENCY", &raw)?,
            None => defaults.simulate_latency,
        };

        let seed_path = lookup("FARMDESK_SEED_PATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let weather_fixture = lookup("FARMDESK_WEATHER_FIXTURE")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let id_strategy = match lookup("FARMDESK_ID_STRATEGY") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidIdStrategy(raw))?,
            None => defaults.id_strategy,
        };

        Ok(Self {
            host,
            port,
            simulate_latency,
            seed_path,
            weather_fixture,
            id_strategy,
        })
    }

    /// `host:port` for binding the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: raw.to_string(),
        }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),

    #[error("Invalid value for {name}: {value} (expected true or false)")]
    InvalidFlag { name: &'static str, value: String },

    #[error("Invalid FARMDESK_ID_STRATEGY value: {0} (expected high-water or max-existing)")]
    InvalidIdStrategy(String),
}
