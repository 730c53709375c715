//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::stations::StationClientConfig;
use crate::upstream::{DEFAULT_BASE_URL, UpstreamConfig};

/// Subscription key for the NS API.
pub const API_KEY_VAR: &str = "NS_API_KEY";
/// Override for the NS API base URL.
pub const BASE_URL_VAR: &str = "NS_API_BASE_URL";
/// Address the server listens on.
pub const LISTEN_ADDR_VAR: &str = "JOURNEY_SERVER_ADDR";
/// File holding the pinned journey.
pub const PIN_STORE_PATH_VAR: &str = "PIN_STORE_PATH";

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_PIN_STORE_PATH: &str = "journey_state.json";

/// Errors in the server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Subscription key; `None` starts the server in a degraded mode where
    /// every upstream call reports a configuration error
    pub api_key: Option<String>,
    pub base_url: String,
    pub listen_addr: SocketAddr,
    pub pin_store_path: PathBuf,
}

impl AppConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which returns the value of
    /// a variable if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let set = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let listen_addr = set(LISTEN_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: LISTEN_ADDR_VAR,
                message: e.to_string(),
            })?;

        Ok(Self {
            api_key: set(API_KEY_VAR).map(|k| k.trim().to_string()),
            base_url: set(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            listen_addr,
            pin_store_path: set(PIN_STORE_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PIN_STORE_PATH)),
        })
    }

    /// Upstream client configuration.
    pub fn upstream(&self) -> UpstreamConfig {
        let config = match &self.api_key {
            Some(key) => UpstreamConfig::new(key),
            None => UpstreamConfig::unconfigured(),
        };
        config.with_base_url(&self.base_url)
    }

    /// Station directory configuration, if there is a key to fetch it with.
    pub fn stations(&self) -> Option<StationClientConfig> {
        self.api_key
            .as_ref()
            .map(|key| StationClientConfig::new(key).with_base_url(&self.base_url))
    }
}
