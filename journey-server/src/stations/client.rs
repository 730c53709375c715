//! NS stations endpoint client.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;

use crate::upstream::{DEFAULT_BASE_URL, SUBSCRIPTION_KEY_HEADER};

use super::error::StationError;

/// Path of the station list, relative to the API base URL.
const STATIONS_PATH: &str = "/reisinformatie-api/api/v2/stations";

/// Wrapper for the stations response.
#[derive(Debug, Deserialize)]
pub struct StationsResponse {
    #[serde(default)]
    pub payload: Vec<StationDto>,
}

/// One station from the directory.
#[derive(Debug, Clone, Deserialize)]
pub struct StationDto {
    pub code: String,
    #[serde(rename = "UICCode")]
    pub uic_code: String,
    pub namen: StationNamesDto,
    #[serde(default)]
    pub synoniemen: Vec<String>,
}

/// Long, medium and short display names.
#[derive(Debug, Clone, Deserialize)]
pub struct StationNamesDto {
    pub lang: String,
    #[serde(default)]
    pub middel: Option<String>,
    #[serde(default)]
    pub kort: Option<String>,
}

/// Configuration for the stations client.
#[derive(Debug, Clone)]
pub struct StationClientConfig {
    /// Subscription key, sent in the same header as the rail endpoints
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl StationClientConfig {
    /// Create a new config with the given subscription key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Client for the NS station directory.
#[derive(Debug, Clone)]
pub struct StationClient {
    http: reqwest::Client,
    base_url: String,
}

impl StationClient {
    /// Create a new stations client.
    pub fn new(config: StationClientConfig) -> Result<Self, StationError> {
        let key = config.api_key.trim();
        if key.is_empty() {
            return Err(StationError::Configuration(
                "no subscription key configured".to_string(),
            ));
        }

        let mut value = HeaderValue::from_str(key).map_err(|_| {
            StationError::Configuration("subscription key contains invalid characters".to_string())
        })?;
        value.set_sensitive(true);

        let name = HeaderName::from_bytes(SUBSCRIPTION_KEY_HEADER.as_bytes())
            .map_err(|e| StationError::Configuration(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(name, value);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch all stations from the API.
    pub async fn fetch_all(&self) -> Result<Vec<StationDto>, StationError> {
        let url = format!("{}{}", self.base_url, STATIONS_PATH);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(StationError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StationError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;
        parse_stations(&body)
    }
}

fn parse_stations(body: &str) -> Result<Vec<StationDto>, StationError> {
    let response: StationsResponse =
        serde_json::from_str(body).map_err(|e| StationError::Json {
            message: e.to_string(),
        })?;

    Ok(response.payload)
}
