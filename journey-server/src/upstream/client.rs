//! NS API HTTP client.
//!
//! Provides async access to the four read endpoints the pipeline uses.
//! Handles authentication, status classification, and conversion to
//! domain types.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use reqwest::StatusCode;
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::{
    BoardKind, Composition, Disruption, Journey, JourneyDetails, StationCode, TrainNumber,
};

use super::convert::{
    convert_board, convert_composition, convert_disruptions, convert_journey_details,
};
use super::error::UpstreamError;
use super::source::RailSource;
use super::types::{BoardPayload, CompositionDto, DisruptionDto, Envelope, JourneyDetailsPayload};

/// Default base URL for the NS API gateway.
pub const DEFAULT_BASE_URL: &str = "https://gateway.apiportal.ns.nl";

/// Header carrying the API subscription key.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// How much of a response body to keep in errors and logs.
const BODY_SNIPPET_LEN: usize = 500;

/// Features requested from the composition endpoint.
const COMPOSITION_FEATURES: &str = "zitplaats,platformitems,cta,drukte";

/// Configuration for the upstream client.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Subscription key. `None` leaves the client unconfigured: every call
    /// fails with `UpstreamError::Configuration` before any request.
    pub api_key: Option<String>,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    /// Create a new config with the given subscription key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Create a config without credentials.
    pub fn unconfigured() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// How a 404 should be read for an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NotFound {
    /// 404 is a valid empty result.
    Empty,
    /// 404 is an upstream failure like any other non-2xx status.
    Unavailable,
}

/// NS API client.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<HeaderValue>,
}

impl UpstreamClient {
    /// Create a new client with the given configuration.
    ///
    /// A missing or blank key is accepted here and reported on each call,
    /// so the server can start and answer with a generic error.
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let api_key = config
            .api_key
            .filter(|k| !k.trim().is_empty())
            .map(|k| {
                HeaderValue::from_str(k.trim()).map_err(|_| {
                    UpstreamError::Configuration(
                        "subscription key contains invalid characters".to_string(),
                    )
                })
            })
            .transpose()?
            .map(|mut v| {
                v.set_sensitive(true);
                v
            });

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Whether the client has credentials.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn credentials(&self) -> Result<&HeaderValue, UpstreamError> {
        self.api_key.as_ref().ok_or_else(|| {
            UpstreamError::Configuration("no subscription key configured".to_string())
        })
    }

    /// Issue a GET and return the body of a successful response.
    ///
    /// Returns `Ok(None)` for a 404 when `not_found` is `Empty`.
    async fn get_text(
        &self,
        path: &str,
        query: &[(&str, String)],
        not_found: NotFound,
    ) -> Result<Option<String>, UpstreamError> {
        let key = self.credentials()?;
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .header(SUBSCRIPTION_KEY_HEADER, key.clone())
            .query(query)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND && not_found == NotFound::Empty {
            debug!(path, "Upstream returned 404, treating as empty");
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(path, status = status.as_u16(), "Upstream request failed");
            return Err(UpstreamError::Unavailable {
                status: status.as_u16(),
                message: snippet(&body),
            });
        }

        Ok(Some(response.text().await?))
    }
}

/// Deserialize a response body, keeping the raw body on failure.
fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, UpstreamError> {
    serde_json::from_str(body).map_err(|e| malformed(path, e.to_string(), body))
}

fn malformed(path: &str, message: String, body: &str) -> UpstreamError {
    let body = snippet(body);
    warn!(path, error = %message, body = %body, "Malformed upstream response");
    UpstreamError::Malformed {
        message,
        body: Some(body),
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_LEN).collect()
}

/// Query parameter addressing a station by code or UIC code.
fn station_param(station: &StationCode) -> (&'static str, String) {
    if station.is_uic() {
        ("uicCode", station.as_str().to_string())
    } else {
        ("station", station.as_str().to_string())
    }
}

impl RailSource for UpstreamClient {
    async fn fetch_journeys(
        &self,
        station: &StationCode,
        kind: BoardKind,
        date_time: Option<DateTime<FixedOffset>>,
    ) -> Result<Vec<Journey>, UpstreamError> {
        let path = format!("/reisinformatie-api/api/v2/{}", kind.as_str());

        let mut query = vec![station_param(station)];
        if let Some(dt) = date_time {
            query.push(("dateTime", dt.to_rfc3339_opts(SecondsFormat::Secs, false)));
        }

        let body = self
            .get_text(&path, &query, NotFound::Unavailable)
            .await?
            .unwrap_or_default();

        let envelope: Envelope<BoardPayload> = decode(&path, &body)?;

        convert_board(&envelope, kind).map_err(|e| malformed(&path, e.to_string(), &body))
    }

    async fn fetch_composition(
        &self,
        train: TrainNumber,
        station: &StationCode,
    ) -> Result<Option<Composition>, UpstreamError> {
        let path = format!("/virtual-train-api/api/v1/trein/{}/{}", train, station);
        let query = [("features", COMPOSITION_FEATURES.to_string())];

        let Some(body) = self.get_text(&path, &query, NotFound::Empty).await? else {
            return Ok(None);
        };

        let dto: CompositionDto = decode(&path, &body)?;
        Ok(Some(convert_composition(&dto)))
    }

    async fn fetch_journey_details(
        &self,
        train: TrainNumber,
    ) -> Result<Option<JourneyDetails>, UpstreamError> {
        let path = "/reisinformatie-api/api/v2/journey";
        let query = [("train", train.to_string())];

        let Some(body) = self.get_text(path, &query, NotFound::Empty).await? else {
            return Ok(None);
        };

        let envelope: Envelope<JourneyDetailsPayload> = decode(path, &body)?;
        let payload = envelope
            .payload
            .ok_or_else(|| malformed(path, "missing field `payload`".to_string(), &body))?;

        Ok(Some(convert_journey_details(&payload)))
    }

    async fn fetch_station_disruptions(
        &self,
        station: &StationCode,
    ) -> Result<Vec<Disruption>, UpstreamError> {
        let path = format!("/disruptions/v3/station/{}", station);

        let Some(body) = self.get_text(&path, &[], NotFound::Empty).await? else {
            return Ok(Vec::new());
        };

        let records: Vec<DisruptionDto> = decode(&path, &body)?;
        Ok(convert_disruptions(&records))
    }
}
