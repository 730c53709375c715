//! NS rail-information API client.
//!
//! This module provides an HTTP client for the four upstream read
//! endpoints the pipeline consumes: station boards, train compositions,
//! journey details, and station disruptions.
//!
//! Key characteristics of the upstream API:
//! - Every request carries a subscription key header; a client without
//!   one fails before any network attempt
//! - A 404 from the composition, journey-details and disruptions endpoints
//!   means "nothing there", not failure
//! - Timestamps carry colon-less offsets ("+0100")

mod client;
mod convert;
mod error;
mod mock;
mod source;
mod types;

pub use client::{DEFAULT_BASE_URL, SUBSCRIPTION_KEY_HEADER, UpstreamClient, UpstreamConfig};
pub use convert::{ConversionError, parse_timestamp};
pub use error::UpstreamError;
pub use mock::{MockCall, MockFailure, MockRailSource};
pub use source::RailSource;
