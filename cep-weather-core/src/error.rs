use thiserror::Error;

use crate::{fetch::FetchError, provider::ProviderId};

/// Failure of a single upstream lookup (city or temperature).
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid postal code {0:?}: expected exactly 8 digits")]
    Validation(String),

    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: ProviderId,
        source: FetchError,
    },

    #[error("unexpected response body from {provider}: {source}")]
    Parse {
        provider: ProviderId,
        source: serde_json::Error,
    },

    #[error("{provider} found no match: {detail}")]
    NotFound { provider: ProviderId, detail: String },

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl LookupError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, LookupError::Configuration(_))
    }
}

/// Outcome of a `/weather` request that did not produce a temperature.
///
/// The `Display` output is the exact plain-text body returned to clients.
/// Every city lookup failure collapses into [`WeatherError::ZipcodeNotFound`]
/// and every temperature failure, a missing API key included, into
/// [`WeatherError::TemperatureNotFound`]; the underlying cause stays
/// available through `source()` for logging.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("invalid zipcode")]
    InvalidZipcode,

    #[error("can not find zipcode")]
    ZipcodeNotFound(#[source] LookupError),

    #[error("can not find temperature")]
    TemperatureNotFound(#[source] LookupError),
}
