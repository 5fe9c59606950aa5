//! Core library for the `cep-weather` service.
//!
//! This crate defines:
//! - Postal code (CEP) validation
//! - An injectable HTTP fetch capability and its reqwest implementation
//! - The ViaCEP city resolver and the WeatherAPI.com temperature resolver
//! - The request flow that turns a CEP into a [`Temperature`]
//! - Configuration loading
//!
//! It is used by `cep-weather-server`, but the lookup flow has no dependency on
//! any HTTP framework and can be reused by other binaries.

pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod provider;
pub mod service;
pub mod validation;

pub use config::Config;
pub use error::{LookupError, WeatherError};
pub use fetch::{FetchError, FetchResponse, HttpFetch, ReqwestFetcher};
pub use model::Temperature;
pub use provider::{CepWeatherClient, ProviderId, WeatherLookup};
pub use service::current_temperature;
pub use validation::{PostalCode, is_valid_postal_code};
