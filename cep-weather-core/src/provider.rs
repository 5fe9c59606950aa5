use crate::{
    Config, LookupError, PostalCode,
    fetch::HttpFetch,
    provider::{viacep::ViaCepProvider, weatherapi::WeatherApiProvider},
};
use anyhow::Context;
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use tracing::warn;
use url::Url;

pub mod viacep;
pub mod weatherapi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    ViaCep,
    WeatherApi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::ViaCep => "viacep",
            ProviderId::WeatherApi => "weatherapi",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two lookups a `/weather` request needs, in the order it needs them.
#[async_trait]
pub trait WeatherLookup: Send + Sync + Debug {
    async fn resolve_city(&self, cep: &PostalCode) -> Result<String, LookupError>;

    async fn resolve_temperature(&self, city: &str) -> Result<f64, LookupError>;
}

/// ViaCEP for cities, WeatherAPI.com for temperatures.
#[derive(Debug, Clone)]
pub struct CepWeatherClient {
    cities: ViaCepProvider,
    weather: WeatherApiProvider,
}

impl CepWeatherClient {
    pub fn new(cities: ViaCepProvider, weather: WeatherApiProvider) -> Self {
        Self { cities, weather }
    }

    /// Construct both providers from config, sharing one transport.
    ///
    /// A missing API key is not an error here: it surfaces on each
    /// temperature lookup instead.
    pub fn from_config(config: &Config, http: Arc<dyn HttpFetch>) -> anyhow::Result<Self> {
        let viacep_url = parse_base_url(&config.viacep_base_url)
            .with_context(|| format!("Invalid ViaCEP base URL '{}'", config.viacep_base_url))?;
        let weatherapi_url = parse_base_url(&config.weatherapi_base_url).with_context(|| {
            format!("Invalid WeatherAPI base URL '{}'", config.weatherapi_base_url)
        })?;

        let api_key = config.weatherapi_key().map(str::to_owned);
        if api_key.is_none() {
            warn!(
                "No WeatherAPI key configured; every temperature lookup will fail.\n\
                 Hint: set WEATHERAPI_KEY or run `cep-weather configure`."
            );
        }

        Ok(Self {
            cities: ViaCepProvider::new(viacep_url, Arc::clone(&http)),
            weather: WeatherApiProvider::new(api_key, weatherapi_url, http),
        })
    }
}

#[async_trait]
impl WeatherLookup for CepWeatherClient {
    async fn resolve_city(&self, cep: &PostalCode) -> Result<String, LookupError> {
        self.cities.resolve_city(cep).await
    }

    async fn resolve_temperature(&self, city: &str) -> Result<f64, LookupError> {
        self.weather.resolve_temperature(city).await
    }
}

fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        anyhow::bail!("URL cannot carry a path");
    }
    Ok(url)
}

/// Append `segments` to the path of `base`.
fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
