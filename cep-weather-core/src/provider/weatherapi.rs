use std::{fmt, sync::Arc};

use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::{
    LookupError,
    fetch::HttpFetch,
    provider::{ProviderId, endpoint, truncate_body},
};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";

/// Current temperature for a city from WeatherAPI.com (`/v1/current.json`).
#[derive(Clone)]
pub struct WeatherApiProvider {
    api_key: Option<String>,
    base_url: Url,
    http: Arc<dyn HttpFetch>,
}

impl WeatherApiProvider {
    pub fn new(api_key: Option<String>, base_url: Url, http: Arc<dyn HttpFetch>) -> Self {
        Self { api_key, base_url, http }
    }

    fn current_url(&self, api_key: &str, city: &str) -> Url {
        let mut url = endpoint(&self.base_url, &["v1", "current.json"]);
        url.query_pairs_mut().append_pair("key", api_key).append_pair("q", city);
        url
    }

    #[instrument(skip_all, fields(city = %city))]
    pub async fn resolve_temperature(&self, city: &str) -> Result<f64, LookupError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LookupError::Configuration("weatherapi key not set".into()))?;

        let url = self.current_url(api_key, city);
        debug!(endpoint = %self.base_url, "querying WeatherAPI current conditions");

        let res = self.http.get(&url).await.map_err(|source| LookupError::Transport {
            provider: ProviderId::WeatherApi,
            source,
        })?;

        if !res.is_success() {
            return Err(LookupError::NotFound {
                provider: ProviderId::WeatherApi,
                detail: format!("status {}: {}", res.status, truncate_body(&res.body)),
            });
        }

        let parsed: WaResponse = serde_json::from_str(&res.body).map_err(|source| {
            LookupError::Parse { provider: ProviderId::WeatherApi, source }
        })?;

        debug!(temp_c = parsed.current.temp_c, "resolved temperature");
        Ok(parsed.current.temp_c)
    }
}

impl fmt::Debug for WeatherApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherApiProvider")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url.as_str())
            .field("http", &self.http)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: WaCurrent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::fake::FakeFetch;

    fn provider(api_key: Option<&str>, http: Arc<dyn HttpFetch>) -> WeatherApiProvider {
        WeatherApiProvider::new(
            api_key.map(str::to_owned),
            Url::parse(DEFAULT_BASE_URL).unwrap(),
            http,
        )
    }

    #[tokio::test]
    async fn returns_current_celsius() {
        let fetch = FakeFetch::body(r#"{"current":{"temp_c":22.5}}"#);
        let temp = provider(Some("KEY"), fetch).resolve_temperature("São Paulo").await.unwrap();
        assert_eq!(temp, 22.5);
    }

    #[tokio::test]
    async fn passes_through_zero_and_negative() {
        for (body, expected) in [
            (r#"{"current":{"temp_c":0}}"#, 0.0),
            (r#"{"current":{"temp_c":-3.2}}"#, -3.2),
        ] {
            let temp = provider(Some("KEY"), FakeFetch::body(body))
                .resolve_temperature("Curitiba")
                .await
                .unwrap();
            assert_eq!(temp, expected);
        }
    }

    #[tokio::test]
    async fn encodes_key_and_city_in_query() {
        let fetch = FakeFetch::body(r#"{"current":{"temp_c":30}}"#);
        provider(Some("K&Y"), fetch.clone())
            .resolve_temperature("São Paulo & Co")
            .await
            .unwrap();

        let url = &fetch.requests()[0];
        assert_eq!(url.path(), "/v1/current.json");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            [
                ("key".to_string(), "K&Y".to_string()),
                ("q".to_string(), "São Paulo & Co".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn missing_key_fails_before_request() {
        for key in [None, Some(""), Some("  ")] {
            let fetch = FakeFetch::body(r#"{"current":{"temp_c":30}}"#);
            let err = provider(key, fetch.clone())
                .resolve_temperature("Recife")
                .await
                .unwrap_err();

            assert!(err.is_configuration());
            assert!(err.to_string().contains("weatherapi key not set"));
            assert!(fetch.requests().is_empty());
        }
    }

    #[tokio::test]
    async fn invalid_json_is_parse_error() {
        for body in ["not a valid JSON", r#"{"location":{}}"#] {
            let err = provider(Some("KEY"), FakeFetch::body(body))
                .resolve_temperature("São Paulo")
                .await
                .unwrap_err();
            assert!(matches!(err, LookupError::Parse { provider: ProviderId::WeatherApi, .. }));
        }
    }

    #[tokio::test]
    async fn transport_failure_is_transport_error() {
        let err = provider(Some("KEY"), FakeFetch::failing())
            .resolve_temperature("São Paulo")
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Transport { .. }));
    }

    #[tokio::test]
    async fn unknown_location_status_is_not_found() {
        let body = r#"{"error":{"code":1006,"message":"No matching location found."}}"#;
        let err = provider(Some("KEY"), FakeFetch::status(400, body))
            .resolve_temperature("Atlantis")
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::NotFound { provider: ProviderId::WeatherApi, .. }));
    }

    #[test]
    fn debug_redacts_key() {
        let p = provider(Some("SECRET"), FakeFetch::body("{}"));
        let out = format!("{p:?}");
        assert!(!out.contains("SECRET"));
        assert!(out.contains("<redacted>"));
    }
}
