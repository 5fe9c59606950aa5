use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use cep_weather_core::{WeatherError, WeatherLookup, current_temperature};

#[derive(Debug, Clone)]
pub struct AppState {
    lookup: Arc<dyn WeatherLookup>,
}

impl AppState {
    pub fn new(lookup: Arc<dyn WeatherLookup>) -> Self {
        Self { lookup }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/weather", get(weather)).with_state(state)
}

async fn weather(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    // First value wins when `cep` is repeated.
    let cep = params
        .iter()
        .find(|(name, _)| name == "cep")
        .map(|(_, value)| value.as_str());

    match current_temperature(state.lookup.as_ref(), cep).await {
        Ok(temperature) => Json(temperature).into_response(),
        Err(err) => (status_for(&err), err.to_string()).into_response(),
    }
}

fn status_for(err: &WeatherError) -> StatusCode {
    match err {
        WeatherError::InvalidZipcode => StatusCode::UNPROCESSABLE_ENTITY,
        WeatherError::ZipcodeNotFound(_) | WeatherError::TemperatureNotFound(_) => {
            StatusCode::NOT_FOUND
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, header},
    };
    use cep_weather_core::{LookupError, PostalCode, ProviderId};
    use tower::ServiceExt;

    use super::*;

    #[derive(Debug, Default)]
    struct FakeLookup {
        city: Option<&'static str>,
        celsius: Option<f64>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherLookup for FakeLookup {
        async fn resolve_city(&self, _cep: &PostalCode) -> Result<String, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.city.map(str::to_owned).ok_or_else(|| LookupError::NotFound {
                provider: ProviderId::ViaCep,
                detail: "not found".into(),
            })
        }

        async fn resolve_temperature(&self, _city: &str) -> Result<f64, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.celsius.ok_or_else(|| LookupError::NotFound {
                provider: ProviderId::WeatherApi,
                detail: "not found".into(),
            })
        }
    }

    async fn call(lookup: Arc<FakeLookup>, uri: &str) -> (StatusCode, String, String) {
        let res = router(AppState::new(lookup))
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = res.status();
        let content_type = res
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();

        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn invalid_zipcode_is_422() {
        let lookup = Arc::new(FakeLookup::default());
        let (status, content_type, body) = call(lookup.clone(), "/weather?cep=123").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(content_type.starts_with("text/plain"));
        assert_eq!(body, "invalid zipcode");
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_cep_is_422() {
        let (status, _, body) = call(Arc::new(FakeLookup::default()), "/weather").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, "invalid zipcode");
    }

    #[tokio::test]
    async fn unknown_zipcode_is_404() {
        let (status, _, body) =
            call(Arc::new(FakeLookup::default()), "/weather?cep=12345678").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "can not find zipcode");
    }

    #[tokio::test]
    async fn missing_temperature_is_404() {
        let lookup = Arc::new(FakeLookup { city: Some("Cidade Fake"), ..Default::default() });
        let (status, _, body) = call(lookup, "/weather?cep=12345678").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "can not find temperature");
    }

    #[tokio::test]
    async fn success_returns_all_units() {
        let lookup = Arc::new(FakeLookup {
            city: Some("Cidade Fake"),
            celsius: Some(30.0),
            ..Default::default()
        });
        let (status, content_type, body) = call(lookup, "/weather?cep=12345678").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json");
        assert_eq!(body, r#"{"temp_C":30,"temp_F":86,"temp_K":303}"#);
    }

    #[tokio::test]
    async fn repeated_cep_uses_first_value() {
        let lookup = Arc::new(FakeLookup {
            city: Some("Cidade Fake"),
            celsius: Some(30.0),
            ..Default::default()
        });
        let (status, _, body) = call(lookup.clone(), "/weather?cep=12345678&cep=123").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"temp_C":30,"temp_F":86,"temp_K":303}"#);

        let (status, _, body) = call(lookup, "/weather?cep=123&cep=12345678").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, "invalid zipcode");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (status, _, _) = call(Arc::new(FakeLookup::default()), "/forecast").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
