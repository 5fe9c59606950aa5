use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use tracing::{debug, instrument};
use url::Url;

use crate::{
    LookupError, PostalCode,
    fetch::HttpFetch,
    provider::{ProviderId, endpoint, truncate_body},
};

pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br";

/// Resolves a CEP to its locality through ViaCEP (`/ws/{cep}/json/`).
#[derive(Debug, Clone)]
pub struct ViaCepProvider {
    base_url: Url,
    http: Arc<dyn HttpFetch>,
}

impl ViaCepProvider {
    pub fn new(base_url: Url, http: Arc<dyn HttpFetch>) -> Self {
        Self { base_url, http }
    }

    fn lookup_url(&self, cep: &PostalCode) -> Url {
        endpoint(&self.base_url, &["ws", cep.as_str(), "json", ""])
    }

    #[instrument(skip_all, fields(cep = %cep))]
    pub async fn resolve_city(&self, cep: &PostalCode) -> Result<String, LookupError> {
        let url = self.lookup_url(cep);
        debug!(%url, "querying ViaCEP");

        let res = self.http.get(&url).await.map_err(|source| LookupError::Transport {
            provider: ProviderId::ViaCep,
            source,
        })?;

        if !res.is_success() {
            return Err(LookupError::NotFound {
                provider: ProviderId::ViaCep,
                detail: format!("status {}: {}", res.status, truncate_body(&res.body)),
            });
        }

        let parsed: ViaCepResponse = serde_json::from_str(&res.body).map_err(|source| {
            LookupError::Parse { provider: ProviderId::ViaCep, source }
        })?;

        if parsed.erro {
            return Err(LookupError::NotFound {
                provider: ProviderId::ViaCep,
                detail: "postal code does not exist".into(),
            });
        }

        let city = parsed.localidade.trim();
        if city.is_empty() {
            return Err(LookupError::NotFound {
                provider: ProviderId::ViaCep,
                detail: "response has no locality".into(),
            });
        }

        debug!(city, "resolved city");
        Ok(city.to_owned())
    }
}

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    localidade: String,
    #[serde(default, deserialize_with = "error_flag")]
    erro: bool,
}

/// ViaCEP has answered both `"erro": true` and `"erro": "true"`.
fn error_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(flag) => flag,
        Flag::Text(text) => text.eq_ignore_ascii_case("true"),
    })
}
