//! HTTP client for the tower backend

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::core::config::{ApiConfig, SearchConfig};
use crate::towers::model::{SearchParams, SearchResult, ServiceStatus, Tower};

/// Message used when a failed response carries no usable `error` field
pub const SEARCH_FAILED: &str = "Search failed";

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Non-success response; `message` comes from the body's `error` field
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("{}", .0.join("; "))]
    InvalidParams(Vec<String>),

    #[error("Search failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Backend operations the client side depends on
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TowerApi {
    /// Towers within `params.radius` km of the point
    async fn search_towers(&self, params: SearchParams) -> Result<SearchResult, SearchError>;

    /// Usage counters for the status panel
    async fn status(&self) -> Result<ServiceStatus, SearchError>;

    async fn get_tower(&self, id: i64) -> Result<Tower, SearchError>;
}

/// Extracts the user-facing message from a failed response body.
///
/// The backend sends `{"error": "..."}`, or `{"error": [..]}` when several
/// parameters failed validation.
pub fn backend_error_message(body: &str) -> String {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return SEARCH_FAILED.to_string(),
    };

    match value.get("error") {
        Some(serde_json::Value::String(message)) if !message.is_empty() => message.clone(),
        Some(serde_json::Value::Array(messages)) => {
            let joined: Vec<&str> = messages.iter().filter_map(|m| m.as_str()).collect();
            if joined.is_empty() {
                SEARCH_FAILED.to_string()
            } else {
                joined.join("; ")
            }
        }
        _ => SEARCH_FAILED.to_string(),
    }
}

#[derive(Clone)]
pub struct HttpTowerClient {
    client: reqwest::Client,
    api: ApiConfig,
    min_radius_km: f64,
    max_radius_km: f64,
}

impl HttpTowerClient {
    pub fn new(api: ApiConfig, search: &SearchConfig) -> Result<Self, SearchError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .user_agent(concat!("towermap/", env!("CARGO_PKG_VERSION")))
            .tcp_keepalive(std::time::Duration::from_secs(30));

        Ok(Self {
            client: builder.build()?,
            api,
            min_radius_km: search.min_radius_km as f64,
            max_radius_km: search.max_radius_km as f64,
        })
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SearchError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SearchError::Backend {
                status: status.as_u16(),
                message: backend_error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| SearchError::Decode(e.to_string()))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TowerApi for HttpTowerClient {
    async fn search_towers(&self, params: SearchParams) -> Result<SearchResult, SearchError> {
        let errors = params.validate(self.min_radius_km, self.max_radius_km);
        if !errors.is_empty() {
            return Err(SearchError::InvalidParams(errors));
        }

        let url = self.api.url(&self.api.search_path);
        log::debug!(
            "POST {} lat={} lon={} radius={}km",
            url,
            params.lat,
            params.lon,
            params.radius
        );

        let response = self.client.post(&url).json(&params).send().await?;
        Self::decode(response).await
    }

    async fn status(&self) -> Result<ServiceStatus, SearchError> {
        let url = self.api.url(&self.api.status_path);
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn get_tower(&self, id: i64) -> Result<Tower, SearchError> {
        let url = format!("{}/{}", self.api.url(&self.api.tower_path), id);
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }
}
