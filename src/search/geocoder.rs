use async_trait::async_trait;
use serde::Deserialize;

use crate::core::config::GeocoderConfig;
use crate::search::resolver::{ResolutionError, ResolvedPoint};

/// Free-text place lookup
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Geocoder {
    /// Best match for `query`, or `None` when the provider found nothing
    async fn geocode(&self, query: &str) -> Result<Option<ResolvedPoint>, ResolutionError>;
}

/// One entry of a Nominatim `format=json` response
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimPlace {
    fn into_point(self) -> Result<ResolvedPoint, ResolutionError> {
        let invalid = || ResolutionError::InvalidCoordinates(format!("{}, {}", self.lat, self.lon));
        let lat = self.lat.trim().parse::<f64>().map_err(|_| invalid())?;
        let lon = self.lon.trim().parse::<f64>().map_err(|_| invalid())?;
        Ok(ResolvedPoint {
            lat,
            lon,
            label: self.display_name,
        })
    }
}

/// Geocoder backed by a Nominatim-compatible search endpoint
pub struct NominatimGeocoder {
    client: reqwest::Client,
    config: GeocoderConfig,
}

impl NominatimGeocoder {
    pub fn new(config: GeocoderConfig) -> Result<Self, ResolutionError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ResolutionError::GeocodingFailed(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    fn first_match(body: &str) -> Result<Option<ResolvedPoint>, ResolutionError> {
        let places: Vec<NominatimPlace> = serde_json::from_str(body)
            .map_err(|e| ResolutionError::GeocodingFailed(e.to_string()))?;
        places.into_iter().next().map(NominatimPlace::into_point).transpose()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<ResolvedPoint>, ResolutionError> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("format", "json"),
                ("q", query),
                ("limit", "1"),
                ("countrycodes", self.config.country_codes.as_str()),
            ])
            .header(reqwest::header::USER_AGENT, self.config.user_agent.as_str())
            .send()
            .await
            .map_err(|e| ResolutionError::GeocodingFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolutionError::GeocodingFailed(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ResolutionError::GeocodingFailed(e.to_string()))?;
        Self::first_match(&body)
    }
}
