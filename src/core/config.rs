//! Runtime configuration for the tower map client
//!
//! Every section has defaults matching the production deployment, so a
//! config file only has to name what it changes. Values are layered:
//! defaults, then an optional JSON document, then `TOWERMAP_*` environment
//! variables.

use crate::core::constants::{DEFAULT_CENTER, DEFAULT_PAN_ZOOM, DEFAULT_ZOOM, FIT_PADDING};
use crate::layers::tile::TileLayerOptions;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Backend endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme and host of the tower backend, without a trailing slash
    pub base_url: String,
    pub search_path: String,
    pub status_path: String,
    /// Prefix for single-tower lookups (`<tower_path>/<id>`)
    pub tower_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5001".to_string(),
            search_path: "/api/towers/search".to_string(),
            status_path: "/api/status".to_string(),
            tower_path: "/api/towers".to_string(),
        }
    }
}

impl ApiConfig {
    /// Joins the base URL with an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Geocoding provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    /// Comma-separated ISO country codes results are restricted to
    pub country_codes: String,
    /// Client identifier sent with every request
    pub user_agent: String,
    /// Number of resolved queries kept in memory; 0 disables caching
    pub cache_capacity: usize,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
            country_codes: "us".to_string(),
            user_agent: "RFTowerMapper/1.0".to_string(),
            cache_capacity: 32,
        }
    }
}

/// Initial map view and base layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center: (f64, f64),
    pub zoom: f64,
    /// Viewport size in pixels (width, height)
    pub size: (f64, f64),
    pub fit_padding: f64,
    pub pan_zoom: f64,
    pub tiles: TileLayerOptions,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            size: (1280.0, 800.0),
            fit_padding: FIT_PADDING,
            pan_zoom: DEFAULT_PAN_ZOOM,
            tiles: TileLayerOptions::carto_dark(),
        }
    }
}

/// Radius slider limits, in kilometers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub min_radius_km: u32,
    pub max_radius_km: u32,
    pub default_radius_km: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_radius_km: 1,
            max_radius_km: 50,
            default_radius_km: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerMapConfig {
    pub api: ApiConfig,
    pub geocoder: GeocoderConfig,
    pub map: MapConfig,
    pub search: SearchConfig,
}

impl TowerMapConfig {
    /// Parses a JSON document; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        log::debug!("loaded config from {}", path.display());
        Self::from_json_str(&contents)
    }

    /// Applies `TOWERMAP_*` environment variables on top of the current values
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup("TOWERMAP_API_BASE") {
            self.api.base_url = base;
        }
        if let Some(endpoint) = lookup("TOWERMAP_GEOCODER") {
            self.geocoder.endpoint = endpoint;
        }
        if let Some(country) = lookup("TOWERMAP_COUNTRY") {
            self.geocoder.country_codes = country;
        }
        if let Some(agent) = lookup("TOWERMAP_USER_AGENT") {
            self.geocoder.user_agent = agent;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let search = &self.search;
        if search.min_radius_km == 0 {
            return Err(Error::Config("min_radius_km must be at least 1".into()));
        }
        if search.min_radius_km > search.max_radius_km {
            return Err(Error::Config(format!(
                "min_radius_km ({}) exceeds max_radius_km ({})",
                search.min_radius_km, search.max_radius_km
            )));
        }
        if !(search.min_radius_km..=search.max_radius_km).contains(&search.default_radius_km) {
            return Err(Error::Config(format!(
                "default_radius_km ({}) outside {}..={}",
                search.default_radius_km, search.min_radius_km, search.max_radius_km
            )));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(Error::Config("api.base_url is empty".into()));
        }
        if !(0.0..=self.map.tiles.max_zoom as f64).contains(&self.map.zoom) {
            return Err(Error::Config(format!(
                "map.zoom ({}) outside 0..={}",
                self.map.zoom, self.map.tiles.max_zoom
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = TowerMapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.map.center, (39.8, -98.5));
        assert_eq!(config.api.url(&config.api.search_path), "http://127.0.0.1:5001/api/towers/search");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = TowerMapConfig::from_json_str(
            r#"{"api": {"base_url": "https://towers.example.org/"}, "search": {"max_radius_km": 25}}"#,
        )
        .unwrap();

        assert_eq!(config.api.url("/api/status"), "https://towers.example.org/api/status");
        assert_eq!(config.search.max_radius_km, 25);
        assert_eq!(config.search.min_radius_km, 1);
        assert_eq!(config.geocoder.country_codes, "us");
    }

    #[test]
    fn test_invalid_radius_range_rejected() {
        let err = TowerMapConfig::from_json_str(r#"{"search": {"min_radius_km": 30, "max_radius_km": 20, "default_radius_km": 25}}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let mut config = TowerMapConfig::default();
        config.apply_overrides(|key| match key {
            "TOWERMAP_API_BASE" => Some("http://10.0.0.2:8080".to_string()),
            "TOWERMAP_COUNTRY" => Some("us,ca".to_string()),
            _ => None,
        });

        assert_eq!(config.api.base_url, "http://10.0.0.2:8080");
        assert_eq!(config.geocoder.country_codes, "us,ca");
        assert_eq!(config.geocoder.user_agent, "RFTowerMapper/1.0");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"geocoder": {{"cache_capacity": 0}}}}"#).unwrap();

        let config = TowerMapConfig::from_file(file.path()).unwrap();
        assert_eq!(config.geocoder.cache_capacity, 0);
    }
}
