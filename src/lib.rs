//! # towermap
//!
//! Client-side core of a cellular tower map, built on a small Leaflet-style
//! map engine.
//!
//! A query string is resolved to a point (literal coordinates or a
//! geocoding lookup), the tower backend is searched around that point, and
//! the result is rendered as color-coded markers grouped into one layer per
//! radio technology. Radio layers can be toggled and markers can be
//! de-emphasized by network operator. UI controls are injected as traits so
//! the same core drives a browser page, a terminal, or a test harness.

pub mod app;
pub mod core;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod search;
pub mod towers;
pub mod ui;
pub mod view;

#[cfg(feature = "wasm")]
pub mod web;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::TowerMapConfig,
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::Map,
    viewport::Viewport,
};

pub use layers::{
    base::LayerTrait, group::LayerGroup, marker::CircleMarker, tile::TileLayer, vector::Circle,
};

pub use app::{filters::FilterSync, orchestrator::SearchOrchestrator};
pub use rendering::context::RenderContext;
pub use search::{LocationResolver, NominatimGeocoder, ResolutionError, ResolvedPoint};
pub use towers::{
    client::{HttpTowerClient, SearchError, TowerApi},
    model::{Radio, SearchResult, ServiceStatus, Tower},
};
pub use view::MapView;

/// Installs `env_logger` with an `info` default filter; later calls are no-ops
#[cfg(feature = "debug")]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type MapError = Error;
