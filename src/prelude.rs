//! Prelude module for common towermap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use towermap::prelude::*;`

pub use crate::core::{
    config::{ApiConfig, GeocoderConfig, MapConfig, SearchConfig, TowerMapConfig},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{Map, MapOptions},
    viewport::Viewport,
};

pub use crate::layers::{
    base::LayerTrait,
    group::LayerGroup,
    manager::LayerManager,
    marker::CircleMarker,
    tile::{TileLayer, TileLayerOptions},
    vector::{Circle, Color, PathStyle},
};

pub use crate::rendering::context::{DrawCommand, RenderContext};

pub use crate::search::{Geocoder, LocationResolver, NominatimGeocoder, ResolutionError, ResolvedPoint};

pub use crate::towers::{
    HttpTowerClient, Radio, SearchError, SearchParams, SearchResult, ServiceStatus, Tower,
    TowerApi,
};

pub use crate::ui::{
    OperatorSelect, Popup, RadiusSlider, ResultSummary, ResultsPanel, SearchControls,
    StatusIndicator,
};

pub use crate::app::{FilterSync, SearchOrchestrator, SearchOutcome};
pub use crate::view::MapView;

pub use crate::{Error, Result};

// Fast hash collections used internally
pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
