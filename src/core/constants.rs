//! Core constants derived from Leaflet defaults and the tower map's look.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Continental US view the map opens on.
pub const DEFAULT_CENTER: (f64, f64) = (39.8, -98.5);

/// Zoom level the map opens on.
pub const DEFAULT_ZOOM: f64 = 5.0;

/// Zoom used by `pan_to` when the caller does not pick one.
pub const DEFAULT_PAN_ZOOM: f64 = 13.0;

/// Pixel margin kept around the search area when fitting the viewport.
pub const FIT_PADDING: f64 = 20.0;

/// Tower marker radius in pixels.
pub const MARKER_RADIUS: f32 = 6.0;

/// Tower marker stroke width in pixels.
pub const MARKER_WEIGHT: f32 = 1.0;

/// Marker fill opacity when the marker matches the operator filter.
pub const MARKER_FILL_OPACITY: f32 = 0.85;

/// Marker stroke opacity when the marker matches the operator filter.
pub const MARKER_STROKE_OPACITY: f32 = 0.6;

/// Fill and stroke opacity of de-emphasized markers.
pub const MARKER_DIMMED_OPACITY: f32 = 0.1;

/// Color used for radio types without an assigned color.
pub const FALLBACK_RADIO_COLOR: &str = "#888888";

/// Search-area overlay color.
pub const SEARCH_AREA_COLOR: &str = "#00cc66";

/// Search-area overlay fill opacity.
pub const SEARCH_AREA_FILL_OPACITY: f32 = 0.05;

/// Meters per kilometer, for converting the search radius.
pub const METERS_PER_KM: f64 = 1000.0;
