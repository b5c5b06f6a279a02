use crate::core::constants::TILE_SIZE;
use crate::core::geo::{LatLng, LatLngBounds, Point, EARTH_RADIUS};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 19.0),
            size,
            min_zoom: 0.0,
            max_zoom: 19.0,
        }
    }

    /// Sets the center of the viewport, clamped to the projectable world
    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(
            LatLng::clamp_lat(center.lat),
            center.lng.clamp(-180.0, 180.0),
        );
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets center and zoom in one step
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.set_center(center);
        self.set_zoom(zoom);
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level (EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let z = zoom.unwrap_or(self.zoom);
        let scale = TILE_SIZE as f64 * 2_f64.powf(z);
        let mercator = lat_lng.to_mercator();
        let world = 2.0 * PI * EARTH_RADIUS;

        Point::new(
            (mercator.x + PI * EARTH_RADIUS) / world * scale,
            (-mercator.y + PI * EARTH_RADIUS) / world * scale,
        )
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom level
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let z = zoom.unwrap_or(self.zoom);
        let scale = TILE_SIZE as f64 * 2_f64.powf(z);
        let world = 2.0 * PI * EARTH_RADIUS;

        let x = (pixel.x / scale) * world - PI * EARTH_RADIUS;
        let y = PI * EARTH_RADIUS - (pixel.y / scale) * world;

        LatLng::from_mercator(Point::new(x, y))
    }

    /// Converts a geographical coordinate to container pixel coordinates
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let origin = self.project(&self.center, None);
        let projected = self.project(lat_lng, None);
        projected
            .subtract(&origin)
            .add(&Point::new(self.size.x / 2.0, self.size.y / 2.0))
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let origin = self.project(&self.center, None);
        let projected = pixel
            .subtract(&Point::new(self.size.x / 2.0, self.size.y / 2.0))
            .add(&origin);
        self.unproject(&projected, None)
    }

    /// Gets the current viewport bounds in geographical coordinates
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.pixel_to_lat_lng(&self.size);

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    /// Largest integer zoom at which `bounds` fits inside the viewport shrunk
    /// by `padding` pixels on every side
    pub fn zoom_for_bounds(&self, bounds: &LatLngBounds, padding: f64) -> f64 {
        let available = Point::new(
            (self.size.x - 2.0 * padding).max(1.0),
            (self.size.y - 2.0 * padding).max(1.0),
        );

        let mut best_zoom = self.min_zoom;
        for test_zoom in (self.min_zoom.ceil() as i32)..=(self.max_zoom.floor() as i32) {
            let zoom = test_zoom as f64;
            let nw = self.project(&bounds.north_west(), Some(zoom));
            let se = self.project(&bounds.south_east(), Some(zoom));

            let width = (se.x - nw.x).abs();
            let height = (se.y - nw.y).abs();

            if width <= available.x && height <= available.y {
                best_zoom = zoom;
            } else {
                break;
            }
        }
        best_zoom
    }

    /// Fits the viewport to contain the given bounds with a pixel padding margin
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64) {
        let zoom = self.zoom_for_bounds(bounds, padding);
        self.set_view(bounds.center(), zoom);
    }

    /// Gets the resolution in meters per pixel at the current zoom level
    pub fn resolution(&self) -> f64 {
        let earth_circumference = 40_075_016.0;
        earth_circumference / (TILE_SIZE as f64 * 2_f64.powf(self.zoom))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_creation() {
        let viewport = Viewport::new(
            LatLng::new(40.7128, -74.0060),
            10.0,
            Point::new(800.0, 600.0),
        );

        assert_eq!(viewport.zoom, 10.0);
        assert_eq!(viewport.center.lat, 40.7128);
        assert_eq!(viewport.size.x, 800.0);
    }

    #[test]
    fn test_coordinate_conversion() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));

        let center_lat_lng = viewport.pixel_to_lat_lng(&Point::new(256.0, 256.0));
        assert!(center_lat_lng.lat.abs() < 0.01);
        assert!(center_lat_lng.lng.abs() < 0.01);

        let pixel = viewport.lat_lng_to_pixel(&LatLng::new(10.0, 20.0));
        let back = viewport.pixel_to_lat_lng(&pixel);
        assert!((back.lat - 10.0).abs() < 1e-6);
        assert!((back.lng - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_limits() {
        let mut viewport = Viewport::default();
        viewport.set_zoom_limits(2.0, 15.0);

        viewport.set_zoom(1.0);
        assert_eq!(viewport.zoom, 2.0);

        viewport.set_zoom(20.0);
        assert_eq!(viewport.zoom, 15.0);
    }

    #[test]
    fn test_fit_bounds_smaller_area_zooms_in() {
        let mut viewport = Viewport::new(LatLng::new(39.8, -98.5), 5.0, Point::new(800.0, 600.0));
        let center = LatLng::new(40.7, -74.0);

        viewport.fit_bounds(&center.to_bounds(50_000.0), 20.0);
        let wide = viewport.zoom;
        assert!((viewport.center.lat - 40.7).abs() < 1e-9);
        assert!((viewport.center.lng + 74.0).abs() < 1e-9);

        viewport.fit_bounds(&center.to_bounds(1_000.0), 20.0);
        assert!(viewport.zoom > wide);
    }

    #[test]
    fn test_fit_bounds_respects_padding() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 5.0, Point::new(800.0, 600.0));
        let bounds = LatLng::new(0.0, 0.0).to_bounds(10_000.0);

        let zoom = viewport.zoom_for_bounds(&bounds, 20.0);
        let nw = viewport.project(&bounds.north_west(), Some(zoom));
        let se = viewport.project(&bounds.south_east(), Some(zoom));
        assert!((se.y - nw.y).abs() <= 600.0 - 40.0);
    }
}
