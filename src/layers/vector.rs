use crate::{
    core::{
        geo::{LatLng, LatLngBounds},
        viewport::Viewport,
    },
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::{PathRenderStyle, RenderContext},
    Result,
};
use serde::{Deserialize, Serialize};

/// Serializable RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0x33, 0x88, 0xff)
    }
}

/// Leaflet-style path options shared by circles and circle markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    /// Stroke color
    pub color: Color,
    pub fill_color: Color,
    /// Stroke width in pixels
    pub weight: f32,
    /// Stroke opacity (0.0 to 1.0)
    pub opacity: f32,
    /// Fill opacity (0.0 to 1.0)
    pub fill_opacity: f32,
    /// Stroke dash pattern (empty for solid line)
    pub dash_array: Vec<f32>,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            color: Color::default(),
            fill_color: Color::default(),
            weight: 3.0,
            opacity: 1.0,
            fill_opacity: 0.2,
            dash_array: Vec::new(),
        }
    }
}

impl PathStyle {
    /// Same stroke and fill color
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            fill_color: color,
            ..Self::default()
        }
    }

    /// Resolves the style against a layer-wide opacity multiplier
    pub fn to_render_style(&self, opacity_multiplier: f32) -> PathRenderStyle {
        PathRenderStyle {
            stroke_color: self.color,
            fill_color: self.fill_color,
            stroke_width: self.weight,
            stroke_opacity: self.opacity * opacity_multiplier,
            fill_opacity: self.fill_opacity * opacity_multiplier,
            dash_pattern: self.dash_array.clone(),
        }
    }
}

/// A circle with a geographic radius, like `L.circle`
pub struct Circle {
    properties: LayerProperties,
    center: LatLng,
    /// Radius in meters
    radius: f64,
    style: PathStyle,
}

impl Circle {
    pub fn new(id: String, center: LatLng, radius: f64) -> Self {
        let properties = LayerProperties::new(id, "Circle".to_string(), LayerType::Vector);
        Self {
            properties,
            center,
            radius: radius.max(0.0),
            style: PathStyle::default(),
        }
    }

    pub fn with_style(mut self, style: PathStyle) -> Self {
        self.style = style;
        self
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    /// Radius in meters
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn style(&self) -> &PathStyle {
        &self.style
    }

    /// Geographic bounds of the circle
    pub fn lat_lng_bounds(&self) -> LatLngBounds {
        self.center.to_bounds(self.radius)
    }

    /// Radius in screen pixels at the viewport's zoom
    pub fn pixel_radius(&self, viewport: &Viewport) -> f64 {
        let bounds = self.lat_lng_bounds();
        let top = viewport.lat_lng_to_pixel(&LatLng::new(bounds.north_east.lat, self.center.lng));
        let middle = viewport.lat_lng_to_pixel(&self.center);
        (middle.y - top.y).abs()
    }
}

impl LayerTrait for Circle {
    crate::impl_layer_trait!(Circle, properties);

    fn bounds(&self) -> Option<LatLngBounds> {
        Some(self.lat_lng_bounds())
    }

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        let center = viewport.lat_lng_to_pixel(&self.center);
        let style = self.style.to_render_style(self.opacity());
        context.render_circle(self.id(), center, self.pixel_radius(viewport), style);
        Ok(())
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "center": { "lat": self.center.lat, "lng": self.center.lng },
            "radius": self.radius,
            "color": self.style.color.to_hex(),
            "fill_opacity": self.style.fill_opacity,
        })
    }
}
