use crate::{
    core::{
        constants::MARKER_RADIUS,
        geo::{LatLng, LatLngBounds},
        viewport::Viewport,
    },
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        vector::PathStyle,
    },
    prelude::HashMap,
    rendering::context::RenderContext,
    ui::popup::Popup,
    Result,
};

/// A fixed pixel-radius circle at a position, like `L.circleMarker`
pub struct CircleMarker {
    properties: LayerProperties,
    position: LatLng,
    /// Radius in pixels
    radius: f32,
    style: PathStyle,
    popup: Option<Popup>,
    /// Arbitrary feature data the marker was created from
    data: HashMap<String, serde_json::Value>,
}

impl CircleMarker {
    pub fn new(id: String, position: LatLng) -> Self {
        let properties = LayerProperties::new(id, "CircleMarker".to_string(), LayerType::Marker);
        Self {
            properties,
            position,
            radius: MARKER_RADIUS,
            style: PathStyle::default(),
            popup: None,
            data: HashMap::default(),
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_style(mut self, style: PathStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_popup(mut self, popup: Popup) -> Self {
        self.popup = Some(popup);
        self
    }

    /// Attach a data property to this marker
    pub fn with_property<V: Into<serde_json::Value>>(mut self, key: &str, value: V) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn style(&self) -> &PathStyle {
        &self.style
    }

    /// Changes only the opacities, leaving colors and size alone
    pub fn set_opacities(&mut self, fill_opacity: f32, opacity: f32) {
        self.style.fill_opacity = fill_opacity.clamp(0.0, 1.0);
        self.style.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    /// Queue this marker into `context` on behalf of the layer `layer_id`
    pub fn draw(&self, layer_id: &str, opacity: f32, context: &mut RenderContext, viewport: &Viewport) {
        let position = viewport.lat_lng_to_pixel(&self.position);
        let style = self.style.to_render_style(opacity * self.properties.opacity);
        context.render_circle_marker(layer_id, self.id(), position, self.radius, style);
    }
}

impl LayerTrait for CircleMarker {
    crate::impl_layer_trait!(CircleMarker, properties);

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "position": {
                "lat": self.position.lat,
                "lng": self.position.lng
            },
            "radius": self.radius,
            "fill_color": self.style.fill_color.to_hex(),
            "fill_opacity": self.style.fill_opacity,
            "popup": self.popup.as_ref().map(|popup| popup.title.clone()),
        })
    }

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        let id = self.properties.id.clone();
        self.draw(&id, 1.0, context, viewport);
        Ok(())
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        Some(LatLngBounds::new(self.position, self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::vector::Color;

    #[test]
    fn test_marker_properties() {
        let marker = CircleMarker::new("m1".to_string(), LatLng::new(40.7, -74.0))
            .with_property("operator", "Verizon")
            .with_property("samples", 12);

        assert_eq!(marker.property("operator").and_then(|v| v.as_str()), Some("Verizon"));
        assert_eq!(marker.property("samples").and_then(|v| v.as_u64()), Some(12));
        assert!(marker.property("missing").is_none());
        assert_eq!(marker.radius(), MARKER_RADIUS);
    }

    #[test]
    fn test_set_opacities_keeps_colors() {
        let color = Color::rgb(0x33, 0x99, 0xff);
        let mut marker = CircleMarker::new("m1".to_string(), LatLng::new(0.0, 0.0))
            .with_style(PathStyle::solid(color));

        marker.set_opacities(0.1, 0.1);
        assert_eq!(marker.style().fill_opacity, 0.1);
        assert_eq!(marker.style().opacity, 0.1);
        assert_eq!(marker.style().fill_color, color);
    }
}
