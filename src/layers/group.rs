use crate::{
    core::{
        geo::{LatLng, LatLngBounds},
        viewport::Viewport,
    },
    layers::{
        base::{LayerProperties, LayerTrait},
        marker::CircleMarker,
    },
    rendering::context::RenderContext,
    Result,
};

/// A named collection of markers toggled as one unit, like `L.layerGroup`.
///
/// Hiding a group keeps its markers; only rendering skips them.
pub struct LayerGroup {
    properties: LayerProperties,
    markers: Vec<CircleMarker>,
}

impl LayerGroup {
    crate::impl_layer_constructor!(LayerGroup, crate::layers::base::LayerType::Group, markers);

    pub fn add_marker(&mut self, marker: CircleMarker) {
        self.markers.push(marker);
    }

    /// Drops every marker, keeping the group itself and its visibility
    pub fn clear_layers(&mut self) {
        self.markers.clear();
    }

    pub fn markers(&self) -> &[CircleMarker] {
        &self.markers
    }

    pub fn each_marker_mut<F>(&mut self, f: F)
    where
        F: FnMut(&mut CircleMarker),
    {
        self.markers.iter_mut().for_each(f);
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl LayerTrait for LayerGroup {
    crate::impl_layer_trait!(LayerGroup, properties);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        let opacity = self.properties.opacity;
        for marker in &self.markers {
            marker.draw(&self.properties.id, opacity, context, viewport);
        }
        Ok(())
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        let positions: Vec<LatLng> = self.markers.iter().map(|m| m.position()).collect();
        LatLngBounds::from_points(&positions)
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.properties.id,
            "name": self.properties.name,
            "visible": self.properties.visible,
            "marker_count": self.markers.len(),
        })
    }
}
