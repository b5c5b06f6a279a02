use crate::{
    core::{
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    layers::{base::LayerTrait, manager::LayerManager},
    rendering::context::RenderContext,
    Error, Result,
};

#[derive(Debug, Clone)]
pub struct MapOptions {
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
    pub attribution_control: bool,
    pub zoom_control: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            min_zoom: None,
            max_zoom: None,
            attribution_control: true,
            zoom_control: true,
        }
    }
}

/// The map widget: a viewport plus the layers attached to it
pub struct Map {
    viewport: Viewport,
    layer_manager: LayerManager,
    options: MapOptions,
}

impl Map {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self::with_options(Viewport::new(center, zoom, size), MapOptions::default())
    }

    pub fn with_options(viewport: Viewport, options: MapOptions) -> Self {
        let mut map = Self {
            viewport,
            layer_manager: LayerManager::new(),
            options,
        };

        if let (Some(min), Some(max)) = (map.options.min_zoom, map.options.max_zoom) {
            map.viewport.set_zoom_limits(min, max);
        }

        map
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()> {
        if !center.is_valid() {
            return Err(Error::InvalidCoordinates(format!(
                "{}, {}",
                center.lat, center.lng
            )));
        }
        self.viewport.set_view(center, zoom);
        log::debug!(
            "view set to {:.4}, {:.4} at zoom {}",
            self.viewport.center.lat,
            self.viewport.center.lng,
            self.viewport.zoom
        );
        Ok(())
    }

    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64) -> Result<()> {
        if !bounds.center().is_valid() {
            return Err(Error::InvalidCoordinates(format!("{:?}", bounds)));
        }
        self.viewport.fit_bounds(bounds, padding);
        Ok(())
    }

    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        self.layer_manager.add_layer(layer)
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Result<Option<Box<dyn LayerTrait>>> {
        self.layer_manager.remove_layer(layer_id)
    }

    pub fn has_layer(&self, layer_id: &str) -> bool {
        self.layer_manager.get_layer(layer_id).is_some()
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layer_manager.get_layer(layer_id)
    }

    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layer_manager.with_layer_mut(layer_id, f)
    }

    pub fn list_layers(&self) -> Vec<String> {
        self.layer_manager.list_layers()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Renders every visible layer in z-order into `context`
    pub fn render(&mut self, context: &mut RenderContext) -> Result<()> {
        self.layer_manager.render(context, &self.viewport)
    }
}
