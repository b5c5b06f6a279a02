use crate::{
    core::viewport::Viewport, layers::base::LayerTrait, prelude::HashMap,
    rendering::context::RenderContext, Error, Result,
};

/// Manages layers for the map, handling ordering and rendering
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<String, Box<dyn LayerTrait>>,
    /// Ordered list of layer IDs for rendering (sorted by z-index)
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            render_order: Vec::new(),
        }
    }

    /// Adds a layer to the manager; ids must be unique
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        if self.layers.contains_key(&layer_id) {
            return Err(Error::Layer(format!("layer '{}' already added", layer_id)));
        }
        let z_index = layer.z_index();

        self.layers.insert(layer_id.clone(), layer);

        // Insert in sorted order by z-index
        let insert_pos = self
            .render_order
            .iter()
            .position(|id| {
                self.layers
                    .get(id)
                    .map(|l| l.z_index() > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());

        self.render_order.insert(insert_pos, layer_id);
        Ok(())
    }

    /// Removes a layer from the manager
    pub fn remove_layer(&mut self, layer_id: &str) -> Result<Option<Box<dyn LayerTrait>>> {
        self.render_order.retain(|id| id != layer_id);
        Ok(self.layers.remove(layer_id))
    }

    /// Gets a reference to a layer by ID
    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layers.get(layer_id).map(|l| l.as_ref())
    }

    /// Applies a function to a specific layer mutably
    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layers.get_mut(layer_id).map(|layer| f(layer.as_mut()))
    }

    /// Lists all layer IDs in render order
    pub fn list_layers(&self) -> Vec<String> {
        self.render_order.clone()
    }

    /// Renders all visible layers in order
    pub fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        let viewport_bounds = viewport.bounds();

        for layer_id in &self.render_order {
            if let Some(layer) = self.layers.get_mut(layer_id) {
                if layer.is_visible() && layer.intersects_bounds(&viewport_bounds) {
                    layer.render(context, viewport)?;
                }
            }
        }
        Ok(())
    }

    /// Gets the number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Checks if the manager is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::group::LayerGroup;

    #[test]
    fn test_render_order_follows_z_index() {
        let mut manager = LayerManager::new();
        let mut top = LayerGroup::new("top".to_string(), "Top".to_string());
        top.set_z_index(10);
        let bottom = LayerGroup::new("bottom".to_string(), "Bottom".to_string());

        manager.add_layer(Box::new(top)).unwrap();
        manager.add_layer(Box::new(bottom)).unwrap();

        assert_eq!(manager.list_layers(), vec!["bottom".to_string(), "top".to_string()]);
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut manager = LayerManager::new();
        manager
            .add_layer(Box::new(LayerGroup::new("lte".to_string(), "LTE".to_string())))
            .unwrap();
        let second = manager.add_layer(Box::new(LayerGroup::new("lte".to_string(), "LTE".to_string())));

        assert!(matches!(second, Err(Error::Layer(_))));
        assert_eq!(manager.len(), 1);
    }
}
