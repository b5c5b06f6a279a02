use crate::{core::geo::Point, layers::vector::Color, Result};

/// Resolved stroke/fill style for a filled path primitive
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PathRenderStyle {
    pub stroke_color: Color,
    pub fill_color: Color,
    pub stroke_width: f32,
    pub stroke_opacity: f32,
    pub fill_opacity: f32,
    pub dash_pattern: Vec<f32>,
}

/// Commands that can be issued to the render context
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// A raster tile, identified by its fully expanded URL
    Tile {
        url: String,
        bounds: (Point, Point),
        opacity: f32,
    },
    /// A fixed pixel-radius marker
    CircleMarker {
        layer_id: String,
        marker_id: String,
        position: Point,
        radius: f32,
        style: PathRenderStyle,
    },
    /// A circle whose radius is given in meters on the ground
    Circle {
        layer_id: String,
        center: Point,
        radius: f64,
        style: PathRenderStyle,
    },
}

/// Render target that records draw commands for a surface to replay
pub struct RenderContext {
    pub width: u32,
    pub height: u32,
    /// Drawing primitives queue, replayed by whatever surface hosts the map
    pub drawing_queue: Vec<DrawCommand>,
}

impl RenderContext {
    /// Create a new render context
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            drawing_queue: Vec::new(),
        }
    }

    /// Begin a frame
    pub fn begin_frame(&mut self) {
        self.drawing_queue.clear();
    }

    pub fn render_tile(&mut self, url: String, bounds: (Point, Point), opacity: f32) -> Result<()> {
        if bounds.0.x >= bounds.1.x || bounds.0.y >= bounds.1.y {
            return Err(crate::Error::Layer(format!("invalid tile bounds for {}", url)));
        }
        self.drawing_queue.push(DrawCommand::Tile {
            url,
            bounds,
            opacity: opacity.clamp(0.0, 1.0),
        });
        Ok(())
    }

    pub fn render_circle_marker(
        &mut self,
        layer_id: &str,
        marker_id: &str,
        position: Point,
        radius: f32,
        style: PathRenderStyle,
    ) {
        self.drawing_queue.push(DrawCommand::CircleMarker {
            layer_id: layer_id.to_string(),
            marker_id: marker_id.to_string(),
            position,
            radius,
            style,
        });
    }

    pub fn render_circle(&mut self, layer_id: &str, center: Point, radius: f64, style: PathRenderStyle) {
        self.drawing_queue.push(DrawCommand::Circle {
            layer_id: layer_id.to_string(),
            center,
            radius,
            style,
        });
    }

    /// Get the current drawing queue
    pub fn get_drawing_queue(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    /// Marker commands emitted for one layer
    pub fn markers_in_layer<'a>(&'a self, layer_id: &'a str) -> impl Iterator<Item = &'a DrawCommand> + 'a {
        self.drawing_queue.iter().filter(move |command| {
            matches!(command, DrawCommand::CircleMarker { layer_id: id, .. } if id == layer_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_bounds_validation() {
        let mut context = RenderContext::new(256, 256);
        let ok = context.render_tile(
            "https://a.example/0/0/0.png".to_string(),
            (Point::new(0.0, 0.0), Point::new(256.0, 256.0)),
            1.0,
        );
        assert!(ok.is_ok());

        let bad = context.render_tile(
            "https://a.example/0/0/0.png".to_string(),
            (Point::new(10.0, 0.0), Point::new(0.0, 256.0)),
            1.0,
        );
        assert!(bad.is_err());
        assert_eq!(context.get_drawing_queue().len(), 1);

        context.begin_frame();
        assert!(context.get_drawing_queue().is_empty());
    }

    #[test]
    fn test_commands_serialize_with_kind_tag() {
        let mut context = RenderContext::new(256, 256);
        let style = PathRenderStyle {
            stroke_color: Color::rgb(0x33, 0x99, 0xff),
            fill_color: Color::rgb(0x33, 0x99, 0xff),
            stroke_width: 1.0,
            stroke_opacity: 0.5,
            fill_opacity: 0.5,
            dash_pattern: Vec::new(),
        };
        context.render_circle_marker("radio-LTE", "tower-1", Point::new(10.0, 20.0), 6.0, style);

        let json = serde_json::to_value(context.get_drawing_queue()).unwrap();
        assert_eq!(json[0]["kind"], "circle_marker");
        assert_eq!(json[0]["layer_id"], "radio-LTE");
        assert_eq!(json[0]["position"]["x"], 10.0);
        assert_eq!(json[0]["style"]["fill_color"]["b"], 0xff);
    }
}
