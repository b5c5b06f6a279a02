use crate::{
    core::{
        geo::TileCoord,
        viewport::Viewport,
    },
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::RenderContext,
    Result,
};

/// Configuration for a tile layer
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TileLayerOptions {
    /// URL template, e.g. `https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png`
    pub url_template: String,
    /// Available subdomains substituted for `{s}`
    pub subdomains: Vec<String>,
    /// Attribution text
    pub attribution: String,
    /// Maximum zoom level for this tile source
    pub max_zoom: u8,
    /// Minimum zoom level for this tile source
    pub min_zoom: u8,
    /// Substitute `@2x` for `{r}`
    pub retina: bool,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            attribution: "© OpenStreetMap contributors".to_string(),
            max_zoom: 19,
            min_zoom: 0,
            retina: false,
        }
    }
}

impl TileLayerOptions {
    /// CARTO dark basemap
    pub fn carto_dark() -> Self {
        Self {
            url_template: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png"
                .to_string(),
            subdomains: vec!["a", "b", "c", "d"].into_iter().map(String::from).collect(),
            attribution: "© CARTO | © OpenStreetMap contributors".to_string(),
            max_zoom: 19,
            min_zoom: 0,
            retina: false,
        }
    }
}

/// A tile-based base layer; the host surface fetches the expanded URLs
pub struct TileLayer {
    /// Base layer properties
    properties: LayerProperties,
    /// Tile layer specific options
    options: TileLayerOptions,
}

impl TileLayer {
    /// Create a new tile layer with default OpenStreetMap tiles
    pub fn new(id: String, name: String) -> Self {
        Self::with_options(id, name, TileLayerOptions::default())
    }

    /// Create a new tile layer with custom options
    pub fn with_options(id: String, name: String, options: TileLayerOptions) -> Self {
        let properties = LayerProperties::new(id, name, LayerType::Tile).with_z_index(-100);
        Self {
            properties,
            options,
        }
    }

    /// Expands the URL template for one tile
    pub fn tile_url(&self, coord: TileCoord) -> String {
        let subdomain = if self.options.subdomains.is_empty() {
            ""
        } else {
            let idx = ((coord.x + coord.y) % self.options.subdomains.len() as u32) as usize;
            self.options.subdomains[idx].as_str()
        };

        self.options
            .url_template
            .replace("{s}", subdomain)
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
            .replace("{r}", if self.options.retina { "@2x" } else { "" })
    }

    /// Tiles covering the viewport at the layer's clamped integer zoom
    pub fn visible_tiles(&self, viewport: &Viewport) -> Vec<TileCoord> {
        let zoom = (viewport.zoom.floor() as u8).clamp(self.options.min_zoom, self.options.max_zoom);
        let bounds = viewport.bounds();

        let north_west = TileCoord::from_lat_lng(&bounds.north_west(), zoom);
        let south_east = TileCoord::from_lat_lng(&bounds.south_east(), zoom);

        let mut tiles = Vec::new();
        for x in north_west.x..=south_east.x {
            for y in north_west.y..=south_east.y {
                tiles.push(TileCoord::new(x, y, zoom));
            }
        }
        tiles
    }

    /// Get the tile options
    pub fn options(&self) -> &TileLayerOptions {
        &self.options
    }

    pub fn attribution(&self) -> &str {
        &self.options.attribution
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        for coord in self.visible_tiles(viewport) {
            let nw = viewport.lat_lng_to_pixel(&coord.to_lat_lng());
            let se_corner = TileCoord::new(coord.x + 1, coord.y + 1, coord.z).to_lat_lng();
            let se = viewport.lat_lng_to_pixel(&se_corner);
            context.render_tile(self.tile_url(coord), (nw, se), self.properties.opacity)?;
        }
        Ok(())
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "url_template": self.options.url_template,
            "subdomains": self.options.subdomains,
            "attribution": self.options.attribution,
            "max_zoom": self.options.max_zoom,
        })
    }
}
