//! The tower map: one marker group per radio type over a dark base map
//!
//! `MapView` is the only thing that mutates rendered state. It holds the
//! towers of the most recent search, partitioned into per-radio
//! [`LayerGroup`]s, plus at most one search-area circle.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    core::{
        config::MapConfig,
        constants::{
            MARKER_DIMMED_OPACITY, MARKER_FILL_OPACITY, MARKER_RADIUS, MARKER_STROKE_OPACITY,
            MARKER_WEIGHT, METERS_PER_KM, SEARCH_AREA_COLOR, SEARCH_AREA_FILL_OPACITY,
        },
        geo::{LatLng, Point},
        map::{Map, MapOptions},
        viewport::Viewport,
    },
    layers::{
        group::LayerGroup,
        marker::CircleMarker,
        tile::TileLayer,
        vector::{Circle, Color, PathStyle},
    },
    rendering::context::RenderContext,
    towers::model::{Radio, Tower},
    ui::popup::Popup,
    Result,
};

pub const BASE_LAYER_ID: &str = "base";
pub const SEARCH_AREA_ID: &str = "search-area";

/// Placeholder for missing popup values
const NO_VALUE: &str = "-";

/// Layer id of the marker group for `radio`
pub fn radio_layer_id(radio: &Radio) -> String {
    format!("radio-{}", radio)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing plotted since start or the last `clear`
    Empty,
    /// Towers of the last search are plotted (possibly zero of them)
    Populated,
}

pub struct MapView {
    map: Map,
    towers: Vec<Tower>,
    state: ViewState,
    fit_padding: f64,
    pan_zoom: f64,
}

impl MapView {
    /// Builds the map with its base layer and one empty, visible group per
    /// known radio type
    pub fn initialize(config: &MapConfig) -> Result<Self> {
        let (lat, lng) = config.center;
        let (width, height) = config.size;
        let viewport = Viewport::new(LatLng::new(lat, lng), config.zoom, Point::new(width, height));
        let options = MapOptions {
            min_zoom: Some(config.tiles.min_zoom as f64),
            max_zoom: Some(config.tiles.max_zoom as f64),
            ..MapOptions::default()
        };
        let mut map = Map::with_options(viewport, options);

        map.add_layer(Box::new(TileLayer::with_options(
            BASE_LAYER_ID.to_string(),
            "Base map".to_string(),
            config.tiles.clone(),
        )))?;

        for radio in Radio::KNOWN.iter() {
            map.add_layer(Box::new(LayerGroup::new(
                radio_layer_id(radio),
                radio.to_string(),
            )))?;
        }

        log::debug!("map initialized with {} layers", map.list_layers().len());

        Ok(Self {
            map,
            towers: Vec::new(),
            state: ViewState::Empty,
            fit_padding: config.fit_padding,
            pan_zoom: config.pan_zoom,
        })
    }

    /// Removes every marker and forgets the tower list; group visibility
    /// is kept
    pub fn clear(&mut self) {
        for radio in Radio::KNOWN.iter() {
            self.with_group_mut(radio, LayerGroup::clear_layers);
        }
        self.towers.clear();
        self.state = ViewState::Empty;
    }

    /// Replaces the rendered towers with `towers`.
    ///
    /// Towers whose radio type has no group are kept in the tower list but
    /// get no marker.
    pub fn plot_towers(&mut self, towers: Vec<Tower>) {
        self.clear();

        let mut skipped = 0;
        for (index, tower) in towers.iter().enumerate() {
            let marker = tower_marker(index, tower);
            if self.with_group_mut(&tower.radio, |group| group.add_marker(marker)).is_none() {
                skipped += 1;
            }
        }
        if skipped > 0 {
            log::debug!("{} towers without a radio layer were not plotted", skipped);
        }

        self.towers = towers;
        self.state = ViewState::Populated;
    }

    /// Shows or hides one radio group without touching its markers.
    ///
    /// Returns `false` when there is no group for `radio`.
    pub fn set_radio_visible(&mut self, radio: &Radio, visible: bool) -> bool {
        self.map
            .with_layer_mut(&radio_layer_id(radio), |layer| layer.set_visible(visible))
            .is_some()
    }

    pub fn is_radio_visible(&self, radio: &Radio) -> Option<bool> {
        self.map
            .get_layer(&radio_layer_id(radio))
            .map(|layer| layer.is_visible())
    }

    /// Draws the search radius, replacing any previous one, and fits the
    /// viewport around it
    pub fn show_search_area(&mut self, lat: f64, lon: f64, radius_km: f64) -> Result<()> {
        self.map.remove_layer(SEARCH_AREA_ID)?;

        let color = Color::from_hex(SEARCH_AREA_COLOR).unwrap_or_default();
        let style = PathStyle {
            weight: 1.0,
            fill_opacity: SEARCH_AREA_FILL_OPACITY,
            dash_array: vec![5.0, 5.0],
            ..PathStyle::solid(color)
        };
        let circle = Circle::new(
            SEARCH_AREA_ID.to_string(),
            LatLng::new(lat, lon),
            radius_km * METERS_PER_KM,
        )
        .with_style(style);
        let bounds = circle.lat_lng_bounds();

        self.map.add_layer(Box::new(circle))?;
        self.map.fit_bounds(&bounds, self.fit_padding)
    }

    /// Center and radius in meters of the current search area
    pub fn search_area(&self) -> Option<(LatLng, f64)> {
        self.map
            .get_layer(SEARCH_AREA_ID)?
            .as_any()
            .downcast_ref::<Circle>()
            .map(|circle| (circle.center(), circle.radius()))
    }

    /// De-emphasizes every marker whose operator is not `operator`; an
    /// empty `operator` restores all markers
    pub fn filter_by_operator(&mut self, operator: &str) {
        for radio in Radio::KNOWN.iter() {
            self.with_group_mut(radio, |group| {
                group.each_marker_mut(|marker| {
                    let matches = operator.is_empty()
                        || marker.property("operator").and_then(|v| v.as_str()) == Some(operator);
                    if matches {
                        marker.set_opacities(MARKER_FILL_OPACITY, MARKER_STROKE_OPACITY);
                    } else {
                        marker.set_opacities(MARKER_DIMMED_OPACITY, MARKER_DIMMED_OPACITY);
                    }
                })
            });
        }
    }

    /// Distinct non-empty operators of the current towers, sorted
    pub fn unique_operators(&self) -> Vec<String> {
        self.towers
            .iter()
            .filter_map(Tower::operator_name)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Recenters the map; `zoom` defaults to the configured pan zoom
    pub fn pan_to(&mut self, lat: f64, lon: f64, zoom: Option<f64>) -> Result<()> {
        self.map
            .set_view(LatLng::new(lat, lon), zoom.unwrap_or(self.pan_zoom))
    }

    /// Marker count per known radio type
    pub fn radio_counts(&self) -> BTreeMap<Radio, usize> {
        Radio::KNOWN
            .iter()
            .map(|radio| (radio.clone(), self.group(radio).map_or(0, LayerGroup::len)))
            .collect()
    }

    pub fn marker_count(&self) -> usize {
        self.radio_counts().values().sum()
    }

    pub fn group(&self, radio: &Radio) -> Option<&LayerGroup> {
        self.map
            .get_layer(&radio_layer_id(radio))?
            .as_any()
            .downcast_ref::<LayerGroup>()
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn viewport(&self) -> &Viewport {
        self.map.viewport()
    }

    /// Queues draw commands for everything visible
    pub fn render(&mut self, context: &mut RenderContext) -> Result<()> {
        self.map.render(context)
    }

    fn with_group_mut<F, R>(&mut self, radio: &Radio, f: F) -> Option<R>
    where
        F: FnOnce(&mut LayerGroup) -> R,
    {
        self.map
            .with_layer_mut(&radio_layer_id(radio), |layer| {
                layer.as_any_mut().downcast_mut::<LayerGroup>().map(f)
            })
            .flatten()
    }
}

/// Popup summarizing every field of a tower
pub fn tower_popup(tower: &Tower) -> Popup {
    let range = tower
        .range_m
        .filter(|range| *range != 0.0)
        .map_or_else(|| NO_VALUE.to_string(), |range| format!("{}m", range));
    let signal = tower
        .signal_avg
        .filter(|signal| *signal != 0.0)
        .map_or_else(|| NO_VALUE.to_string(), |signal| format!("{} dBm", signal));
    let samples = tower
        .samples
        .filter(|samples| *samples != 0)
        .map_or_else(|| NO_VALUE.to_string(), |samples| samples.to_string());

    Popup::new(format!("{} Tower", tower.radio))
        .with_row("Radio", tower.radio.to_string())
        .with_row("Operator", tower.operator_name().unwrap_or("Unknown"))
        .with_row("Cell ID", tower.cell_id.to_string())
        .with_row("LAC", tower.lac.to_string())
        .with_row("MCC/MNC", format!("{}/{}", tower.mcc, tower.mnc))
        .with_row("Range", range)
        .with_row("Signal", signal)
        .with_row("Samples", samples)
        .with_row("Source", tower.source.clone())
}

fn tower_marker(index: usize, tower: &Tower) -> CircleMarker {
    let color = Color::from_hex(tower.radio.color_hex()).unwrap_or_default();
    let style = PathStyle {
        weight: MARKER_WEIGHT,
        opacity: MARKER_STROKE_OPACITY,
        fill_opacity: MARKER_FILL_OPACITY,
        ..PathStyle::solid(color)
    };
    let id = match tower.id {
        Some(id) => format!("tower-{}", id),
        None => format!("tower-{}-{}", tower.cell_id, index),
    };

    CircleMarker::new(id, tower.position())
        .with_radius(MARKER_RADIUS)
        .with_style(style)
        .with_popup(tower_popup(tower))
        .with_property("operator", tower.operator_name().map(String::from))
        .with_property("radio", tower.radio.to_string())
        .with_property("cell_id", tower.cell_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::base::LayerTrait;
    use crate::rendering::context::DrawCommand;

    fn tower(radio: &str, operator: Option<&str>, lat: f64, lon: f64) -> Tower {
        Tower {
            id: None,
            radio: Radio::from(radio),
            operator: operator.map(String::from),
            cell_id: 1000,
            lac: 12,
            mcc: 310,
            mnc: 410,
            range_m: Some(1500.0),
            signal_avg: None,
            samples: Some(4),
            source: "opencellid".to_string(),
            lat,
            lon,
        }
    }

    fn sample_towers() -> Vec<Tower> {
        vec![
            tower("LTE", Some("Verizon"), 40.70, -74.00),
            tower("LTE", Some("AT&T"), 40.71, -74.01),
            tower("GSM", Some("Verizon"), 40.72, -74.02),
            tower("NR", None, 40.73, -74.03),
        ]
    }

    fn view() -> MapView {
        MapView::initialize(&MapConfig::default()).unwrap()
    }

    fn fill_opacities(view: &MapView, radio: &Radio) -> Vec<f32> {
        view.group(radio)
            .unwrap()
            .markers()
            .iter()
            .map(|m| m.style().fill_opacity)
            .collect()
    }

    #[test]
    fn test_initialize_creates_visible_group_per_radio() {
        let view = view();

        for radio in Radio::KNOWN.iter() {
            assert_eq!(view.is_radio_visible(radio), Some(true));
            assert!(view.group(radio).unwrap().is_empty());
        }
        assert_eq!(view.state(), ViewState::Empty);
        assert_eq!(view.viewport().center, LatLng::new(39.8, -98.5));
        assert_eq!(view.viewport().zoom, 5.0);
    }

    #[test]
    fn test_plot_partitions_by_radio() {
        let mut view = view();
        view.plot_towers(sample_towers());

        let counts = view.radio_counts();
        assert_eq!(counts[&Radio::Lte], 2);
        assert_eq!(counts[&Radio::Gsm], 1);
        assert_eq!(counts[&Radio::Nr], 1);
        assert_eq!(counts[&Radio::Cdma], 0);
        assert_eq!(view.state(), ViewState::Populated);
    }

    #[test]
    fn test_plot_replaces_previous_towers() {
        let mut view = view();
        view.plot_towers(sample_towers());
        view.plot_towers(vec![tower("UMTS", Some("T-Mobile"), 40.0, -74.0)]);

        assert_eq!(view.marker_count(), 1);
        assert_eq!(view.towers().len(), 1);
        assert_eq!(view.unique_operators(), vec!["T-Mobile".to_string()]);
    }

    #[test]
    fn test_plotting_same_towers_twice() {
        let mut view = view();
        view.plot_towers(sample_towers());
        let counts = view.radio_counts();
        let operators = view.unique_operators();

        view.plot_towers(sample_towers());

        assert_eq!(view.marker_count(), 4);
        assert_eq!(view.radio_counts(), counts);
        assert_eq!(view.unique_operators(), operators);
        assert_eq!(view.towers().len(), 4);
    }

    #[test]
    fn test_plot_nothing() {
        let mut view = view();
        view.plot_towers(sample_towers());
        view.plot_towers(Vec::new());

        assert_eq!(view.marker_count(), 0);
        assert!(view.unique_operators().is_empty());
        assert_eq!(view.state(), ViewState::Populated);
    }

    #[test]
    fn test_unknown_radio_is_skipped() {
        let mut view = view();
        view.plot_towers(vec![
            tower("WIMAX", Some("Clearwire"), 40.0, -74.0),
            tower("LTE", Some("Verizon"), 40.0, -74.0),
        ]);

        assert_eq!(view.marker_count(), 1);
        assert_eq!(view.towers().len(), 2);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut view = view();
        view.plot_towers(sample_towers());
        view.clear();
        view.clear();

        assert_eq!(view.marker_count(), 0);
        assert!(view.towers().is_empty());
        assert!(view.unique_operators().is_empty());
        assert_eq!(view.state(), ViewState::Empty);
    }

    #[test]
    fn test_unique_operators_sorted_and_deduplicated() {
        let mut view = view();
        view.plot_towers(vec![
            tower("LTE", Some("Verizon"), 40.0, -74.0),
            tower("LTE", Some("AT&T"), 40.0, -74.0),
            tower("GSM", Some("Verizon"), 40.0, -74.0),
            tower("GSM", Some(""), 40.0, -74.0),
        ]);

        assert_eq!(view.unique_operators(), vec!["AT&T".to_string(), "Verizon".to_string()]);
    }

    #[test]
    fn test_toggle_visibility_keeps_markers() {
        let mut view = view();
        view.plot_towers(sample_towers());
        let before: Vec<String> = view
            .group(&Radio::Lte)
            .unwrap()
            .markers()
            .iter()
            .map(|m| m.id().to_string())
            .collect();

        assert!(view.set_radio_visible(&Radio::Lte, false));
        assert_eq!(view.is_radio_visible(&Radio::Lte), Some(false));
        assert!(view.set_radio_visible(&Radio::Lte, true));

        let after: Vec<String> = view
            .group(&Radio::Lte)
            .unwrap()
            .markers()
            .iter()
            .map(|m| m.id().to_string())
            .collect();
        assert_eq!(before, after);
        assert!(!view.set_radio_visible(&Radio::Other("WIMAX".to_string()), false));
    }

    #[test]
    fn test_hidden_group_is_not_rendered() {
        let mut view = view();
        view.plot_towers(sample_towers());
        view.pan_to(40.71, -74.01, Some(12.0)).unwrap();
        view.set_radio_visible(&Radio::Lte, false);

        let mut context = RenderContext::new(1280, 800);
        view.render(&mut context).unwrap();

        assert_eq!(context.markers_in_layer("radio-LTE").count(), 0);
        assert_eq!(context.markers_in_layer("radio-GSM").count(), 1);
    }

    #[test]
    fn test_filter_by_operator() {
        let mut view = view();
        view.plot_towers(sample_towers());

        view.filter_by_operator("AT&T");
        assert_eq!(
            fill_opacities(&view, &Radio::Lte),
            vec![MARKER_DIMMED_OPACITY, MARKER_FILL_OPACITY]
        );
        assert_eq!(fill_opacities(&view, &Radio::Gsm), vec![MARKER_DIMMED_OPACITY]);
        assert_eq!(fill_opacities(&view, &Radio::Nr), vec![MARKER_DIMMED_OPACITY]);

        view.filter_by_operator("");
        assert_eq!(
            fill_opacities(&view, &Radio::Lte),
            vec![MARKER_FILL_OPACITY, MARKER_FILL_OPACITY]
        );
        assert_eq!(fill_opacities(&view, &Radio::Nr), vec![MARKER_FILL_OPACITY]);
        assert_eq!(view.marker_count(), 4);
    }

    #[test]
    fn test_single_search_area() {
        let mut view = view();
        view.show_search_area(40.7, -74.0, 10.0).unwrap();
        view.show_search_area(34.05, -118.24, 25.0).unwrap();

        let (center, radius) = view.search_area().unwrap();
        assert_eq!(center, LatLng::new(34.05, -118.24));
        assert_eq!(radius, 25_000.0);

        let mut context = RenderContext::new(1280, 800);
        view.render(&mut context).unwrap();
        let circles = context
            .get_drawing_queue()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count();
        assert_eq!(circles, 1);
    }

    #[test]
    fn test_search_area_fits_viewport() {
        let mut view = view();
        view.show_search_area(40.7, -74.0, 10.0).unwrap();

        let viewport = view.viewport();
        assert!(viewport.zoom > 5.0);
        assert!(viewport.bounds().contains(&LatLng::new(40.79, -74.0)));
        assert!(viewport.bounds().contains(&LatLng::new(40.61, -74.0)));
    }

    #[test]
    fn test_pan_to_default_zoom() {
        let mut view = view();
        view.pan_to(47.6, -122.3, None).unwrap();

        assert_eq!(view.viewport().center, LatLng::new(47.6, -122.3));
        assert_eq!(view.viewport().zoom, 13.0);
        assert!(view.pan_to(120.0, 0.0, None).is_err());
    }

    #[test]
    fn test_popup_contents() {
        let popup = tower_popup(&tower("LTE", None, 40.0, -74.0));

        assert_eq!(popup.title, "LTE Tower");
        assert_eq!(popup.value("Operator"), Some("Unknown"));
        assert_eq!(popup.value("MCC/MNC"), Some("310/410"));
        assert_eq!(popup.value("Range"), Some("1500m"));
        assert_eq!(popup.value("Signal"), Some("-"));
        assert_eq!(popup.value("Samples"), Some("4"));
        assert_eq!(popup.value("Source"), Some("opencellid"));
    }

    #[test]
    fn test_marker_uses_radio_color() {
        let mut view = view();
        view.plot_towers(vec![tower("CDMA", Some("Sprint"), 40.0, -74.0)]);

        let marker = &view.group(&Radio::Cdma).unwrap().markers()[0];
        assert_eq!(marker.style().fill_color, Color::rgb(0xff, 0x99, 0x33));
        assert_eq!(marker.style().opacity, MARKER_STROKE_OPACITY);
        assert_eq!(marker.popup().unwrap().title, "CDMA Tower");
    }
}
