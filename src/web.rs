//! Browser bindings: DOM-backed controls and the page entry point
//!
//! The page provides the elements named below. Each time the map changes,
//! the current frame is handed to `window.towermapRedraw(json)` when the
//! page defines it; the payload holds the draw commands plus popup HTML
//! keyed by marker id.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement, KeyboardEvent,
};

use crate::{
    app::{FilterSync, SearchOrchestrator, SearchOutcome},
    core::config::TowerMapConfig,
    layers::base::LayerTrait,
    rendering::context::RenderContext,
    search::{LocationResolver, NominatimGeocoder},
    towers::{model::ServiceStatus, HttpTowerClient, Radio, TowerApi},
    ui::controls::{
        OperatorSelect, RadiusSlider, ResultsPanel, SearchControls, StatusIndicator,
        ALL_OPERATORS_LABEL, BUSY_LABEL, SEARCH_LABEL,
    },
    view::MapView,
};

const SEARCH_INPUT: &str = "search-input";
const SEARCH_BUTTON: &str = "search-btn";
const RADIUS_SLIDER: &str = "radius-slider";
const RADIUS_VALUE: &str = "radius-value";
const RESULTS_INFO: &str = "results-info";
const STATUS_TEXT: &str = "status-text";
const OPERATOR_FILTER: &str = "operator-filter";
const RADIO_FILTERS: &str = "#radio-filters input[type=\"checkbox\"]";

fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", id)))
}

fn typed<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    element(document, id)?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{} has the wrong element type", id)))
}

fn set_text(document: &Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn show_status_panel(document: &Document, status: &ServiceStatus) {
    set_text(document, "api-calls", &status.api_calls_today.to_string());
    set_text(document, "api-limit", &status.api_daily_limit.to_string());
    set_text(document, "db-total", &status.total_towers.to_string());
}

/// Search button, results panel and status widgets of the page
pub struct DomSearchControls {
    document: Document,
    button: HtmlButtonElement,
}

impl DomSearchControls {
    pub fn new(document: Document) -> Result<Self, JsValue> {
        let button = typed(&document, SEARCH_BUTTON)?;
        Ok(Self { document, button })
    }

    fn status_dot(&self) -> Option<Element> {
        self.document.query_selector(".status-dot").ok().flatten()
    }
}

impl SearchControls for DomSearchControls {
    fn set_busy(&mut self, busy: bool) {
        self.button.set_disabled(busy);
        self.button
            .set_text_content(Some(if busy { BUSY_LABEL } else { SEARCH_LABEL }));
    }

    fn show_results(&mut self, panel: ResultsPanel) {
        if let Some(el) = self.document.get_element_by_id(RESULTS_INFO) {
            el.set_inner_html(&panel.to_html());
        }
    }

    fn set_status(&mut self, indicator: StatusIndicator, text: &str) {
        if let Some(dot) = self.status_dot() {
            let classes = dot.class_list();
            let _ = classes.remove_2("loading", "error");
            let class = match indicator {
                StatusIndicator::Ready => None,
                StatusIndicator::Busy => Some("loading"),
                StatusIndicator::Error => Some("error"),
            };
            if let Some(class) = class {
                let _ = classes.add_1(class);
            }
        }
        set_text(&self.document, STATUS_TEXT, text);
    }

    fn set_status_panel(&mut self, status: &ServiceStatus) {
        show_status_panel(&self.document, status);
    }
}

/// The operator `<select>`
pub struct DomOperatorSelect {
    select: HtmlSelectElement,
}

impl DomOperatorSelect {
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            select: typed(document, OPERATOR_FILTER)?,
        })
    }

    fn append(&self, text: &str, value: &str) {
        match HtmlOptionElement::new_with_text_and_value(text, value) {
            Ok(option) => {
                if let Err(e) = self.select.append_child(&option) {
                    log::warn!("failed to add operator option: {:?}", e);
                }
            }
            Err(e) => log::warn!("failed to create operator option: {:?}", e),
        }
    }
}

impl OperatorSelect for DomOperatorSelect {
    fn set_options(&mut self, operators: &[String]) {
        self.select.set_inner_html("");
        self.append(ALL_OPERATORS_LABEL, "");
        for operator in operators {
            self.append(operator, operator);
        }
    }

    fn selected(&self) -> String {
        self.select.value()
    }
}

type WebOrchestrator =
    SearchOrchestrator<NominatimGeocoder, HttpTowerClient, DomSearchControls, DomOperatorSelect>;

/// Page state. `RefCell` borrows of `view` never span an `.await`, so
/// filter handlers always reach the map, even mid-search.
struct WebApp {
    document: Document,
    view: RefCell<MapView>,
    orchestrator: RefCell<WebOrchestrator>,
    /// Reads the same `<select>` as the orchestrator's dropdown
    filters: FilterSync<DomOperatorSelect>,
    /// Used for the usage counters so they never wait on a search
    status_client: HttpTowerClient,
    slider: RefCell<RadiusSlider>,
}

impl WebApp {
    /// Hands the current frame to the page's redraw hook, if any
    fn redraw(&self, view: &mut MapView) {
        let size = view.viewport().size;
        let mut context = RenderContext::new(size.x as u32, size.y as u32);
        if let Err(e) = view.render(&mut context) {
            log::warn!("render failed: {}", e);
            return;
        }

        let mut popups = serde_json::Map::new();
        for radio in Radio::KNOWN.iter() {
            if let Some(group) = view.group(radio) {
                for marker in group.markers() {
                    if let Some(popup) = marker.popup() {
                        popups.insert(marker.id().to_string(), popup.to_html().into());
                    }
                }
            }
        }

        let frame = serde_json::json!({
            "commands": context.get_drawing_queue(),
            "popups": popups,
        });

        let Some(window) = web_sys::window() else {
            return;
        };
        let hook = js_sys::Reflect::get(&window, &JsValue::from_str("towermapRedraw"))
            .ok()
            .and_then(|hook| hook.dyn_into::<js_sys::Function>().ok());
        if let Some(hook) = hook {
            if let Err(e) = hook.call1(&JsValue::NULL, &JsValue::from_str(&frame.to_string())) {
                log::warn!("redraw hook failed: {:?}", e);
            }
        }
    }

    fn search(self: Rc<Self>) {
        let query = typed::<HtmlInputElement>(&self.document, SEARCH_INPUT)
            .map(|input| input.value())
            .unwrap_or_default();
        let radius = self.slider.borrow().value();

        wasm_bindgen_futures::spawn_local(async move {
            let Ok(mut orchestrator) = self.orchestrator.try_borrow_mut() else {
                log::debug!("search already running, ignoring");
                return;
            };
            let Some(pending) = orchestrator.begin(&query, radius) else {
                return;
            };
            let found = orchestrator.fetch(&pending).await;

            let outcome = {
                let mut view = self.view.borrow_mut();
                let outcome = orchestrator.finish(&mut view, &pending, found);
                self.redraw(&mut view);
                outcome
            };
            drop(orchestrator);

            if let SearchOutcome::Completed(_) = outcome {
                self.refresh_status().await;
            }
        });
    }

    async fn refresh_status(&self) {
        match self.status_client.status().await {
            Ok(status) => show_status_panel(&self.document, &status),
            Err(e) => log::debug!("status refresh failed: {}", e),
        }
    }

    fn with_view(&self, f: impl FnOnce(&mut MapView, &FilterSync<DomOperatorSelect>)) {
        let mut view = self.view.borrow_mut();
        f(&mut view, &self.filters);
        self.redraw(&mut view);
    }
}

fn listen<E, F>(target: &web_sys::EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    E: wasm_bindgen::convert::FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page
    closure.forget();
    Ok(())
}

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let mut config = TowerMapConfig::default();
    config.api.base_url = window.location().origin()?;
    let to_js = |e: crate::Error| JsValue::from_str(&e.to_string());

    let view = MapView::initialize(&config.map).map_err(to_js)?;
    let geocoder =
        NominatimGeocoder::new(config.geocoder.clone()).map_err(|e| to_js(e.into()))?;
    let client =
        HttpTowerClient::new(config.api.clone(), &config.search).map_err(|e| to_js(e.into()))?;
    let status_client = client.clone();
    let orchestrator = SearchOrchestrator::new(
        LocationResolver::new(geocoder, config.geocoder.cache_capacity),
        client,
        DomSearchControls::new(document.clone())?,
        FilterSync::new(DomOperatorSelect::new(&document)?),
    );
    let search = &config.search;
    let slider = RadiusSlider::new(search.min_radius_km, search.max_radius_km, search.default_radius_km);

    let app = Rc::new(WebApp {
        document: document.clone(),
        view: RefCell::new(view),
        orchestrator: RefCell::new(orchestrator),
        filters: FilterSync::new(DomOperatorSelect::new(&document)?),
        status_client,
        slider: RefCell::new(slider),
    });

    let slider_input: HtmlInputElement = typed(&document, RADIUS_SLIDER)?;
    slider_input.set_value(&app.slider.borrow().readout());
    set_text(&document, RADIUS_VALUE, &app.slider.borrow().readout());
    {
        let app = app.clone();
        let input = slider_input.clone();
        listen(&slider_input, "input", move |_: Event| {
            let mut slider = app.slider.borrow_mut();
            slider.set_from_input(&input.value());
            set_text(&app.document, RADIUS_VALUE, &slider.readout());
        })?;
    }

    {
        let app = app.clone();
        let button: HtmlButtonElement = typed(&document, SEARCH_BUTTON)?;
        listen(&button, "click", move |_: Event| app.clone().search())?;
    }

    {
        let app = app.clone();
        let input: HtmlInputElement = typed(&document, SEARCH_INPUT)?;
        listen(&input, "keydown", move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                app.clone().search();
            }
        })?;
    }

    {
        let app = app.clone();
        let select: HtmlSelectElement = typed(&document, OPERATOR_FILTER)?;
        listen(&select, "change", move |_: Event| {
            app.with_view(|view, filters| filters.on_operator_changed(view));
        })?;
    }

    let checkboxes = document.query_selector_all(RADIO_FILTERS)?;
    for index in 0..checkboxes.length() {
        let Some(checkbox) = checkboxes
            .item(index)
            .and_then(|node| node.dyn_into::<HtmlInputElement>().ok())
        else {
            continue;
        };
        let app = app.clone();
        let target = checkbox.clone();
        listen(&checkbox, "change", move |_: Event| {
            let radio = target.value();
            let checked = target.checked();
            app.with_view(|view, filters| {
                filters.on_radio_toggled(view, &radio, checked);
            });
        })?;
    }

    app.with_view(|_, _| {});
    {
        let app = app.clone();
        wasm_bindgen_futures::spawn_local(async move { app.refresh_status().await });
    }

    log::info!("tower map ready");
    Ok(())
}
