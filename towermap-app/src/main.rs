use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use towermap::{
    app::{FilterSync, SearchOrchestrator, SearchOutcome},
    search::{LocationResolver, NominatimGeocoder},
    towers::{HttpTowerClient, Radio, ServiceStatus},
    ui::{OperatorSelect, RadiusSlider, ResultsPanel, SearchControls, StatusIndicator},
    MapView, TowerMapConfig,
};

const HELP: &str = "\
enter a place name or \"lat, lon\" to search
  :radius <km>          set the search radius
  :radio <TYPE> on|off  show or hide one radio type
  :operator [NAME]      highlight one operator (no name = all)
  :towers               list plotted towers
  :status               refresh backend usage counters
  :quit";

/// Search feedback printed to the terminal
struct TerminalControls;

impl SearchControls for TerminalControls {
    fn set_busy(&mut self, busy: bool) {
        log::debug!("busy: {}", busy);
    }

    fn show_results(&mut self, panel: ResultsPanel) {
        match panel {
            ResultsPanel::Searching => println!("Searching..."),
            ResultsPanel::Found(summary) => {
                for line in summary.lines() {
                    println!("{}", line);
                }
            }
            ResultsPanel::Failed(message) => println!("error: {}", message),
        }
    }

    fn set_status(&mut self, indicator: StatusIndicator, text: &str) {
        log::debug!("status {:?}: {}", indicator, text);
    }

    fn set_status_panel(&mut self, status: &ServiceStatus) {
        println!(
            "api calls today: {}/{}  towers in database: {}",
            status.api_calls_today, status.api_daily_limit, status.total_towers
        );
    }
}

/// Operator filter chosen with `:operator`
#[derive(Default)]
struct TerminalSelect {
    options: Vec<String>,
    selected: String,
}

impl OperatorSelect for TerminalSelect {
    fn set_options(&mut self, operators: &[String]) {
        self.options = operators.to_vec();
        self.selected.clear();
        if !operators.is_empty() {
            println!("operators: {}", operators.join(", "));
        }
    }

    fn selected(&self) -> String {
        self.selected.clone()
    }
}

fn load_config() -> Result<TowerMapConfig> {
    let mut config = match std::env::args().nth(1).or_else(|| std::env::var("TOWERMAP_CONFIG").ok()) {
        Some(path) => TowerMapConfig::from_file(&path).with_context(|| format!("loading {}", path))?,
        None => TowerMapConfig::default(),
    };
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

fn parse_switch(word: &str) -> Option<bool> {
    match word {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}

fn print_towers(view: &MapView) {
    if view.towers().is_empty() {
        println!("no towers plotted");
        return;
    }
    for radio in Radio::KNOWN.iter() {
        let Some(group) = view.group(radio) else {
            continue;
        };
        for marker in group.markers() {
            if let Some(popup) = marker.popup() {
                print!("{}", popup);
            }
        }
    }
    let counts: Vec<String> = view
        .radio_counts()
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(radio, count)| format!("{} {}", radio, count))
        .collect();
    println!("{}", counts.join("  "));
}

#[tokio::main]
async fn main() -> Result<()> {
    towermap::init_logging();

    let config = load_config()?;
    let mut view = MapView::initialize(&config.map)?;
    let geocoder = NominatimGeocoder::new(config.geocoder.clone())?;
    let client = HttpTowerClient::new(config.api.clone(), &config.search)?;
    let mut orchestrator = SearchOrchestrator::new(
        LocationResolver::new(geocoder, config.geocoder.cache_capacity),
        client,
        TerminalControls,
        FilterSync::new(TerminalSelect::default()),
    );
    let search = &config.search;
    let mut slider = RadiusSlider::new(search.min_radius_km, search.max_radius_km, search.default_radius_km);

    log::info!("backend {}", config.api.base_url);
    println!("{}", HELP);
    orchestrator.refresh_status_panel().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };
        let line = line.trim();

        let mut words = line.split_whitespace();
        match words.next() {
            None => continue,
            Some(":quit") | Some(":q") => break,
            Some(":help") => println!("{}", HELP),
            Some(":radius") => match words.next().and_then(|v| slider.set_from_input(v)) {
                Some(km) => println!("radius {} km", km),
                None => println!("radius is {} km (range {:?})", slider.readout(), slider.range()),
            },
            Some(":radio") => {
                let (Some(radio), Some(visible)) = (words.next(), words.next().and_then(parse_switch)) else {
                    println!("usage: :radio <TYPE> on|off");
                    continue;
                };
                if !orchestrator.filters().on_radio_toggled(&mut view, radio, visible) {
                    println!("unknown radio type {}", radio);
                }
            }
            Some(":operator") => {
                let name = words.collect::<Vec<_>>().join(" ");
                if !name.is_empty() && !orchestrator.filters().select().options.contains(&name) {
                    println!("no plotted towers for operator {}", name);
                }
                orchestrator.filters_mut().select_mut().selected = name;
                orchestrator.filters().on_operator_changed(&mut view);
            }
            Some(":towers") => print_towers(&view),
            Some(":status") => orchestrator.refresh_status_panel().await,
            Some(_) => {
                if let SearchOutcome::Completed(_) =
                    orchestrator.perform_search(&mut view, line, slider.value()).await
                {
                    if let Some((center, radius)) = view.search_area() {
                        log::debug!(
                            "search area {:.4}, {:.4} r={}m, zoom {}",
                            center.lat,
                            center.lng,
                            radius,
                            view.viewport().zoom
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
