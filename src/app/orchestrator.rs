//! One search, end to end
//!
//! `perform_search` resolves the query, asks the backend for towers, plots
//! them, draws the search area and refreshes the operator dropdown. Any
//! failure along the way ends up in the results panel; nothing escapes.
//!
//! The same flow is available in three steps (`begin`, `fetch`, `finish`)
//! for callers that must not hold the map across the network round trip.

use instant::Instant;

use crate::app::filters::FilterSync;
use crate::search::{Geocoder, LocationResolver, ResolvedPoint};
use crate::towers::client::TowerApi;
use crate::towers::model::{SearchParams, SearchResult};
use crate::ui::controls::{
    OperatorSelect, ResultSummary, ResultsPanel, SearchControls, StatusIndicator, BUSY_LABEL,
};
use crate::view::MapView;
use crate::Result;

pub const READY_TEXT: &str = "Ready";
pub const ERROR_TEXT: &str = "Error";

/// How a call to [`SearchOrchestrator::perform_search`] ended
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Blank query; nothing was touched
    Skipped,
    Completed(ResultSummary),
    /// The message shown in the results panel
    Failed(String),
}

/// A search between [`SearchOrchestrator::begin`] and
/// [`SearchOrchestrator::finish`]
#[derive(Debug, Clone)]
pub struct PendingSearch {
    query: String,
    radius_km: u32,
    started: Instant,
}

impl PendingSearch {
    /// The trimmed query
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn radius_km(&self) -> u32 {
        self.radius_km
    }
}

/// Where a query resolved to and what the backend returned there
#[derive(Debug, Clone)]
pub struct FoundTowers {
    pub point: ResolvedPoint,
    pub result: SearchResult,
}

pub struct SearchOrchestrator<G, A, C, S> {
    resolver: LocationResolver<G>,
    api: A,
    controls: C,
    filters: FilterSync<S>,
}

impl<G, A, C, S> SearchOrchestrator<G, A, C, S>
where
    G: Geocoder,
    A: TowerApi,
    C: SearchControls,
    S: OperatorSelect,
{
    pub fn new(resolver: LocationResolver<G>, api: A, controls: C, filters: FilterSync<S>) -> Self {
        Self {
            resolver,
            api,
            controls,
            filters,
        }
    }

    pub async fn perform_search(&mut self, view: &mut MapView, query: &str, radius_km: u32) -> SearchOutcome {
        let Some(pending) = self.begin(query, radius_km) else {
            return SearchOutcome::Skipped;
        };
        let found = self.fetch(&pending).await;
        let outcome = self.finish(view, &pending, found);

        if let SearchOutcome::Completed(_) = outcome {
            self.refresh_status_panel().await;
        }
        outcome
    }

    /// Puts the controls into their busy state. Returns `None` for a blank
    /// query, in which case nothing is touched.
    pub fn begin(&mut self, query: &str, radius_km: u32) -> Option<PendingSearch> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        self.controls.set_busy(true);
        self.controls.set_status(StatusIndicator::Busy, BUSY_LABEL);
        self.controls.show_results(ResultsPanel::Searching);

        Some(PendingSearch {
            query: query.to_string(),
            radius_km,
            started: Instant::now(),
        })
    }

    /// Resolves the query and asks the backend for towers around it.
    ///
    /// Needs no access to the map, so filter changes can still be applied
    /// to the view while this is pending.
    pub async fn fetch(&mut self, pending: &PendingSearch) -> Result<FoundTowers> {
        let point = self.resolver.resolve(&pending.query).await?;
        log::debug!(
            "'{}' resolved to {} ({}, {})",
            pending.query,
            point.label,
            point.lat,
            point.lon
        );

        let result = self
            .api
            .search_towers(SearchParams::new(point.lat, point.lon, pending.radius_km as f64))
            .await?;
        Ok(FoundTowers { point, result })
    }

    /// Plots what `fetch` returned, or reports its failure, and clears the
    /// busy state. Radio visibility is left as the view has it.
    pub fn finish(&mut self, view: &mut MapView, pending: &PendingSearch, found: Result<FoundTowers>) -> SearchOutcome {
        let outcome = match found.and_then(|found| self.plot(view, pending, found)) {
            Ok(summary) => {
                log::info!(
                    "'{}' ({} km): {} towers in {:?}",
                    pending.query,
                    pending.radius_km,
                    summary.count,
                    pending.started.elapsed()
                );
                self.controls.show_results(ResultsPanel::Found(summary.clone()));
                self.controls.set_status(StatusIndicator::Ready, READY_TEXT);
                SearchOutcome::Completed(summary)
            }
            Err(e) => {
                let message = e.to_string();
                log::warn!("search for '{}' failed: {}", pending.query, message);
                self.controls.show_results(ResultsPanel::Failed(message.clone()));
                self.controls.set_status(StatusIndicator::Error, ERROR_TEXT);
                SearchOutcome::Failed(message)
            }
        };
        self.controls.set_busy(false);
        outcome
    }

    fn plot(&mut self, view: &mut MapView, pending: &PendingSearch, found: FoundTowers) -> Result<ResultSummary> {
        let summary = ResultSummary::from(&found.result);
        view.plot_towers(found.result.towers);
        view.show_search_area(found.point.lat, found.point.lon, pending.radius_km as f64)?;
        self.filters.refresh_operator_dropdown(view);
        Ok(summary)
    }

    /// Updates the usage counters; failures only leave the panel stale
    pub async fn refresh_status_panel(&mut self) {
        match self.api.status().await {
            Ok(status) => self.controls.set_status_panel(&status),
            Err(e) => log::debug!("status refresh failed: {}", e),
        }
    }

    pub fn controls(&self) -> &C {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut C {
        &mut self.controls
    }

    pub fn filters(&self) -> &FilterSync<S> {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterSync<S> {
        &mut self.filters
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}
