//! Wiring between the controls, the backend and the map view

pub mod filters;
pub mod orchestrator;

pub use filters::FilterSync;
pub use orchestrator::{FoundTowers, PendingSearch, SearchOrchestrator, SearchOutcome};
