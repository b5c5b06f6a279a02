//! Tower records and the backend they come from

pub mod client;
pub mod model;

pub use client::{backend_error_message, HttpTowerClient, SearchError, TowerApi};
pub use model::{Radio, SearchParams, SearchResult, ServiceStatus, Tower};
