//! Popups and the control surfaces driven by the search flow

pub mod controls;
pub mod popup;

pub use controls::{
    OperatorSelect, RadiusSlider, ResultSummary, ResultsPanel, SearchControls, StatusIndicator,
};
pub use popup::Popup;
