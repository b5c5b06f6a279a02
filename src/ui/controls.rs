//! Control surfaces the search flow talks to
//!
//! The core never touches a widget toolkit directly. A host (browser page,
//! terminal, test harness) implements these traits over its own widgets.

use crate::towers::model::{SearchResult, ServiceStatus};
use crate::ui::popup::escape_html;

/// Search button label while idle
pub const SEARCH_LABEL: &str = "Search Towers";

/// Search button label and status text while a search runs
pub const BUSY_LABEL: &str = "Searching...";

/// Label of the operator choice that clears the filter
pub const ALL_OPERATORS_LABEL: &str = "All Operators";

/// Shown when the backend served a rate-limited search from its cache
pub const RATE_LIMITED_NOTICE: &str = "Rate limited \u{2014} showing cached data";

/// State of the status dot next to the status text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    Ready,
    Busy,
    Error,
}

/// What the results panel shows
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsPanel {
    Searching,
    Found(ResultSummary),
    Failed(String),
}

/// Count line plus the advisory flags of one search result
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub count: usize,
    pub cached: bool,
    pub rate_limited: bool,
    pub message: Option<String>,
}

impl From<&SearchResult> for ResultSummary {
    fn from(result: &SearchResult) -> Self {
        Self {
            count: result.count,
            cached: result.cached,
            rate_limited: result.rate_limited,
            message: result.message.clone().filter(|m| !m.is_empty()),
        }
    }
}

impl ResultSummary {
    /// Plain-text lines, count line first
    pub fn lines(&self) -> Vec<String> {
        let mut first = format!("{} towers found", self.count);
        if self.cached {
            first.push_str(" (cached)");
        }

        let mut lines = vec![first];
        if self.rate_limited {
            lines.push(RATE_LIMITED_NOTICE.to_string());
        }
        if let Some(message) = &self.message {
            lines.push(message.clone());
        }
        lines
    }

    pub fn to_html(&self) -> String {
        let mut html = format!(r#"<span class="count">{}</span> towers found"#, self.count);
        if self.cached {
            html.push_str(" (cached)");
        }
        if self.rate_limited {
            html.push_str(&format!(
                r#"<br><span class="rate-limited">{}</span>"#,
                RATE_LIMITED_NOTICE
            ));
        }
        if let Some(message) = &self.message {
            html.push_str(&format!(
                r#"<br><span class="advisory">{}</span>"#,
                escape_html(message)
            ));
        }
        html
    }
}

impl ResultsPanel {
    pub fn to_html(&self) -> String {
        match self {
            ResultsPanel::Searching => BUSY_LABEL.to_string(),
            ResultsPanel::Found(summary) => summary.to_html(),
            ResultsPanel::Failed(message) => {
                format!(r#"<span class="error-msg">{}</span>"#, escape_html(message))
            }
        }
    }
}

/// Search button, results panel, status line and status panel
pub trait SearchControls {
    /// Disables the search button while busy and swaps its label
    fn set_busy(&mut self, busy: bool);

    fn show_results(&mut self, panel: ResultsPanel);

    fn set_status(&mut self, indicator: StatusIndicator, text: &str);

    /// Usage counters from the backend
    fn set_status_panel(&mut self, status: &ServiceStatus);
}

/// Operator filter dropdown; the empty string means every operator
pub trait OperatorSelect {
    /// Replaces the options with "All Operators" followed by `operators`
    fn set_options(&mut self, operators: &[String]);

    fn selected(&self) -> String;
}

/// Search radius in whole kilometers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadiusSlider {
    min: u32,
    max: u32,
    value: u32,
}

impl RadiusSlider {
    pub fn new(min: u32, max: u32, value: u32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            value: value.clamp(min, max),
        }
    }

    /// Sets the value, clamped to the slider's range; returns the new value
    pub fn set_value(&mut self, value: u32) -> u32 {
        self.value = value.clamp(self.min, self.max);
        self.value
    }

    /// Parses raw input as a host widget reports it
    pub fn set_from_input(&mut self, input: &str) -> Option<u32> {
        let value = input.trim().parse::<f64>().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(self.set_value(value.max(0.0).round() as u32))
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn range(&self) -> (u32, u32) {
        (self.min, self.max)
    }

    /// Live numeric readout next to the slider
    pub fn readout(&self) -> String {
        self.value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(cached: bool, rate_limited: bool, message: Option<&str>) -> ResultSummary {
        ResultSummary {
            count: 42,
            cached,
            rate_limited,
            message: message.map(String::from),
        }
    }

    #[test]
    fn test_plain_summary() {
        assert_eq!(summary(false, false, None).lines(), vec!["42 towers found".to_string()]);
    }

    #[test]
    fn test_summary_with_all_flags() {
        let lines = summary(true, true, Some("Daily API limit reached")).lines();
        assert_eq!(
            lines,
            vec![
                "42 towers found (cached)".to_string(),
                RATE_LIMITED_NOTICE.to_string(),
                "Daily API limit reached".to_string(),
            ]
        );
    }

    #[test]
    fn test_summary_html_escapes_message() {
        let html = summary(false, false, Some("<script>")).to_html();
        assert!(html.starts_with(r#"<span class="count">42</span> towers found"#));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_failed_panel_html() {
        assert_eq!(
            ResultsPanel::Failed("rate limit exceeded".to_string()).to_html(),
            r#"<span class="error-msg">rate limit exceeded</span>"#
        );
    }

    #[test]
    fn test_empty_message_is_dropped() {
        let result = SearchResult {
            towers: Vec::new(),
            count: 0,
            cached: false,
            rate_limited: false,
            message: Some(String::new()),
        };
        assert_eq!(ResultSummary::from(&result).message, None);
    }

    #[test]
    fn test_radius_slider_clamps() {
        let mut slider = RadiusSlider::new(1, 50, 10);
        assert_eq!(slider.readout(), "10");

        assert_eq!(slider.set_value(80), 50);
        assert_eq!(slider.set_value(0), 1);
        assert_eq!(slider.set_from_input(" 25 "), Some(25));
        assert_eq!(slider.set_from_input("abc"), None);
        assert_eq!(slider.value(), 25);
        assert_eq!(slider.set_from_input("-3"), Some(1));
    }
}
