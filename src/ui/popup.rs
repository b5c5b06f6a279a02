//! Popup content attached to markers
//!
//! A popup is a title plus label/value rows. Surfaces that render HTML use
//! [`Popup::to_html`], which produces the `popup-title` / `popup-row`
//! markup the page stylesheet expects; text surfaces use the `Display` impl.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl Popup {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.rows.push((label.into(), value.into()));
        self
    }

    /// Value of the first row with `label`
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(row_label, _)| row_label == label)
            .map(|(_, value)| value.as_str())
    }

    pub fn to_html(&self) -> String {
        let rows: String = self
            .rows
            .iter()
            .map(|(label, value)| {
                format!(
                    r#"<div class="popup-row"><span class="popup-label">{}</span><span class="popup-value">{}</span></div>"#,
                    escape_html(label),
                    escape_html(value)
                )
            })
            .collect();

        format!(
            r#"<div class="popup-title">{}</div>{}"#,
            escape_html(&self.title),
            rows
        )
    }
}

impl fmt::Display for Popup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        let width = self.rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, value) in &self.rows {
            writeln!(f, "  {:width$}  {}", label, value, width = width)?;
        }
        Ok(())
    }
}

/// Escapes text for inclusion in HTML element content
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_markup() {
        let popup = Popup::new("LTE Tower").with_row("Operator", "AT&T");

        assert_eq!(
            popup.to_html(),
            r#"<div class="popup-title">LTE Tower</div><div class="popup-row"><span class="popup-label">Operator</span><span class="popup-value">AT&amp;T</span></div>"#
        );
    }

    #[test]
    fn test_value_lookup_and_text() {
        let popup = Popup::new("GSM Tower")
            .with_row("Cell ID", "1234")
            .with_row("LAC", "7");

        assert_eq!(popup.value("LAC"), Some("7"));
        assert_eq!(popup.value("Range"), None);
        assert_eq!(popup.to_string(), "GSM Tower\n  Cell ID  1234\n  LAC      7\n");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"x\"</b>"), "&lt;b&gt;&quot;x&quot;&lt;/b&gt;");
    }
}
