use once_cell::sync::Lazy;
use regex::Regex;

use crate::search::resolver::ResolvedPoint;

static COORDINATE_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?[0-9]+\.?[0-9]*)\s*,\s*(-?[0-9]+\.?[0-9]*)$")
        .expect("failed to compile coordinate pattern")
});

/// Parses a literal `lat, lon` pair.
///
/// Returns `None` for anything else, including pairs with exponents or a
/// leading `+`. Range is not checked here.
pub fn parse_coordinates(query: &str) -> Option<ResolvedPoint> {
    let captures = COORDINATE_PAIR.captures(query.trim())?;
    let lat_text = captures.get(1)?.as_str();
    let lon_text = captures.get(2)?.as_str();

    Some(ResolvedPoint {
        lat: lat_text.parse().ok()?,
        lon: lon_text.parse().ok()?,
        label: format!("{}, {}", lat_text, lon_text),
    })
}
