use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::constants::FALLBACK_RADIO_COLOR;
use crate::core::geo::LatLng;

/// Cellular technology of a tower record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Radio {
    Gsm,
    Lte,
    Nr,
    Cdma,
    Umts,
    /// Anything the backend reports that is not one of the known types
    Other(String),
}

impl Radio {
    /// Radio types that get their own marker layer, in display order
    pub const KNOWN: [Radio; 5] = [Radio::Gsm, Radio::Lte, Radio::Nr, Radio::Cdma, Radio::Umts];

    pub fn as_str(&self) -> &str {
        match self {
            Radio::Gsm => "GSM",
            Radio::Lte => "LTE",
            Radio::Nr => "NR",
            Radio::Cdma => "CDMA",
            Radio::Umts => "UMTS",
            Radio::Other(name) => name,
        }
    }

    /// Marker color; unknown types share a neutral gray
    pub fn color_hex(&self) -> &'static str {
        match self {
            Radio::Gsm => "#ffcc00",
            Radio::Lte => "#3399ff",
            Radio::Nr => "#9933ff",
            Radio::Cdma => "#ff9933",
            Radio::Umts => "#33cccc",
            Radio::Other(_) => FALLBACK_RADIO_COLOR,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Radio::Other(_))
    }
}

impl From<String> for Radio {
    fn from(value: String) -> Self {
        match value.as_str() {
            "GSM" => Radio::Gsm,
            "LTE" => Radio::Lte,
            "NR" => Radio::Nr,
            "CDMA" => Radio::Cdma,
            "UMTS" => Radio::Umts,
            _ => Radio::Other(value),
        }
    }
}

impl From<&str> for Radio {
    fn from(value: &str) -> Self {
        Radio::from(value.to_string())
    }
}

impl From<Radio> for String {
    fn from(radio: Radio) -> Self {
        radio.as_str().to_string()
    }
}

impl fmt::Display for Radio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cell tower as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    #[serde(default)]
    pub id: Option<i64>,
    pub radio: Radio,
    #[serde(default)]
    pub operator: Option<String>,
    pub cell_id: u64,
    pub lac: u32,
    pub mcc: u16,
    pub mnc: u16,
    #[serde(default)]
    pub range_m: Option<f64>,
    #[serde(default)]
    pub signal_avg: Option<f64>,
    #[serde(default)]
    pub samples: Option<u64>,
    #[serde(default)]
    pub source: String,
    pub lat: f64,
    pub lon: f64,
}

impl Tower {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }

    /// Operator name, `None` when missing or blank
    pub fn operator_name(&self) -> Option<&str> {
        self.operator.as_deref().filter(|name| !name.is_empty())
    }
}

/// Body of a successful `/api/towers/search` response.
///
/// `cached`, `rate_limited` and `message` are advisory: they are shown to
/// the user and never change client behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub towers: Vec<Tower>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub rate_limited: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `/api/status`, used only for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub api_calls_today: u64,
    pub api_daily_limit: u64,
    pub total_towers: u64,
    #[serde(default)]
    pub api_key_configured: Option<bool>,
    #[serde(default)]
    pub towers_by_radio: BTreeMap<String, u64>,
}

/// Request body of `/api/towers/search`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub lat: f64,
    pub lon: f64,
    /// Radius in kilometers
    pub radius: f64,
}

impl SearchParams {
    pub fn new(lat: f64, lon: f64, radius: f64) -> Self {
        Self { lat, lon, radius }
    }

    /// Same checks the backend applies; every violation is reported
    pub fn validate(&self, min_radius_km: f64, max_radius_km: f64) -> Vec<String> {
        let mut errors = Vec::new();
        if !(-90.0..=90.0).contains(&self.lat) {
            errors.push("Latitude must be between -90 and 90".to_string());
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            errors.push("Longitude must be between -180 and 180".to_string());
        }
        if !(min_radius_km..=max_radius_km).contains(&self.radius) {
            errors.push(format!(
                "Radius must be between {} and {} km",
                min_radius_km, max_radius_km
            ));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radio_round_trip_keeps_unknown_name() {
        let radio: Radio = serde_json::from_str("\"LTE\"").unwrap();
        assert_eq!(radio, Radio::Lte);

        let other: Radio = serde_json::from_str("\"WIMAX\"").unwrap();
        assert_eq!(other, Radio::Other("WIMAX".to_string()));
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"WIMAX\"");
        assert_eq!(other.color_hex(), "#888888");
        assert!(!other.is_known());
    }

    #[test]
    fn test_tower_from_backend_json() {
        let tower: Tower = serde_json::from_str(
            r#"{"id": 7, "cell_id": 12345, "lac": 100, "mcc": 310, "mnc": 410,
                "lat": 40.7, "lon": -74.0, "radio": "LTE", "range_m": 1500,
                "signal_avg": null, "operator": "AT&T", "samples": 3, "source": "opencellid"}"#,
        )
        .unwrap();

        assert_eq!(tower.radio, Radio::Lte);
        assert_eq!(tower.range_m, Some(1500.0));
        assert_eq!(tower.signal_avg, None);
        assert_eq!(tower.operator_name(), Some("AT&T"));
        assert_eq!(tower.position(), LatLng::new(40.7, -74.0));
    }

    #[test]
    fn test_blank_operator_is_none() {
        let tower: Tower = serde_json::from_str(
            r#"{"cell_id": 1, "lac": 1, "mcc": 310, "mnc": 260, "lat": 0.0, "lon": 0.0,
                "radio": "GSM", "operator": ""}"#,
        )
        .unwrap();
        assert_eq!(tower.operator_name(), None);
        assert_eq!(tower.source, "");
    }

    #[test]
    fn test_search_result_defaults() {
        let result: SearchResult = serde_json::from_str(r#"{"towers": [], "count": 0}"#).unwrap();
        assert!(!result.cached);
        assert!(!result.rate_limited);
        assert!(result.message.is_none());
    }

    #[test]
    fn test_params_validation() {
        assert!(SearchParams::new(40.7, -74.0, 10.0).validate(1.0, 50.0).is_empty());

        let errors = SearchParams::new(95.0, -200.0, 60.0).validate(1.0, 50.0);
        assert_eq!(
            errors,
            vec![
                "Latitude must be between -90 and 90".to_string(),
                "Longitude must be between -180 and 180".to_string(),
                "Radius must be between 1 and 50 km".to_string(),
            ]
        );
    }
}
