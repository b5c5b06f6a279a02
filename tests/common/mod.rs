//! Shared fakes for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use towermap::{
    search::{Geocoder, ResolutionError, ResolvedPoint},
    towers::ServiceStatus,
    ui::{OperatorSelect, ResultsPanel, SearchControls, StatusIndicator},
};

/// One request as the test server saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Serves `responses` in order, one connection each, then stops.
///
/// Returns the base URL and a handle resolving to the requests received.
pub async fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<RecordedRequest>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut socket).await);

            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                if status < 400 { "OK" } else { "Error" },
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        }
        requests
    });

    (base_url, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> RecordedRequest {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let read = socket.read(&mut chunk).await.unwrap();
        assert!(read > 0, "connection closed before headers were complete");
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buffer.len() < header_end + content_length {
        let read = socket.read(&mut chunk).await.unwrap();
        assert!(read > 0, "connection closed before body was complete");
        buffer.extend_from_slice(&chunk[..read]);
    }

    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    RecordedRequest {
        method: request_line.next().unwrap_or_default().to_string(),
        path: request_line.next().unwrap_or_default().to_string(),
        body: String::from_utf8_lossy(&buffer[header_end..header_end + content_length]).to_string(),
    }
}

/// Geocoder that always answers with the same point
pub struct FixedGeocoder {
    pub answer: Option<ResolvedPoint>,
    pub calls: AtomicUsize,
}

impl FixedGeocoder {
    pub fn new(answer: Option<ResolvedPoint>) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, _query: &str) -> Result<Option<ResolvedPoint>, ResolutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer.clone())
    }
}

/// Records every control update
#[derive(Debug, Default)]
pub struct RecordingControls {
    pub busy: Vec<bool>,
    pub panels: Vec<ResultsPanel>,
    pub statuses: Vec<(StatusIndicator, String)>,
    pub status_panel: Option<ServiceStatus>,
}

impl RecordingControls {
    pub fn is_busy(&self) -> bool {
        self.busy.last().copied().unwrap_or(false)
    }

    pub fn last_panel(&self) -> Option<&ResultsPanel> {
        self.panels.last()
    }

    pub fn last_indicator(&self) -> Option<StatusIndicator> {
        self.statuses.last().map(|(indicator, _)| *indicator)
    }
}

impl SearchControls for RecordingControls {
    fn set_busy(&mut self, busy: bool) {
        self.busy.push(busy);
    }

    fn show_results(&mut self, panel: ResultsPanel) {
        self.panels.push(panel);
    }

    fn set_status(&mut self, indicator: StatusIndicator, text: &str) {
        self.statuses.push((indicator, text.to_string()));
    }

    fn set_status_panel(&mut self, status: &ServiceStatus) {
        self.status_panel = Some(status.clone());
    }
}

/// In-memory operator dropdown
#[derive(Debug, Default)]
pub struct MemorySelect {
    pub options: Vec<String>,
    pub selected: String,
}

impl OperatorSelect for MemorySelect {
    fn set_options(&mut self, operators: &[String]) {
        self.options = operators.to_vec();
        self.selected.clear();
    }

    fn selected(&self) -> String {
        self.selected.clone()
    }
}

pub fn tower_json(radio: &str, operator: &str, lat: f64, lon: f64) -> serde_json::Value {
    serde_json::json!({
        "cell_id": 12345,
        "lac": 100,
        "mcc": 310,
        "mnc": 410,
        "lat": lat,
        "lon": lon,
        "radio": radio,
        "range_m": 1000,
        "signal_avg": -85,
        "operator": operator,
        "samples": 10,
        "source": "opencellid"
    })
}

pub fn status_json() -> String {
    serde_json::json!({
        "api_calls_today": 12,
        "api_daily_limit": 1000,
        "total_towers": 4821,
        "api_key_configured": true,
        "towers_by_radio": {"LTE": 3000, "GSM": 1821}
    })
    .to_string()
}
