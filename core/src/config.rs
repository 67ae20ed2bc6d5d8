//! Fetch configuration.
//!
//! # Design
//! The endpoint and both timeouts are plain values passed to
//! `QuakeClient::new`, so tests can point the client at a local server.
//! `FetchConfig` deserializes from JSON with every field optional, which is
//! how the FFI layer accepts configuration from a host.

use std::time::Duration;

use serde::Deserialize;

/// Default USGS query: every M6+ event between 2012-01-01 and 2012-12-01.
pub const DEFAULT_ENDPOINT: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query?format=geojson&starttime=2012-01-01&endtime=2012-12-01&minmagnitude=6";

pub const DEFAULT_HOST: &str = "https://earthquake.usgs.gov";

pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 10_000;

/// How line separators in a 200 response body are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineBreaks {
    /// Drop every CR and LF, concatenating the body's lines.
    #[default]
    Strip,
    /// Keep the body exactly as received.
    Preserve,
}

impl LineBreaks {
    pub fn apply(self, body: String) -> String {
        match self {
            LineBreaks::Preserve => body,
            LineBreaks::Strip if !body.contains(['\r', '\n']) => body,
            LineBreaks::Strip => body.chars().filter(|c| !matches!(c, '\r' | '\n')).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub endpoint: String,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub line_breaks: LineBreaks,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            line_breaks: LineBreaks::default(),
        }
    }
}

impl FetchConfig {
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

/// Parameters of an FDSN event query, rendered into the fixed URL template.
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    /// Inclusive start date, `YYYY-MM-DD`.
    pub starttime: String,
    /// Exclusive end date, `YYYY-MM-DD`.
    pub endtime: String,
    pub minmagnitude: f64,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            starttime: "2012-01-01".to_string(),
            endtime: "2012-12-01".to_string(),
            minmagnitude: 6.0,
        }
    }
}

impl EventQuery {
    /// Render the query against `host` (scheme and authority, no path).
    pub fn endpoint(&self, host: &str) -> String {
        format!(
            "{}/fdsnws/event/1/query?format=geojson&starttime={}&endtime={}&minmagnitude={}",
            host.trim_end_matches('/'),
            self.starttime,
            self.endtime,
            self.minmagnitude
        )
    }
}
