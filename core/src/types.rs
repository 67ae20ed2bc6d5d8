//! Domain and wire types for the USGS event feed.
//!
//! # Design
//! `Event` is the only value handed to the display step. Its fields are
//! private so a constructed event can't be mutated, and absence is modelled
//! as `Option<Event>` rather than a half-filled instance.
//!
//! The wire DTOs only describe what the extractor reads. `features` stays a
//! list of raw `serde_json::Value`s so that entries after the first are never
//! validated.

use serde::Deserialize;

/// Tsunami alert status of an event, decoded from the feed's integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TsunamiAlert {
    /// Code `0`: no alert was issued.
    None,
    /// Code `1`: an alert was issued.
    Alert,
    /// Any other code. The raw value is kept for diagnostics only.
    Unknown(i64),
}

impl TsunamiAlert {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => TsunamiAlert::None,
            1 => TsunamiAlert::Alert,
            other => TsunamiAlert::Unknown(other),
        }
    }

    /// The integer code used on the wire.
    pub fn code(self) -> i64 {
        match self {
            TsunamiAlert::None => 0,
            TsunamiAlert::Alert => 1,
            TsunamiAlert::Unknown(code) => code,
        }
    }
}

impl From<i64> for TsunamiAlert {
    fn from(code: i64) -> Self {
        TsunamiAlert::from_code(code)
    }
}

/// A single earthquake as shown on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    title: String,
    time: i64,
    tsunami_alert: TsunamiAlert,
}

impl Event {
    pub fn new(title: impl Into<String>, time: i64, tsunami_alert: TsunamiAlert) -> Self {
        Self {
            title: title.into(),
            time,
            tsunami_alert,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Milliseconds since the Unix epoch, UTC.
    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn tsunami_alert(&self) -> TsunamiAlert {
        self.tsunami_alert
    }

    pub fn into_parts(self) -> (String, i64, TsunamiAlert) {
        (self.title, self.time, self.tsunami_alert)
    }
}

/// Top level of a GeoJSON response from the FDSN event service.
#[derive(Debug, Deserialize)]
pub(crate) struct FeatureCollection {
    pub features: Vec<serde_json::Value>,
}

/// The `properties` object of the first feature.
#[derive(Debug, Deserialize)]
pub(crate) struct Feature {
    pub properties: Properties,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Properties {
    pub title: String,
    pub time: i64,
    pub tsunami: i64,
}
