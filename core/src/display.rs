//! Display strings for an `Event`.
//!
//! The screen shows three strings: the title verbatim, the event time in a
//! fixed pattern, and one of three alert labels. Labels are supplied by the
//! host so they can be localized; `AlertLabels::default()` is English.

use chrono::{DateTime, Utc};

use crate::types::{Event, TsunamiAlert};

/// `EEE, d MMM yyyy 'at' HH:mm:ss z`, always rendered in UTC.
const TIME_FORMAT: &str = "%a, %-d %b %Y at %H:%M:%S UTC";

/// Format milliseconds since the epoch, or `None` if out of range.
pub fn format_event_time(time_ms: i64) -> Option<String> {
    let time = DateTime::<Utc>::from_timestamp_millis(time_ms)?;
    Some(time.format(TIME_FORMAT).to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertLabels {
    pub no: String,
    pub yes: String,
    pub not_available: String,
}

impl Default for AlertLabels {
    fn default() -> Self {
        Self {
            no: "No".to_string(),
            yes: "Yes".to_string(),
            not_available: "Not available".to_string(),
        }
    }
}

impl TsunamiAlert {
    pub fn label(self, labels: &AlertLabels) -> &str {
        match self {
            TsunamiAlert::None => &labels.no,
            TsunamiAlert::Alert => &labels.yes,
            TsunamiAlert::Unknown(_) => &labels.not_available,
        }
    }
}

/// The three strings the screen renders for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventView {
    pub title: String,
    /// Empty when the timestamp can't be represented.
    pub date: String,
    pub tsunami_alert: String,
}

impl EventView {
    pub fn new(event: &Event, labels: &AlertLabels) -> Self {
        Self {
            title: event.title().to_string(),
            date: format_event_time(event.time()).unwrap_or_default(),
            tsunami_alert: event.tsunami_alert().label(labels).to_string(),
        }
    }
}
