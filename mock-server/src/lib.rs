//! In-process stand-in for the USGS FDSN event service.
//!
//! Serves `GET /fdsnws/event/1/query` from a fixed catalog, filtered the way
//! the real service filters `starttime`, `endtime` and `minmagnitude`, newest
//! event first. `GET /status/{code}` answers with an arbitrary status so
//! clients can be tested against failing upstreams.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

pub const QUERY_PATH: &str = "/fdsnws/event/1/query";

/// One catalog entry. Serialized as a feature's `properties`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quake {
    pub mag: f64,
    pub title: String,
    pub time: i64,
    pub tsunami: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: Quake,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Metadata {
    pub status: u16,
    pub count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub metadata: Metadata,
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct EventQueryParams {
    pub format: String,
    pub starttime: Option<String>,
    pub endtime: Option<String>,
    pub minmagnitude: Option<f64>,
}

pub type Catalog = Arc<Vec<Quake>>;

fn quake(mag: f64, title: &str, time: i64, tsunami: i64) -> Quake {
    Quake {
        mag,
        title: title.to_string(),
        time,
        tsunami,
    }
}

/// A handful of M5+ events around 2012.
pub fn default_catalog() -> Vec<Quake> {
    vec![
        quake(9.1, "M 9.1 - 2011 Great Tohoku Earthquake, Japan", 1_299_822_384_000, 1),
        quake(8.6, "M 8.6 - off the west coast of northern Sumatra", 1_334_133_517_000, 1),
        quake(6.1, "M 6.1 - 89km SSE of Ndoi Island, Fiji", 1_338_289_562_000, 1),
        quake(5.4, "M 5.4 - 12km NW of Ovalle, Chile", 1_338_523_950_000, 0),
        quake(7.6, "M 7.6 - Philippine Islands region", 1_346_417_253_000, 1),
        quake(7.7, "M 7.7 - Haida Gwaii Region, Canada", 1_351_393_448_000, 1),
        quake(7.4, "M 7.4 - 24km SSW of Champerico, Guatemala", 1_352_306_146_000, 0),
    ]
}

pub fn app() -> Router {
    app_with(default_catalog())
}

pub fn app_with(catalog: Vec<Quake>) -> Router {
    let catalog: Catalog = Arc::new(catalog);
    Router::new()
        .route(QUERY_PATH, get(query_events))
        .route("/status/{code}", get(fixed_status))
        .with_state(catalog)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Midnight UTC of a `YYYY-MM-DD` date, in epoch milliseconds.
fn date_millis(field: &str, raw: &str) -> Result<i64, (StatusCode, String)> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp_millis())
        .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("Bad {field} value \"{raw}\"")))
}

async fn query_events(
    State(catalog): State<Catalog>,
    Query(params): Query<EventQueryParams>,
) -> Result<Json<FeatureCollection>, (StatusCode, String)> {
    if params.format != "geojson" {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Bad format value \"{}\"", params.format),
        ));
    }
    let start = params
        .starttime
        .as_deref()
        .map(|raw| date_millis("starttime", raw))
        .transpose()?
        .unwrap_or(i64::MIN);
    let end = params
        .endtime
        .as_deref()
        .map(|raw| date_millis("endtime", raw))
        .transpose()?
        .unwrap_or(i64::MAX);
    let min_mag = params.minmagnitude.unwrap_or(f64::MIN);

    let mut matches: Vec<&Quake> = catalog
        .iter()
        .filter(|q| q.mag >= min_mag && q.time >= start && q.time < end)
        .collect();
    matches.sort_by(|a, b| b.time.cmp(&a.time));
    debug!(count = matches.len(), "answering event query");

    let features: Vec<Feature> = matches
        .into_iter()
        .map(|q| Feature {
            kind: "Feature".to_string(),
            properties: q.clone(),
        })
        .collect();
    Ok(Json(FeatureCollection {
        kind: "FeatureCollection".to_string(),
        metadata: Metadata {
            status: 200,
            count: features.len(),
        },
        features,
    }))
}

async fn fixed_status(Path(code): Path<u16>) -> (StatusCode, String) {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, format!("status {code}")),
        Err(_) => (StatusCode::BAD_REQUEST, format!("invalid status {code}")),
    }
}
