//! Client core for a single-event earthquake screen.
//!
//! # Overview
//! Fetches the USGS FDSN event feed once and extracts the first feature as an
//! immutable `Event` (title, time, tsunami alert). Absence of a record is
//! `None`; every failure kind is an explicit `ApiError` until the screen-facing
//! `load_event` logs it and collapses it into `None`.
//!
//! # Design
//! - `QuakeClient` is stateless: it holds only its `FetchConfig`.
//! - The round-trip is split into `build_fetch_event` (produces request) and
//!   `parse_fetch_event` (consumes response), so a mobile host can run the
//!   I/O itself. `Transport` covers the case where the core runs it, with
//!   `UreqTransport` as the blocking implementation.
//! - `FetchTask` runs the pipeline off the caller's thread, once, and can be
//!   cancelled.
//! - `display` renders the three on-screen strings.

pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod extract;
pub mod http;
pub mod task;
pub mod transport;
pub mod types;

pub use client::QuakeClient;
pub use config::{EventQuery, FetchConfig, LineBreaks};
pub use display::{format_event_time, AlertLabels, EventView};
pub use error::ApiError;
pub use extract::{extract_event, try_extract_event};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use task::FetchTask;
pub use transport::{Transport, UreqTransport};
pub use types::{Event, TsunamiAlert};
