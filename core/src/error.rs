//! Error types for the quake client.
//!
//! # Design
//! Each variant is one failure kind a caller may want to tell apart: a bad
//! endpoint never reaches the network, a transport failure never produced a
//! status, and a non-200 status never reaches the extractor. An empty
//! `features` array is not an error and has no variant.

use thiserror::Error;

/// Errors returned by `QuakeClient` and the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The configured endpoint is not an absolute http(s) URL.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),

    /// Connecting, sending, or reading the body failed.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with something other than 200.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The body is not a feature collection with the expected properties.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}
