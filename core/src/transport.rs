//! Executing an `HttpRequest`.
//!
//! # Design
//! `Transport` is the seam between the deterministic client and the network.
//! The built-in `UreqTransport` does a blocking round-trip with the timeouts
//! carried on the request. Any `Fn(&HttpRequest) -> Result<HttpResponse, _>`
//! is also a transport, which is how tests substitute canned responses.

use tracing::debug;
use ureq::Agent;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}

/// Blocking transport backed by `ureq`.
///
/// A fresh agent is configured per request, so each call gets its own
/// connection and releases it when the response is dropped. The read timeout
/// bounds the wait for the response head and, separately, the whole body.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl UreqTransport {
    fn agent(request: &HttpRequest) -> Agent {
        Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(request.connect_timeout))
            .timeout_recv_response(Some(request.read_timeout))
            .timeout_recv_body(Some(request.read_timeout))
            .build()
            .new_agent()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = Self::agent(request);
        debug!(url = %request.url, "sending request");

        let mut response = match request.method {
            HttpMethod::Get => agent.get(&request.url).call(),
        }
        .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        // No size cap; malformed UTF-8 is replaced with U+FFFD.
        let body = match response.body_mut().with_config().limit(u64::MAX).read_to_vec() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            // Only a 200 body is ever parsed.
            Err(_) if status != 200 => String::new(),
            Err(e) => return Err(ApiError::Transport(e.to_string())),
        };
        debug!(status, bytes = body.len(), "response received");

        Ok(HttpResponse { status, body })
    }
}
