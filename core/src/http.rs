//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe the one request this client makes, and its response,
//! as plain data. `QuakeClient` builds an `HttpRequest` and parses an
//! `HttpResponse`; whoever sits in between (a host over FFI, `UreqTransport`,
//! or a test closure) performs the I/O.
//!
//! Timeouts travel with the request so a host executing it natively can apply
//! the same connect and read limits as the built-in transport.
//!
//! All fields use owned types so values can cross FFI boundaries without
//! lifetime concerns.

use std::time::Duration;

/// HTTP method for a request. The event feed is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

/// An HTTP response described as plain data.
///
/// `body` is the full body decoded as UTF-8, before any line-break policy is
/// applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}
