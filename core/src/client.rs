//! Request builder, response parser and the fetch-then-extract pipeline.
//!
//! # Design
//! `QuakeClient` holds only its `FetchConfig` and carries no mutable state
//! between calls. The single operation is split into `build_fetch_event`,
//! which produces an `HttpRequest`, and `parse_fetch_event`, which consumes
//! an `HttpResponse`. A host can run the round-trip itself; `fetch_event`
//! runs it through any `Transport`.
//!
//! `fetch_event` keeps every failure kind visible. `load_event` is the
//! screen-facing variant: it logs the failure and hands the display step
//! `None`.

use tracing::{debug, error};
use url::Url;

use crate::config::FetchConfig;
use crate::error::ApiError;
use crate::extract::try_extract_event;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::Event;

#[derive(Debug, Clone, Default)]
pub struct QuakeClient {
    config: FetchConfig,
}

impl QuakeClient {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        Self::new(FetchConfig::with_endpoint(endpoint))
    }

    /// Build the GET request for the configured endpoint.
    ///
    /// Fails with `InvalidUrl` unless the endpoint is an absolute http(s) URL
    /// with a host; nothing is sent in that case.
    pub fn build_fetch_event(&self) -> Result<HttpRequest, ApiError> {
        let url = parse_endpoint(&self.config.endpoint)?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            connect_timeout: self.config.connect_timeout(),
            read_timeout: self.config.read_timeout(),
        })
    }

    /// Check the status, apply the line-break policy and return the body.
    pub fn parse_body(&self, response: HttpResponse) -> Result<String, ApiError> {
        if response.status != 200 {
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }
        Ok(self.config.line_breaks.apply(response.body))
    }

    pub fn parse_fetch_event(&self, response: HttpResponse) -> Result<Option<Event>, ApiError> {
        let body = self.parse_body(response)?;
        try_extract_event(&body)
    }

    /// Build the request, execute it and return the 200 body.
    pub fn fetch_body<T: Transport + ?Sized>(&self, transport: &T) -> Result<String, ApiError> {
        let request = self.build_fetch_event()?;
        let response = transport.execute(&request)?;
        debug!(status = response.status, "fetched event feed");
        self.parse_body(response)
    }

    pub fn fetch_event<T: Transport + ?Sized>(&self, transport: &T) -> Result<Option<Event>, ApiError> {
        let body = self.fetch_body(transport)?;
        try_extract_event(&body)
    }

    /// Run the pipeline once, logging any failure and reporting it as `None`.
    pub fn load_event<T: Transport + ?Sized>(&self, transport: &T) -> Option<Event> {
        match self.fetch_event(transport) {
            Ok(event) => event,
            Err(e) => {
                log_failure(&e);
                None
            }
        }
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, ApiError> {
    let url = Url::parse(endpoint).map_err(|e| ApiError::InvalidUrl(format!("{endpoint}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
        return Err(ApiError::InvalidUrl(format!("{endpoint}: not an http(s) URL")));
    }
    Ok(url)
}

fn log_failure(err: &ApiError) {
    match err {
        ApiError::InvalidUrl(_) => error!(error = %err, "error with creating URL"),
        ApiError::Transport(_) => error!(error = %err, "problem retrieving the earthquake JSON results"),
        ApiError::Http { status, .. } => error!(status, "error response code"),
        ApiError::Deserialization(_) => error!(error = %err, "problem parsing the earthquake JSON results"),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use super::*;
    use crate::config::{LineBreaks, DEFAULT_ENDPOINT};
    use crate::types::TsunamiAlert;

    const BODY: &str = r#"{"features":[{"properties":{"title":"M 6.1 - 89km ...","time":1338289562000,"tsunami":1}}]}"#;

    fn client() -> QuakeClient {
        QuakeClient::with_endpoint("http://localhost:3000/fdsnws/event/1/query?format=geojson")
    }

    #[test]
    fn build_fetch_event_produces_get_with_timeouts() {
        let req = QuakeClient::default().build_fetch_event().unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, DEFAULT_ENDPOINT);
        assert_eq!(req.connect_timeout, Duration::from_millis(15_000));
        assert_eq!(req.read_timeout, Duration::from_millis(10_000));
    }

    #[test]
    fn build_fetch_event_rejects_malformed_urls() {
        for endpoint in ["", "not a url", "earthquake.usgs.gov/fdsnws", "ftp://example.com/feed", "file:///tmp/feed.json"] {
            let err = QuakeClient::with_endpoint(endpoint).build_fetch_event().unwrap_err();
            assert!(matches!(err, ApiError::InvalidUrl(_)), "{endpoint}");
        }
    }

    #[test]
    fn invalid_url_never_reaches_transport() {
        let calls = Cell::new(0);
        let transport = |_: &HttpRequest| -> Result<HttpResponse, ApiError> {
            calls.set(calls.get() + 1);
            Ok(HttpResponse::ok(BODY))
        };
        let client = QuakeClient::with_endpoint("::nope::");
        assert_eq!(client.load_event(&transport), None);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn parse_fetch_event_success() {
        let event = client().parse_fetch_event(HttpResponse::ok(BODY)).unwrap().unwrap();
        assert_eq!(event.title(), "M 6.1 - 89km ...");
        assert_eq!(event.time(), 1_338_289_562_000);
        assert_eq!(event.tsunami_alert(), TsunamiAlert::Alert);
    }

    #[test]
    fn parse_fetch_event_non_200_is_http_error() {
        for status in [201, 204, 301, 404, 500] {
            let response = HttpResponse {
                status,
                body: BODY.to_string(),
            };
            let err = client().parse_fetch_event(response).unwrap_err();
            assert!(matches!(err, ApiError::Http { status: s, .. } if s == status));
        }
    }

    #[test]
    fn parse_fetch_event_empty_body_is_no_record() {
        assert_eq!(client().parse_fetch_event(HttpResponse::ok("")).unwrap(), None);
    }

    #[test]
    fn parse_body_strips_line_breaks_by_default() {
        let body = client().parse_body(HttpResponse::ok("{\n  \"features\": []\r\n}\n")).unwrap();
        assert_eq!(body, "{  \"features\": []}");
    }

    #[test]
    fn parse_body_preserves_line_breaks_when_configured() {
        let client = QuakeClient::new(FetchConfig {
            line_breaks: LineBreaks::Preserve,
            ..FetchConfig::default()
        });
        let body = client.parse_body(HttpResponse::ok("{\n}\n")).unwrap();
        assert_eq!(body, "{\n}\n");
    }

    #[test]
    fn stripped_line_breaks_still_parse() {
        let body = "{\"features\":[{\"properties\":{\n\"title\":\"t\",\n\"time\":5,\r\n\"tsunami\":0}}]}\n";
        let event = client().parse_fetch_event(HttpResponse::ok(body)).unwrap().unwrap();
        assert_eq!(event.time(), 5);
    }

    #[test]
    fn fetch_event_passes_built_request_to_transport() {
        let transport = |req: &HttpRequest| -> Result<HttpResponse, ApiError> {
            assert_eq!(req.url, "http://localhost:3000/fdsnws/event/1/query?format=geojson");
            assert_eq!(req.method, HttpMethod::Get);
            Ok(HttpResponse::ok(BODY))
        };
        let event = client().fetch_event(&transport).unwrap().unwrap();
        assert_eq!(event.title(), "M 6.1 - 89km ...");
    }

    #[test]
    fn fetch_event_surfaces_transport_failure() {
        let transport = |_: &HttpRequest| -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("connection refused".to_string()))
        };
        let err = client().fetch_event(&transport).unwrap_err();
        assert_eq!(err, ApiError::Transport("connection refused".to_string()));
        assert_eq!(client().load_event(&transport), None);
    }

    #[test]
    fn load_event_collapses_every_failure_to_none() {
        let bad_status = |_: &HttpRequest| -> Result<HttpResponse, ApiError> {
            Ok(HttpResponse {
                status: 503,
                body: String::new(),
            })
        };
        let bad_json = |_: &HttpRequest| -> Result<HttpResponse, ApiError> { Ok(HttpResponse::ok("{")) };
        assert_eq!(client().load_event(&bad_status), None);
        assert_eq!(client().load_event(&bad_json), None);
    }
}
