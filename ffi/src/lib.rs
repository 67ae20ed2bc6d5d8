//! C-ABI wrapper around `quake-core`.
//!
//! # Overview
//! Exposes the earthquake fetch through `extern "C"` functions so a mobile
//! host can either execute the HTTP request itself (`quake_build_request` /
//! `quake_parse_response`) or let the library do it, blocking
//! (`quake_fetch_event`) or on a background thread (`quake_fetch_spawn`).
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Every event-producing call returns one `FfiEventResult` envelope. A null
//!   `event` with `error_code = Ok` is "no record".
//! - The C caller owns all returned pointers and must call the matching
//!   `quake_free_*` function to release them.

pub mod types;

use std::ffi::{c_void, CStr};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use quake_core::{
    extract_event, format_event_time, AlertLabels, FetchConfig, FetchTask, HttpResponse, QuakeClient, TsunamiAlert,
    UreqTransport,
};
use tracing_subscriber::EnvFilter;

use types::*;

/// Borrow a C string as UTF-8, replacing invalid input with `""`.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string.
unsafe fn str_arg<'a>(ptr: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("")
}

/// Copy a response body, replacing malformed UTF-8 with U+FFFD.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string.
unsafe fn body_arg(ptr: *const c_char) -> String {
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install a stderr `tracing` subscriber. `filter` uses `RUST_LOG` syntax;
/// null falls back to `RUST_LOG`, then `info`.
///
/// Returns false if a subscriber was already installed.
#[unsafe(no_mangle)]
pub extern "C" fn quake_init_logging(filter: *const c_char) -> bool {
    catch_unwind(|| {
        let filter = if filter.is_null() {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        } else {
            EnvFilter::new(unsafe { str_arg(filter) })
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .try_init()
            .is_ok()
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client for `endpoint` with default timeouts. Null `endpoint`
/// uses the default USGS query.
///
/// The endpoint is validated when a request is built, not here.
/// The caller must free the returned pointer with `quake_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn quake_client_new(endpoint: *const c_char) -> *mut FfiQuakeClient {
    catch_unwind(|| {
        let client = if endpoint.is_null() {
            QuakeClient::default()
        } else {
            QuakeClient::with_endpoint(unsafe { str_arg(endpoint) })
        };
        Box::into_raw(Box::new(FfiQuakeClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a client from a JSON `FetchConfig`, e.g.
/// `{"endpoint":"...","connect_timeout_ms":15000,"read_timeout_ms":10000,"line_breaks":"strip"}`.
/// Missing keys take their defaults.
///
/// Returns null if `config_json` is null or not a valid config.
#[unsafe(no_mangle)]
pub extern "C" fn quake_client_new_with_config(config_json: *const c_char) -> *mut FfiQuakeClient {
    catch_unwind(|| {
        if config_json.is_null() {
            return std::ptr::null_mut();
        }
        match FetchConfig::from_json(unsafe { str_arg(config_json) }) {
            Ok(config) => Box::into_raw(Box::new(FfiQuakeClient {
                inner: QuakeClient::new(config),
            })),
            Err(e) => {
                tracing::error!(error = %e, "invalid client config");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `quake_client_new*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn quake_client_free(client: *mut FfiQuakeClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Host-executed round-trip
// ---------------------------------------------------------------------------

/// Build the request for the host to execute.
///
/// Returns null if `client` is null or its endpoint is not a valid http(s)
/// URL. The caller must free the returned pointer with `quake_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn quake_build_request(client: *const FfiQuakeClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match client.inner.build_fetch_event() {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(e) => {
                tracing::error!(error = %e, "error with creating URL");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Parse the host's response. A null `body` is treated as empty; malformed
/// UTF-8 is replaced with U+FFFD before parsing.
#[unsafe(no_mangle)]
pub extern "C" fn quake_parse_response(
    client: *const FfiQuakeClient,
    response: *const FfiHttpResponse,
) -> *mut FfiEventResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiEventResult::null_arg("client");
        }
        if response.is_null() {
            return FfiEventResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let body = if resp.body.is_null() {
            String::new()
        } else {
            unsafe { body_arg(resp.body) }
        };
        let core_resp = HttpResponse {
            status: resp.status,
            body,
        };
        FfiEventResult::from_outcome(client.inner.parse_fetch_event(core_resp))
    })
    .unwrap_or_else(|_| FfiEventResult::panic("panic in quake_parse_response"))
}

/// Extract an event from a raw body. Null or empty `body` is "no record";
/// parse failures are logged and also reported as "no record".
#[unsafe(no_mangle)]
pub extern "C" fn quake_extract_event(body: *const c_char) -> *mut FfiEventResult {
    catch_unwind(|| {
        if body.is_null() {
            return FfiEventResult::ok(None);
        }
        FfiEventResult::ok(extract_event(&unsafe { body_arg(body) }))
    })
    .unwrap_or_else(|_| FfiEventResult::panic("panic in quake_extract_event"))
}

// ---------------------------------------------------------------------------
// Library-executed round-trip
// ---------------------------------------------------------------------------

/// Fetch and extract on the calling thread. Blocks for up to the connect
/// plus read timeouts; never call this from a UI thread.
#[unsafe(no_mangle)]
pub extern "C" fn quake_fetch_event(client: *const FfiQuakeClient) -> *mut FfiEventResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiEventResult::null_arg("client");
        }
        let client = unsafe { &*client };
        FfiEventResult::from_outcome(client.inner.fetch_event(&UreqTransport))
    })
    .unwrap_or_else(|_| FfiEventResult::panic("panic in quake_fetch_event"))
}

/// Start a background fetch. `callback` runs once on the worker thread with
/// the result, unless the task is cancelled first; failures arrive as a null
/// event (they are logged, not reported).
///
/// The client is copied, so it may be freed right away. Returns null if
/// `client` or `callback` is null or the thread can't be started. The caller
/// must release the handle with `quake_task_free` or `quake_task_join`.
#[unsafe(no_mangle)]
pub extern "C" fn quake_fetch_spawn(
    client: *const FfiQuakeClient,
    callback: FfiFetchCallback,
    user_data: *mut c_void,
) -> *mut FfiFetchTask {
    let user_data = UserData(user_data);
    catch_unwind(AssertUnwindSafe(move || {
        let Some(callback) = callback else {
            return std::ptr::null_mut();
        };
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client }.inner.clone();
        let spawned = FetchTask::spawn(client, UreqTransport, move |event| {
            callback(user_data.get(), FfiEventResult::ok(event));
        });
        match spawned {
            Ok(task) => Box::into_raw(Box::new(FfiFetchTask { inner: task })),
            Err(e) => {
                tracing::error!(error = %e, "failed to start fetch thread");
                std::ptr::null_mut()
            }
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Prevent the callback from running. Safe to call with null or repeatedly.
#[unsafe(no_mangle)]
pub extern "C" fn quake_task_cancel(task: *const FfiFetchTask) {
    if !task.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| unsafe { &*task }.inner.cancel()));
    }
}

/// True once the worker thread has exited. Null counts as finished.
#[unsafe(no_mangle)]
pub extern "C" fn quake_task_is_finished(task: *const FfiFetchTask) -> bool {
    if task.is_null() {
        return true;
    }
    catch_unwind(AssertUnwindSafe(|| unsafe { &*task }.inner.is_finished())).unwrap_or(true)
}

/// Wait for the worker to exit and free the handle. Returns false if the
/// worker panicked. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn quake_task_join(task: *mut FfiFetchTask) -> bool {
    if task.is_null() {
        return true;
    }
    catch_unwind(AssertUnwindSafe(|| unsafe { Box::from_raw(task) }.inner.join())).unwrap_or(false)
}

/// Free the handle without waiting. The fetch keeps running and still
/// delivers unless `quake_task_cancel` was called. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn quake_task_free(task: *mut FfiFetchTask) {
    if !task.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(task) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Format an event time as e.g. `Tue, 29 May 2012 at 11:06:02 UTC`.
///
/// Returns null if `time_ms` is out of range. Free with `quake_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn quake_format_time(time_ms: i64) -> *mut c_char {
    catch_unwind(|| match format_event_time(time_ms) {
        Some(formatted) => c_string(formatted),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// English label for a raw tsunami code: "No", "Yes" or "Not available".
/// Free with `quake_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn quake_alert_label(tsunami_code: i64) -> *mut c_char {
    catch_unwind(|| {
        let labels = AlertLabels::default();
        c_string(TsunamiAlert::from_code(tsunami_code).label(&labels))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by `quake_build_request`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn quake_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        quake_free_string(req.url);
    });
}

/// Free a result returned by any event-producing function, including the
/// one passed to a fetch callback. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn quake_free_result(result: *mut FfiEventResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        quake_free_string(result.error_message);
        if !result.event.is_null() {
            let event = unsafe { Box::from_raw(result.event) };
            quake_free_string(event.title);
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn quake_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { std::ffi::CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
