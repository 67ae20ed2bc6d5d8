//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible fields: `*mut c_char`
//! instead of `String`, milliseconds instead of `Duration`, and enums with
//! explicit discriminants. Conversion functions live here to keep `lib.rs`
//! focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use quake_core::{ApiError, Event, FetchTask, HttpMethod, HttpRequest, QuakeClient, TsunamiAlert};

/// Opaque handle to a `QuakeClient`.
pub struct FfiQuakeClient {
    pub(crate) inner: QuakeClient,
}

/// Opaque handle to a running background fetch.
pub struct FfiFetchTask {
    pub(crate) inner: FetchTask,
}

/// Called once from the worker thread when a spawned fetch completes and was
/// not cancelled. The callee owns `result` and frees it with
/// `quake_free_result`.
pub type FfiFetchCallback = Option<extern "C" fn(user_data: *mut c_void, result: *mut FfiEventResult)>;

/// Host pointer handed back to the callback untouched.
pub(crate) struct UserData(pub(crate) *mut c_void);

// The host promises `user_data` may be used from the worker thread.
unsafe impl Send for UserData {}

impl UserData {
    pub(crate) fn get(&self) -> *mut c_void {
        self.0
    }
}

/// Convert to a C string, dropping interior NUL bytes rather than failing.
pub(crate) fn c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    let cstr = CString::new(s).unwrap_or_else(|e| {
        let mut bytes = e.into_vec();
        bytes.retain(|b| *b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    cstr.into_raw()
}

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// The request a host should execute, with the timeouts it should apply.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: c_string(req.url),
            connect_timeout_ms: req.connect_timeout.as_millis() as u64,
            read_timeout_ms: req.read_timeout.as_millis() as u64,
        }))
    }
}

/// A response the host received. Read, never freed, by this library.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidUrl = 1,
    Transport = 2,
    Http = 3,
    Deserialization = 4,
    Panic = 5,
    NullArg = 6,
}

#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiTsunamiAlert {
    None = 0,
    Alert = 1,
    Unknown = 2,
}

impl From<TsunamiAlert> for FfiTsunamiAlert {
    fn from(alert: TsunamiAlert) -> Self {
        match alert {
            TsunamiAlert::None => FfiTsunamiAlert::None,
            TsunamiAlert::Alert => FfiTsunamiAlert::Alert,
            TsunamiAlert::Unknown(_) => FfiTsunamiAlert::Unknown,
        }
    }
}

#[repr(C)]
pub struct FfiEvent {
    pub title: *mut c_char,
    pub time_ms: i64,
    pub tsunami_alert: FfiTsunamiAlert,
    /// The raw `tsunami` code from the feed.
    pub tsunami_code: i64,
}

/// Result envelope for every operation that yields an event.
///
/// On success `error_code` is `Ok` and `error_message` is null; `event` is
/// null when there is no record. On failure `event` is null, `error_message`
/// is a human-readable C string, and `http_status` is set for `Http`.
#[repr(C)]
pub struct FfiEventResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub event: *mut FfiEvent,
}

impl FfiEventResult {
    fn boxed(error_code: FfiErrorCode, error_message: *mut c_char, http_status: u16, event: *mut FfiEvent) -> *mut Self {
        Box::into_raw(Box::new(FfiEventResult {
            error_code,
            error_message,
            http_status,
            event,
        }))
    }

    pub(crate) fn from_outcome(outcome: Result<Option<Event>, ApiError>) -> *mut Self {
        match outcome {
            Ok(event) => Self::ok(event),
            Err(e) => Self::from_error(e),
        }
    }

    pub(crate) fn ok(event: Option<Event>) -> *mut Self {
        let event = match event {
            Some(event) => {
                let (title, time, alert) = event.into_parts();
                Box::into_raw(Box::new(FfiEvent {
                    title: c_string(title),
                    time_ms: time,
                    tsunami_alert: alert.into(),
                    tsunami_code: alert.code(),
                }))
            }
            None => std::ptr::null_mut(),
        };
        Self::boxed(FfiErrorCode::Ok, std::ptr::null_mut(), 0, event)
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (error_code, http_status) = match &err {
            ApiError::InvalidUrl(_) => (FfiErrorCode::InvalidUrl, 0),
            ApiError::Transport(_) => (FfiErrorCode::Transport, 0),
            ApiError::Http { status, .. } => (FfiErrorCode::Http, *status),
            ApiError::Deserialization(_) => (FfiErrorCode::Deserialization, 0),
        };
        Self::boxed(error_code, c_string(err.to_string()), http_status, std::ptr::null_mut())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            c_string(format!("null argument: {name}")),
            0,
            std::ptr::null_mut(),
        )
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, c_string(msg), 0, std::ptr::null_mut())
    }
}
