//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, a boxed slice instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use bexio_core::{ApiError, HttpMethod};

/// Opaque handle to a `BexioClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiBexioClient {
    pub(crate) inner: bexio_core::BexioClient,
}

/// Heap-allocate `s` as a C string. Interior NULs are dropped rather than
/// failing the whole call.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    let cleaned = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(cleaned).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `bexio_build_*`. The C caller executes the request and passes
/// the response back through `bexio_parse_response`. `url` embeds the
/// public key.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: bexio_core::HttpRequest) -> *mut Self {
        let headers_len = req.headers.len() as u32;
        let headers: Box<[FfiHeader]> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: into_c_string(k),
                value: into_c_string(v),
            })
            .collect();
        let headers = Box::into_raw(headers) as *mut FfiHeader;

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: into_c_string(req.url),
            headers,
            headers_len,
            body: req.body.map(into_c_string).unwrap_or(std::ptr::null_mut()),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller builds this on the stack after executing a request and
/// passes a pointer to `bexio_parse_response`. A null `body` means the
/// server sent none. The FFI layer reads but never frees these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiBexioResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Api = 1,
    Transport = 2,
    EmptyBody = 3,
    Decode = 4,
    Serialization = 5,
    Panic = 6,
    NullArg = 7,
    InvalidArg = 8,
}

/// Result envelope for parse and call operations.
///
/// On success `error_code` is `Ok`, `error_message` is null and `json`
/// holds the payload re-encoded as compact JSON.
/// On failure `json` is null, `error_message` is a human-readable string,
/// and for `Api` errors `api_error_code` carries the service's `error_code`
/// (and `api_message` its `message`, when sent).
#[repr(C)]
pub struct FfiBexioResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub api_error_code: *mut c_char,
    pub api_message: *mut c_char,
    pub http_status: u16,
    pub json: *mut c_char,
}

impl FfiBexioResult {
    fn boxed(error_code: FfiErrorCode, error_message: Option<String>) -> Box<Self> {
        Box::new(FfiBexioResult {
            error_code,
            error_message: error_message.map(into_c_string).unwrap_or(std::ptr::null_mut()),
            api_error_code: std::ptr::null_mut(),
            api_message: std::ptr::null_mut(),
            http_status: 0,
            json: std::ptr::null_mut(),
        })
    }

    /// Build a success result carrying the payload as JSON text.
    pub(crate) fn ok(value: serde_json::Value) -> *mut Self {
        let mut result = Self::boxed(FfiErrorCode::Ok, None);
        result.json = into_c_string(value.to_string());
        Box::into_raw(result)
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let code = match &err {
            ApiError::Api(_) => FfiErrorCode::Api,
            ApiError::Transport(_) => FfiErrorCode::Transport,
            ApiError::EmptyBody { .. } => FfiErrorCode::EmptyBody,
            ApiError::Decode { .. } => FfiErrorCode::Decode,
            ApiError::Serialization(_) => FfiErrorCode::Serialization,
        };
        let mut result = Self::boxed(code, Some(err.to_string()));
        match err {
            ApiError::Api(failure) => {
                result.api_error_code = into_c_string(failure.code_string());
                if let Some(message) = failure.message {
                    result.api_message = into_c_string(message);
                }
            }
            ApiError::EmptyBody { status } | ApiError::Decode { status, .. } => {
                result.http_status = status;
            }
            ApiError::Transport(_) | ApiError::Serialization(_) => {}
        }
        Box::into_raw(result)
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Box::into_raw(Self::boxed(
            FfiErrorCode::NullArg,
            Some(format!("null argument: {name}")),
        ))
    }

    /// Build an error result for an argument that is not valid UTF-8.
    pub(crate) fn invalid_arg(name: &str) -> *mut Self {
        Box::into_raw(Self::boxed(
            FfiErrorCode::InvalidArg,
            Some(format!("argument is not valid UTF-8: {name}")),
        ))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Box::into_raw(Self::boxed(FfiErrorCode::Panic, Some(msg.to_string())))
    }
}
