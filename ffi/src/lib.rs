//! C-ABI wrapper around `bexio-core`.
//!
//! # Overview
//! Exposes the bexio client through `extern "C"` functions. A C host may
//! either do its own I/O (`bexio_build_*` then `bexio_parse_response`) or
//! let the library perform the call (`bexio_get` / `bexio_post`).
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - A single `FfiBexioResult` envelope conveys payloads and errors.
//! - The C caller owns all returned pointers and must call the matching
//!   `bexio_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::Utf8Error;

use bexio_core::{ApiError, BexioClient, Credentials, HttpResponse};

use types::*;

/// Copy a C string into an owned `String` without altering its bytes.
/// `Ok(None)` for null; invalid UTF-8 is an error, never replaced.
fn read_c_str(ptr: *const c_char) -> Result<Option<String>, Utf8Error> {
    if ptr.is_null() {
        return Ok(None);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map(|s| Some(s.to_string()))
}

/// A required string argument for a call returning `FfiBexioResult`.
fn required_arg(ptr: *const c_char, name: &str) -> Result<String, *mut FfiBexioResult> {
    match read_c_str(ptr) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(FfiBexioResult::null_arg(name)),
        Err(_) => Err(FfiBexioResult::invalid_arg(name)),
    }
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client against the production API.
///
/// `signature` may be null or empty for "no signature". Returns null if any
/// other argument is null, if any argument is not valid UTF-8, or if an
/// internal panic occurs.
/// The caller must free the returned pointer with `bexio_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn bexio_client_new(
    company_id: *const c_char,
    user_id: *const c_char,
    public_key: *const c_char,
    signature: *const c_char,
) -> *mut FfiBexioClient {
    catch_unwind(|| {
        let (Ok(Some(company_id)), Ok(Some(user_id)), Ok(Some(public_key)), Ok(signature)) = (
            read_c_str(company_id),
            read_c_str(user_id),
            read_c_str(public_key),
            read_c_str(signature),
        ) else {
            return std::ptr::null_mut();
        };
        let signature = signature.unwrap_or_default();
        let credentials = Credentials::new(company_id, user_id, public_key, signature);
        Box::into_raw(Box::new(FfiBexioClient {
            inner: BexioClient::new(credentials),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `bexio_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bexio_client_free(client: *mut FfiBexioClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Credential setters
// ---------------------------------------------------------------------------

/// Apply `set` to the client when `client` is non-null and `value` is a
/// non-null UTF-8 string. Returns false otherwise.
fn update_client(
    client: *mut FfiBexioClient,
    value: *const c_char,
    set: fn(&mut BexioClient, String),
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return false;
        }
        let Ok(Some(value)) = read_c_str(value) else {
            return false;
        };
        let client = unsafe { &mut *client };
        set(&mut client.inner, value);
        true
    }))
    .unwrap_or(false)
}

/// Returns false if `client` or `company_id` is null, or `company_id` is not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn bexio_client_set_company_id(
    client: *mut FfiBexioClient,
    company_id: *const c_char,
) -> bool {
    update_client(client, company_id, |c, v| c.set_company_id(v))
}

/// Returns false if `client` or `user_id` is null, or `user_id` is not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn bexio_client_set_user_id(
    client: *mut FfiBexioClient,
    user_id: *const c_char,
) -> bool {
    update_client(client, user_id, |c, v| c.set_user_id(v))
}

/// Returns false if `client` or `public_key` is null, or `public_key` is not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn bexio_client_set_public_key(
    client: *mut FfiBexioClient,
    public_key: *const c_char,
) -> bool {
    update_client(client, public_key, |c, v| c.set_public_key(v))
}

/// Set or clear the signature. Null and "" both clear it.
/// Returns false if `client` is null or `signature` is not valid UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn bexio_client_set_signature(
    client: *mut FfiBexioClient,
    signature: *const c_char,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return false;
        }
        let Ok(signature) = read_c_str(signature) else {
            return false;
        };
        let client = unsafe { &mut *client };
        client.inner.set_signature(signature.unwrap_or_default());
        true
    }))
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build a GET request for `suffix` (e.g. `"/account"`).
///
/// Returns null if `client` or `suffix` is null, or `suffix` is not UTF-8.
/// The caller must free the returned pointer with `bexio_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn bexio_build_get(
    client: *const FfiBexioClient,
    suffix: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let Ok(Some(suffix)) = read_c_str(suffix) else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_get(&suffix))
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Build a POST request for `suffix` carrying `body` verbatim.
///
/// Returns null if any argument is null or not valid UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn bexio_build_post(
    client: *const FfiBexioClient,
    suffix: *const c_char,
    body: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let (Ok(Some(suffix)), Ok(Some(body))) = (read_c_str(suffix), read_c_str(body)) else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_post(&suffix, body))
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse / call functions
// ---------------------------------------------------------------------------

/// Decode a response the host obtained by executing an `FfiHttpRequest`.
///
/// A body that is not valid UTF-8 is a `Decode` error carrying the status.
/// Never returns null. Free the result with `bexio_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn bexio_parse_response(
    client: *const FfiBexioClient,
    response: *const FfiHttpResponse,
) -> *mut FfiBexioResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiBexioResult::null_arg("client");
        }
        if response.is_null() {
            return FfiBexioResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let response = unsafe { &*response };
        let body = match read_c_str(response.body) {
            Ok(body) => body.unwrap_or_default(),
            Err(e) => {
                return FfiBexioResult::from_error(ApiError::Decode {
                    status: response.status,
                    reason: format!("body is not valid UTF-8: {e}"),
                })
            }
        };
        let core_response = HttpResponse::new(response.status, body);
        match client.inner.parse_response(core_response) {
            Ok(value) => FfiBexioResult::ok(value),
            Err(e) => FfiBexioResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiBexioResult::panic("panic in bexio_parse_response"))
}

/// Perform a GET over the library's own transport.
///
/// Blocks until the call completes. Never returns null.
#[unsafe(no_mangle)]
pub extern "C" fn bexio_get(
    client: *const FfiBexioClient,
    suffix: *const c_char,
) -> *mut FfiBexioResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiBexioResult::null_arg("client");
        }
        let suffix = match required_arg(suffix, "suffix") {
            Ok(suffix) => suffix,
            Err(result) => return result,
        };
        let client = unsafe { &*client };
        match client.inner.get(&suffix) {
            Ok(value) => FfiBexioResult::ok(value),
            Err(e) => FfiBexioResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiBexioResult::panic("panic in bexio_get"))
}

/// Perform a POST over the library's own transport. `body` is sent verbatim.
///
/// Blocks until the call completes. Never returns null.
#[unsafe(no_mangle)]
pub extern "C" fn bexio_post(
    client: *const FfiBexioClient,
    suffix: *const c_char,
    body: *const c_char,
) -> *mut FfiBexioResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiBexioResult::null_arg("client");
        }
        let suffix = match required_arg(suffix, "suffix") {
            Ok(suffix) => suffix,
            Err(result) => return result,
        };
        let body = match required_arg(body, "body") {
            Ok(body) => body,
            Err(result) => return result,
        };
        let client = unsafe { &*client };
        match client.inner.post(&suffix, body) {
            Ok(value) => FfiBexioResult::ok(value),
            Err(e) => FfiBexioResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiBexioResult::panic("panic in bexio_post"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by `bexio_build_*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bexio_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        free_c_string(req.body);
        if !req.headers.is_null() {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for header in headers.iter() {
                free_c_string(header.key);
                free_c_string(header.value);
            }
        }
    }));
}

/// Free a result returned by `bexio_parse_response`, `bexio_get` or
/// `bexio_post`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bexio_free_result(result: *mut FfiBexioResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.api_error_code);
        free_c_string(result.api_message);
        free_c_string(result.json);
    }));
}

/// Free a single string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bexio_free_string(s: *mut c_char) {
    free_c_string(s);
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}
