//! Request assembly from credentials and a path suffix.
//!
//! Pure string work: no URL encoding, no trimming. Callers pass suffixes
//! that are already valid path segments (e.g. `"/account/1"`).

use crate::credentials::Credentials;
use crate::http::{HttpMethod, HttpRequest};

pub const HEADER_ACCEPT: &str = "Accept";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_SIGNATURE: &str = "Signature";
const APPLICATION_JSON: &str = "application/json";

/// `<base_url><company_id>/<user_id>/<public_key><suffix>`
pub fn build_url(base_url: &str, credentials: &Credentials, suffix: &str) -> String {
    format!(
        "{base_url}{}/{}/{}{suffix}",
        credentials.company_id(),
        credentials.user_id(),
        credentials.public_key()
    )
}

/// Header set sent with every call. `Signature` only when one is stored.
pub fn build_headers(credentials: &Credentials) -> Vec<(String, String)> {
    let mut headers = vec![
        (HEADER_ACCEPT.to_string(), APPLICATION_JSON.to_string()),
        (HEADER_CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()),
    ];
    if let Some(signature) = credentials.signature() {
        headers.push((HEADER_SIGNATURE.to_string(), signature.to_string()));
    }
    headers
}

pub fn build_request(
    base_url: &str,
    credentials: &Credentials,
    method: HttpMethod,
    suffix: &str,
    body: Option<String>,
) -> HttpRequest {
    HttpRequest {
        method,
        url: build_url(base_url, credentials, suffix),
        headers: build_headers(credentials),
        body,
    }
}
