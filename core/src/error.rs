//! Error types for the bexio API client.
//!
//! # Design
//! The service reports failures in-band: a JSON body carrying an `error_code`
//! field. Those land in `Api`, which always displays the same user-facing
//! message but keeps the raw code and message for callers that want them.
//! Everything that prevents a JSON value from being obtained at all
//! (network, empty body, malformed body) gets its own variant so a host can
//! tell "bad credentials" apart from "the service is unreachable".

use serde_json::Value;
use thiserror::Error;

/// Message shown for every service-reported failure.
pub const API_FAILURE_MESSAGE: &str = "Invalid API access data or server maintenance. \
     Check the access data values in the plugin configuration.";

/// Errors returned by `BexioClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The decoded response contained an `error_code` field.
    #[error("{}", API_FAILURE_MESSAGE)]
    Api(ApiFailure),

    /// The HTTP round-trip itself failed (DNS, connect, TLS, timeout).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered without a body.
    #[error("empty response body (HTTP {status})")]
    EmptyBody { status: u16 },

    /// The body could not be parsed as JSON.
    #[error("malformed response body (HTTP {status}): {reason}")]
    Decode { status: u16, reason: String },

    /// `post_json` could not encode its payload.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// The error shape reported by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure {
    /// Raw value of the `error_code` field, whatever its JSON type.
    pub error_code: Value,
    /// The service's own `message` field, if it sent one as a string.
    pub message: Option<String>,
}

impl ApiFailure {
    /// `error_code` rendered without JSON quoting, e.g. `1234` or `"E_AUTH"` → `E_AUTH`.
    pub fn code_string(&self) -> String {
        match &self.error_code {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_error_displays_fixed_message() {
        let err = ApiError::Api(ApiFailure {
            error_code: json!(1234),
            message: Some("bad key".to_string()),
        });
        assert_eq!(err.to_string(), API_FAILURE_MESSAGE);
    }

    #[test]
    fn code_string_unquotes_strings() {
        let failure = ApiFailure {
            error_code: json!("E_AUTH"),
            message: None,
        };
        assert_eq!(failure.code_string(), "E_AUTH");

        let failure = ApiFailure {
            error_code: json!(401),
            message: None,
        };
        assert_eq!(failure.code_string(), "401");
    }

    #[test]
    fn decode_error_mentions_status() {
        let err = ApiError::Decode {
            status: 503,
            reason: "expected value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed response body (HTTP 503): expected value"
        );
    }
}
