//! Response decoding and service error detection.
//!
//! # Design
//! The service signals failure in the body, not the status line: any JSON
//! object carrying an `error_code` field is a failure regardless of HTTP
//! status. The check runs against a parsed `serde_json::Value` and yields a
//! tagged `ApiResponse`, so callers never inspect an untyped object themselves.
//! Successful payloads stay opaque since their shape varies per endpoint.

use serde_json::Value;

use crate::error::{ApiError, ApiFailure};
use crate::http::HttpResponse;

const ERROR_CODE_FIELD: &str = "error_code";
const MESSAGE_FIELD: &str = "message";

/// A successfully decoded body, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Payload(Value),
    Failure(ApiFailure),
}

impl ApiResponse {
    /// Classify an already-parsed body.
    pub fn classify(value: Value) -> Self {
        let failure = value.as_object().and_then(|obj| {
            obj.get(ERROR_CODE_FIELD).map(|code| ApiFailure {
                error_code: code.clone(),
                message: obj
                    .get(MESSAGE_FIELD)
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        });
        match failure {
            Some(failure) => ApiResponse::Failure(failure),
            None => ApiResponse::Payload(value),
        }
    }

    pub fn into_result(self) -> Result<Value, ApiError> {
        match self {
            ApiResponse::Payload(value) => Ok(value),
            ApiResponse::Failure(failure) => Err(ApiError::Api(failure)),
        }
    }
}

/// Parse a raw response body into an `ApiResponse`.
pub fn decode(response: &HttpResponse) -> Result<ApiResponse, ApiError> {
    if response.body.trim().is_empty() {
        return Err(ApiError::EmptyBody {
            status: response.status,
        });
    }
    let value: Value = serde_json::from_str(&response.body).map_err(|e| ApiError::Decode {
        status: response.status,
        reason: e.to_string(),
    })?;
    Ok(ApiResponse::classify(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_object_is_payload() {
        let resp = HttpResponse::new(200, r#"{"id":1,"name":"Cash"}"#);
        assert_eq!(
            decode(&resp).unwrap(),
            ApiResponse::Payload(json!({"id": 1, "name": "Cash"}))
        );
    }

    #[test]
    fn arrays_and_scalars_are_payloads() {
        let resp = HttpResponse::new(200, r#"[{"error_code":1}]"#);
        assert!(matches!(decode(&resp).unwrap(), ApiResponse::Payload(_)));

        let resp = HttpResponse::new(200, "true");
        assert_eq!(decode(&resp).unwrap(), ApiResponse::Payload(json!(true)));
    }

    #[test]
    fn error_code_object_is_failure() {
        let resp = HttpResponse::new(200, r#"{"error_code":1234,"message":"bad key"}"#);
        let ApiResponse::Failure(failure) = decode(&resp).unwrap() else {
            panic!("expected failure");
        };
        assert_eq!(failure.error_code, json!(1234));
        assert_eq!(failure.message.as_deref(), Some("bad key"));
    }

    #[test]
    fn null_error_code_still_counts() {
        let resp = HttpResponse::new(200, r#"{"error_code":null}"#);
        let ApiResponse::Failure(failure) = decode(&resp).unwrap() else {
            panic!("expected failure");
        };
        assert_eq!(failure.error_code, Value::Null);
        assert_eq!(failure.message, None);
    }

    #[test]
    fn non_string_message_is_dropped() {
        let value = json!({"error_code": "E1", "message": {"de": "Fehler"}});
        let ApiResponse::Failure(failure) = ApiResponse::classify(value) else {
            panic!("expected failure");
        };
        assert_eq!(failure.message, None);
    }

    #[test]
    fn empty_body_is_distinct_error() {
        let err = decode(&HttpResponse::new(204, "")).unwrap_err();
        assert!(matches!(err, ApiError::EmptyBody { status: 204 }));

        let err = decode(&HttpResponse::new(200, "  \n")).unwrap_err();
        assert!(matches!(err, ApiError::EmptyBody { status: 200 }));
    }

    #[test]
    fn non_json_is_decode_error() {
        let err = decode(&HttpResponse::new(503, "<html>maintenance</html>")).unwrap_err();
        assert!(matches!(err, ApiError::Decode { status: 503, .. }));
    }

    #[test]
    fn into_result_maps_failure_to_api_error() {
        let failure = ApiResponse::classify(json!({"error_code": 1}));
        assert!(matches!(failure.into_result(), Err(ApiError::Api(_))));

        let payload = ApiResponse::classify(json!({"id": 1}));
        assert_eq!(payload.into_result().unwrap(), json!({"id": 1}));
    }
}
