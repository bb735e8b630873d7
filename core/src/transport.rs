//! Executes `HttpRequest` values against the network.
//!
//! `Transport` is the seam between request building and response decoding.
//! `UreqTransport` is the blocking default; tests and hosts with their own
//! HTTP stack supply another implementation.

use std::time::Duration;

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs exactly one HTTP round-trip per call.
///
/// Implementations return non-2xx responses as data; only failures that
/// prevent a response from being obtained are errors.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent, timeout }
    }

    /// Global per-call timeout the agent was built with.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Same timeout as `ClientConfig::default()`.
impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)))
    }
}

/// A body that is not UTF-8 cannot be JSON; report it as a decode failure.
fn utf8_body(status: u16, bytes: Vec<u8>) -> Result<String, ApiError> {
    String::from_utf8(bytes).map_err(|e| ApiError::Decode {
        status,
        reason: format!("body is not valid UTF-8: {e}"),
    })
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let body = utf8_body(status, bytes)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
