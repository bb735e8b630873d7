//! Authenticated client for the bexio public-key API.
//!
//! # Design
//! `BexioClient` owns its credentials and a `Transport`. Each call is split
//! into `build_*` (produces an `HttpRequest`) and `parse_response` (consumes
//! an `HttpResponse`); `get` and `post` run both halves around one
//! `Transport::execute`. Hosts that do their own I/O (the FFI crate) use
//! the halves directly.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::request::build_request;
use crate::response::decode;
use crate::transport::{Transport, UreqTransport};

/// Synchronous client for the public-key API.
///
/// Calls take `&self`; credentials can only change between calls.
#[derive(Debug, Clone)]
pub struct BexioClient<T = UreqTransport> {
    credentials: Credentials,
    base_url: String,
    transport: T,
}

impl BexioClient<UreqTransport> {
    /// Client against the production API with the default timeout.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_config(credentials, ClientConfig::default())
    }

    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout());
        Self::with_transport(credentials, config.base_url, transport)
    }
}

impl<T: Transport> BexioClient<T> {
    /// Client using a caller-supplied transport. Timeouts are configured on
    /// the transport itself.
    pub fn with_transport(credentials: Credentials, base_url: impl Into<String>, transport: T) -> Self {
        Self {
            credentials,
            base_url: base_url.into(),
            transport,
        }
    }

    /// GET `<base><company>/<user>/<key><suffix>` and return the decoded body.
    pub fn get(&self, suffix: &str) -> Result<Value, ApiError> {
        let request = self.build_get(suffix);
        self.send(suffix, request)
    }

    /// POST `body` verbatim. The caller supplies JSON text; it is not re-encoded.
    pub fn post(&self, suffix: &str, body: impl Into<String>) -> Result<Value, ApiError> {
        let request = self.build_post(suffix, body);
        self.send(suffix, request)
    }

    /// Serialize `body` with serde_json, then `post` it.
    pub fn post_json<B: Serialize + ?Sized>(&self, suffix: &str, body: &B) -> Result<Value, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.post(suffix, body)
    }

    fn send(&self, suffix: &str, request: HttpRequest) -> Result<Value, ApiError> {
        let method = request.method;
        let response = self.transport.execute(&request).inspect_err(|e| {
            warn!(%method, suffix, error = %e, "bexio request failed");
        })?;
        debug!(%method, suffix, status = response.status, "bexio response received");
        self.parse_response(response).inspect_err(|e| {
            warn!(%method, suffix, error = %e, "bexio response rejected");
        })
    }
}

impl<T> BexioClient<T> {
    pub fn build_get(&self, suffix: &str) -> HttpRequest {
        build_request(&self.base_url, &self.credentials, HttpMethod::Get, suffix, None)
    }

    pub fn build_post(&self, suffix: &str, body: impl Into<String>) -> HttpRequest {
        build_request(
            &self.base_url,
            &self.credentials,
            HttpMethod::Post,
            suffix,
            Some(body.into()),
        )
    }

    /// Decode a response and map an `error_code` body to `ApiError::Api`.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        decode(&response)?.into_result()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn company_id(&self) -> &str {
        self.credentials.company_id()
    }

    pub fn set_company_id(&mut self, company_id: impl Into<String>) {
        self.credentials.set_company_id(company_id);
    }

    pub fn user_id(&self) -> &str {
        self.credentials.user_id()
    }

    pub fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.credentials.set_user_id(user_id);
    }

    pub fn public_key(&self) -> &str {
        self.credentials.public_key()
    }

    pub fn set_public_key(&mut self, public_key: impl Into<String>) {
        self.credentials.set_public_key(public_key);
    }

    pub fn signature(&self) -> Option<&str> {
        self.credentials.signature()
    }

    /// An empty string removes the `Signature` header from later requests.
    pub fn set_signature(&mut self, signature: impl Into<String>) {
        self.credentials.set_signature(signature);
    }
}
