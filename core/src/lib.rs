//! Synchronous client for the bexio public-key REST API.
//!
//! # Overview
//! Builds authenticated request URLs and headers from a company id, user id,
//! public key and optional signature, issues GET/POST calls, and maps the
//! service's in-band `error_code` responses to a typed `ApiError`.
//!
//! # Design
//! - `BexioClient` owns `Credentials` plus a `Transport`; no global state.
//! - Each call splits into `build_*` (produces `HttpRequest`) and
//!   `parse_response` (consumes `HttpResponse`), so the I/O boundary is
//!   explicit and a host may do the I/O itself.
//! - Success payloads are opaque `serde_json::Value`s; their shape varies
//!   per endpoint.

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod request;
pub mod response;
pub mod transport;

pub use client::BexioClient;
pub use config::{ClientConfig, API_URL};
pub use credentials::Credentials;
pub use error::{ApiError, ApiFailure, API_FAILURE_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use response::ApiResponse;
pub use transport::{Transport, UreqTransport};
