//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base URL of the public-key API. Credentials and suffix are appended verbatim.
pub const API_URL: &str = "https://office.bexio.com/api2.php/";

/// Timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Transport-level settings for a `BexioClient`.
///
/// Missing fields fall back to their defaults when deserialized, so a host
/// can load a partial table from its own config store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Global per-call timeout. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_URL.to_string(),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }
}
