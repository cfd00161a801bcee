// Shared transport configuration and the request seam used by the core.
//
// `TransportConfig` centralizes the reqwest builder settings (timeout, TLS
// leniency, user agent). `Transport` is the one operation the status engine
// needs from the network, kept object-safe so the engine can run against a
// test double.

use std::time::Duration;

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::endpoints::Endpoint;
use crate::error::Error;

const USER_AGENT: &str = concat!("valetudo-rs/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound for a whole request/response exchange.
    pub timeout: Duration,
    /// Accept self-signed certificates when the device sits behind an
    /// HTTPS reverse proxy.
    pub accept_invalid_certs: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            accept_invalid_certs: false,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT);

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// A single request/response exchange against the device.
///
/// Implementations must not retry: one call is one request on the wire.
pub trait Transport: Send + Sync {
    /// Send `body` (if any) as JSON to `endpoint` and return the parsed
    /// response body.
    fn request(
        &self,
        endpoint: Endpoint,
        body: Option<Value>,
    ) -> BoxFuture<'_, Result<Value, Error>>;
}
