// Valetudo HTTP client
//
// Wraps `reqwest::Client` with device URL construction and response
// parsing. One call to `request` is exactly one HTTP exchange: no retries,
// no caching. Those policies belong to the caller.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::endpoints::Endpoint;
use crate::error::Error;
use crate::transport::{Transport, TransportConfig};

/// Raw HTTP client for a single Valetudo device.
#[derive(Debug, Clone)]
pub struct ValetudoClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ValetudoClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the device root, e.g. `http://192.168.1.50` or
    /// `https://proxy.lan/vacuum` when the device sits behind a reverse proxy.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the full URL for an endpoint, keeping any path prefix on the
    /// base URL.
    pub(crate) fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}{}", endpoint.path());
        Ok(Url::parse(&full)?)
    }

    /// Perform one request/response exchange and parse the body as JSON.
    pub async fn send(&self, endpoint: Endpoint, body: Option<&Value>) -> Result<Value, Error> {
        let url = self.endpoint_url(endpoint)?;
        debug!("{} {}", endpoint.method(), url);

        let mut builder = self.http.request(endpoint.method(), url);
        if let Some(payload) = body {
            trace!(%payload, "sending payload");
            builder = builder.json(payload);
        } else {
            builder = builder.header(reqwest::header::CONTENT_TYPE, "application/json");
        }

        let resp = builder.send().await.map_err(Error::Transport)?;
        Self::parse_body(resp).await
    }

    /// Check the status line, then parse the body as JSON. An empty body is
    /// a parse failure like any other.
    async fn parse_body(resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(%body, "raw response");

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}

impl Transport for ValetudoClient {
    fn request(
        &self,
        endpoint: Endpoint,
        body: Option<Value>,
    ) -> BoxFuture<'_, Result<Value, Error>> {
        async move { self.send(endpoint, body.as_ref()).await }.boxed()
    }
}
