// ── Core error types ──
//
// User-facing errors from valetudo-core. Consumers never see reqwest errors
// or raw JSON failures directly; the `From<valetudo_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.
//
// `CoreError` is `Clone` because a single failed status fetch is delivered
// to every waiter that joined it.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Transport errors ─────────────────────────────────────────────
    #[error("Cannot connect to vacuum at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Vacuum did not answer within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Unexpected response from vacuum: {message}")]
    Parse { message: String },

    #[error("Not found: {entity_type} '{identifier}'")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Cannot {operation} while the vacuum is {state}")]
    Precondition { operation: String, state: String },

    #[error("Operation not supported: {operation} (requires {required})")]
    Unsupported { operation: String, required: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// True for failures that may clear up by the next background refresh.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout { .. } => true,
            Self::Api { status, .. } => status.is_some_and(|s| s >= 500),
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<valetudo_api::Error> for CoreError {
    fn from(err: valetudo_api::Error) -> Self {
        if err.is_timeout() {
            return CoreError::Timeout { timeout_secs: 0 };
        }
        let connect = err.is_connect();
        match err {
            valetudo_api::Error::Transport(e) if connect => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "<unknown>".into()),
                reason: e.to_string(),
            },
            valetudo_api::Error::Transport(e) => CoreError::Api {
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
            },
            valetudo_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            valetudo_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            valetudo_api::Error::Http { status, body } => CoreError::Api {
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {body}")
                },
                status: Some(status),
            },
            valetudo_api::Error::Deserialization { message, body: _ } => {
                CoreError::Parse { message }
            }
        }
    }
}
