//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use valetudo_config::ConfigError;
use valetudo_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const PRECONDITION: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the vacuum at {url}")]
    #[diagnostic(
        code(valetudo::connection_failed),
        help(
            "Check that the vacuum is powered on and reachable.\n\
             URL: {url}\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(valetudo::timeout),
        help("Increase the timeout with --timeout or check the vacuum's Wi-Fi signal.")
    )]
    Timeout { seconds: u64 },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Cannot {operation} while the vacuum is {state}")]
    #[diagnostic(
        code(valetudo::precondition),
        help("Run: valetudo status to see what the vacuum is doing")
    )]
    Precondition { operation: String, state: String },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(valetudo::not_found),
        help("Run: valetudo {list_command} to see what is configured")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("'{operation}' is not available for this vacuum")]
    #[diagnostic(
        code(valetudo::unsupported),
        help("This command requires {required} in the active profile.")
    )]
    Unsupported { operation: String, required: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(valetudo::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(valetudo::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(valetudo::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: valetudo --profile {name} config init <HOST>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No vacuum configured")]
    #[diagnostic(
        code(valetudo::no_config),
        help(
            "Create a profile with: valetudo config init <HOST>\n\
             Or pass --address / set VALETUDO_ADDRESS.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("No address configured for profile '{profile}'")]
    #[diagnostic(
        code(valetudo::missing_address),
        help("Add `address = \"<host>\"` to the profile, or pass --address.")
    )]
    MissingAddress { profile: String },

    #[error("Profile '{name}' already exists")]
    #[diagnostic(
        code(valetudo::profile_exists),
        help("Use --force to overwrite it.")
    )]
    ProfileExists { name: String },

    #[error(transparent)]
    #[diagnostic(code(valetudo::config))]
    Config(Box<figment::Error>),

    #[error("Failed to write configuration: {0}")]
    #[diagnostic(code(valetudo::config_write))]
    ConfigWrite(#[from] toml::ser::Error),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(valetudo::render))]
    Render(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Precondition { .. } => exit_code::PRECONDITION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },

            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Precondition { operation, state } => Self::Precondition { operation, state },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                list_command: format!("{entity_type} list"),
                resource_type: entity_type,
                identifier,
            },

            CoreError::Unsupported {
                operation,
                required,
            } => Self::Unsupported {
                operation,
                required,
            },

            CoreError::Api { message, status } => Self::ApiError {
                code: status.map_or_else(|| "unknown".into(), |s| s.to_string()),
                message,
            },

            CoreError::Parse { message } => Self::ApiError {
                code: "invalid_response".into(),
                message,
            },

            CoreError::Config { message } => Self::Validation {
                field: "address".into(),
                reason: message,
            },

            CoreError::Internal(message) => Self::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingAddress { profile } => Self::MissingAddress { profile },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Serialization(e) => Self::ConfigWrite(e),
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Io(e) => Self::Io(e),
        }
    }
}
