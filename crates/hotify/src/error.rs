//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text
//! and a stable process exit code.

use miette::Diagnostic;
use thiserror::Error;

use hotify_config::ConfigError;
use hotify_core::{ApiError, CoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to hotify server")]
    #[diagnostic(
        code(hotify::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Override the address with --address or HOTIFY_ADDRESS."
        )
    )]
    ConnectionFailed {
        #[source]
        source: ApiError,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(hotify::tls_error),
        help("Use --insecure (-k) to accept self-signed certificates, or set ca_cert in the config file.")
    )]
    TlsError { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(hotify::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("The server rejected the request signature")]
    #[diagnostic(
        code(hotify::auth_failed),
        help("The API secret does not match the server's. Run: hotify config set-secret")
    )]
    AuthFailed,

    #[error("No API secret configured")]
    #[diagnostic(
        code(hotify::no_credentials),
        help(
            "Configure one with: hotify config init\n\
             Or pass --secret / set HOTIFY_SECRET.\n\
             Config file: {path}"
        )
    )]
    NoCredentials { path: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Service '{name}' not found")]
    #[diagnostic(
        code(hotify::not_found),
        help("Run: hotify list to see available services")
    )]
    NotFound { name: String },

    #[error("Service '{name}' conflicts with existing state: {message}")]
    #[diagnostic(code(hotify::conflict))]
    Conflict { name: String, message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Server returned {status}: {body}")]
    #[diagnostic(code(hotify::api_error))]
    Api { status: u16, body: String },

    #[error("Unexpected response from server: {message}")]
    #[diagnostic(
        code(hotify::decode),
        help("The server and CLI versions may not match.")
    )]
    Decode { message: String },

    #[error("{mutation} succeeded, but refreshing the service list failed")]
    #[diagnostic(
        code(hotify::resync_failed),
        help("The change was applied. Run: hotify list")
    )]
    ResyncFailed {
        mutation: String,
        #[source]
        source: Box<ApiError>,
    },

    #[error("{0}")]
    #[diagnostic(code(hotify::internal))]
    Internal(String),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hotify::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(hotify::config),
        help("Check the config file, or recreate it with: hotify config init")
    )]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(hotify::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(hotify::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Convert a core error raised while operating on service `name`.
    pub fn for_service(err: CoreError, name: &str) -> Self {
        match err {
            CoreError::Api(api) => from_api(api, Some(name)),
            CoreError::Config { message } => config_message(message),
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(api) => from_api(api, None),
            CoreError::Config { message } => config_message(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials => CliError::NoCredentials {
                path: hotify_config::config_path().display().to_string(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}

fn config_message(message: String) -> CliError {
    CliError::Validation {
        field: "address".into(),
        reason: message,
    }
}

fn from_api(err: ApiError, name: Option<&str>) -> CliError {
    match err {
        ApiError::Transport(ref e) if e.is_timeout() => CliError::Timeout,
        ApiError::Transport(_) => CliError::ConnectionFailed { source: err },
        ApiError::Tls(message) => CliError::TlsError { message },

        ApiError::UnexpectedStatus { status, body } => match (status, name) {
            (401 | 403, _) => CliError::AuthFailed,
            (404, Some(name)) => CliError::NotFound { name: name.into() },
            (409, Some(name)) => CliError::Conflict {
                name: name.into(),
                message: body,
            },
            _ => CliError::Api { status, body },
        },

        ApiError::Decode { message, .. } => CliError::Decode { message },

        ApiError::Observer { mutation, source } => CliError::ResyncFailed { mutation, source },

        other => CliError::Internal(other.to_string()),
    }
}
