// ── Core error types ──
//
// API failures pass through unchanged so callers can branch on the same
// kinds the client reports (transport, unexpected status, decode). Core
// only adds errors for configuration it validates itself.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A client call failed; the store's state was left untouched.
    #[error(transparent)]
    Api(#[from] hotify_api::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The underlying API error, if this came from a client call.
    pub fn api(&self) -> Option<&hotify_api::Error> {
        match self {
            Self::Api(e) => Some(e),
            Self::Config { .. } => None,
        }
    }

    /// HTTP status returned by the server, if any.
    pub fn status(&self) -> Option<u16> {
        self.api().and_then(hotify_api::Error::status)
    }

    pub fn is_not_found(&self) -> bool {
        self.api().is_some_and(hotify_api::Error::is_not_found)
    }

    /// `true` when the server applied a mutation but the follow-up resync failed.
    pub fn mutation_applied(&self) -> bool {
        self.api().is_some_and(hotify_api::Error::mutation_applied)
    }
}
