use thiserror::Error;

/// Top-level error type for the `hotify-api` crate.
///
/// The three response-level kinds callers branch on are
/// [`Transport`](Self::Transport) (no response at all),
/// [`UnexpectedStatus`](Self::UnexpectedStatus) (non-2xx) and
/// [`Decode`](Self::Decode) (2xx body of the wrong shape). The remaining
/// variants are local preconditions that fail before a request is sent.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The request never completed (connection refused, DNS, timeout, ...).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built (bad CA file, TLS backend).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Server responses ────────────────────────────────────────────
    /// The server answered outside the 2xx range. `body` is the raw
    /// response text, kept verbatim for display.
    #[error("Unexpected status code: {status}, body: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// A 2xx body did not parse as the expected shape.
    #[error("Deserialization error: {message}")]
    Decode { message: String, body: String },

    // ── Request preparation ─────────────────────────────────────────
    /// The request payload could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The signing key could not be initialised.
    #[error("Failed to sign request: {0}")]
    Signing(String),

    // ── Post-mutation ───────────────────────────────────────────────
    /// The server accepted the mutation, but the observer injected into the
    /// client failed afterwards.
    #[error("{mutation} succeeded but the post-mutation observer failed: {source}")]
    Observer {
        mutation: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// HTTP status carried by this error, if the server responded.
    ///
    /// Looks through [`Observer`](Self::Observer) so a failed resync still
    /// reports the status of the request that failed.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Observer { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Raw response body attached to the error, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::UnexpectedStatus { body, .. } | Self::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns `true` if the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The client itself never retries; this is a hint for callers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::UnexpectedStatus { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// Returns `true` if the mutation was applied server-side even though
    /// the call reported an error.
    pub fn mutation_applied(&self) -> bool {
        matches!(self, Self::Observer { .. })
    }
}
