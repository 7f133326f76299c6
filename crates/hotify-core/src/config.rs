// ── Runtime connection configuration ──
//
// Describes *how* to reach a hotify server. Carries the shared secret and
// transport tuning, but never touches disk. The CLI builds a `ClientConfig`
// from its config file and flags and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use hotify_api::{ClientSession, TlsMode, TransportConfig};

use crate::error::CoreError;

/// Development server address used when nothing else is configured.
pub const DEFAULT_ADDRESS: &str = "http://localhost:1234";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for talking to one hotify server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Management API origin (e.g. `https://deploy.example.com`).
    pub url: Url,
    /// Shared API secret used to sign every request.
    pub secret: SecretString,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(url: Url, secret: SecretString) -> Self {
        Self {
            url,
            secret,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Split into the API crate's session and transport settings.
    pub(crate) fn to_parts(&self) -> Result<(ClientSession, TransportConfig), CoreError> {
        match self.url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(CoreError::Config {
                    message: format!("unsupported URL scheme '{other}' (expected http or https)"),
                });
            }
        }

        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };

        Ok((
            ClientSession::new(self.url.clone(), self.secret.clone()),
            TransportConfig {
                tls,
                timeout: self.timeout,
            },
        ))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(
            Url::parse(DEFAULT_ADDRESS).expect("default address is a valid URL"),
            SecretString::from(String::new()),
        )
    }
}
