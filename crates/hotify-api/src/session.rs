use secrecy::SecretString;
use url::Url;

/// Authentication context for a [`SignedApiClient`](crate::SignedApiClient).
///
/// Lives only in process memory. Rotating the secret means building a new
/// client from a new session.
#[derive(Debug, Clone)]
pub struct ClientSession {
    address: Url,
    secret: SecretString,
}

impl ClientSession {
    pub fn new(address: Url, secret: SecretString) -> Self {
        Self { address, secret }
    }

    /// Base address of the management API (e.g. `http://localhost:1234`).
    pub fn address(&self) -> &Url {
        &self.address
    }

    pub(crate) fn secret(&self) -> &SecretString {
        &self.secret
    }

    /// Join an API path onto the base address with a single `/`.
    ///
    /// Path segments are not escaped; callers pass values that are already
    /// safe for a URL path.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.address.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{path}"))
    }
}
