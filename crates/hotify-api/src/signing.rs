// HMAC-SHA256 request signing.
//
// The server recomputes the MAC over the exact body bytes it receives, so
// the string passed here must be the string that goes on the wire.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::error::Error;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "X-Signature-256";

/// Prefix of the signature header value.
pub const SIGNATURE_PREFIX: &str = "sha256=";

type HmacSha256 = Hmac<Sha256>;

/// Lowercase hex HMAC-SHA256 of `payload` keyed by `key`.
pub fn hmac_hex(key: &[u8], payload: &[u8]) -> Result<String, Error> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| Error::Signing(e.to_string()))?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Full `X-Signature-256` header value for a serialized body.
///
/// Bodyless requests must be signed over the empty string.
pub fn sign(secret: &SecretString, payload: &str) -> Result<String, Error> {
    let digest = hmac_hex(secret.expose_secret().as_bytes(), payload.as_bytes())?;
    Ok(format!("{SIGNATURE_PREFIX}{digest}"))
}
