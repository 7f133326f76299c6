//! Configuration for the hotify CLI.
//!
//! A single TOML file, layered with `HOTIFY_*` environment variables, plus
//! secret resolution (env var, system keyring, plaintext) and translation
//! to `hotify_core::ClientConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hotify_core::{ClientConfig, DEFAULT_ADDRESS, TlsVerification};

/// Keyring service name for the stored API secret.
pub const KEYRING_SERVICE: &str = "hotify";
/// Keyring user name for the stored API secret.
pub const KEYRING_USER: &str = "api-secret";

const ENV_PREFIX: &str = "HOTIFY_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API secret configured")]
    NoCredentials,

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Contents of `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Management API address (e.g. "http://localhost:1234").
    #[serde(default = "default_address")]
    pub address: String,

    /// API secret (plaintext, prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Environment variable name containing the API secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_env: Option<String>,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate (PEM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: default_address(),
            secret: None,
            secret_env: None,
            insecure: false,
            ca_cert: None,
            timeout: default_timeout(),
        }
    }
}

fn default_address() -> String {
    DEFAULT_ADDRESS.into()
}
fn default_timeout() -> u64 {
    30
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "hotify").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("hotify");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load from the canonical path, layered with `HOTIFY_*` env vars.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path`, layered with `HOTIFY_*` env vars.
///
/// A missing file is not an error; defaults apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).only(&[
            "address",
            "secret",
            "secret_env",
            "insecure",
            "ca_cert",
            "timeout",
        ]));

    Ok(figment.extract()?)
}

// ── Saving ──────────────────────────────────────────────────────────

/// Write config to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Secret resolution ───────────────────────────────────────────────

/// Where a resolved secret came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    Env,
    Keyring,
    Plaintext,
}

impl SecretSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Env => "environment",
            Self::Keyring => "keyring",
            Self::Plaintext => "config file (plaintext)",
        }
    }
}

/// Resolve the API secret: `secret_env` variable, then keyring, then
/// plaintext `secret`.
pub fn resolve_secret(cfg: &Config) -> Result<SecretString, ConfigError> {
    resolve_secret_with(cfg, |name| std::env::var(name).ok(), keyring_secret).map(|(s, _)| s)
}

/// Which link of the resolution chain would supply the secret, if any.
pub fn secret_source(cfg: &Config) -> Option<SecretSource> {
    resolve_secret_with(cfg, |name| std::env::var(name).ok(), keyring_secret)
        .ok()
        .map(|(_, source)| source)
}

fn resolve_secret_with(
    cfg: &Config,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl FnOnce() -> Option<String>,
) -> Result<(SecretString, SecretSource), ConfigError> {
    if let Some(val) = cfg.secret_env.as_deref().and_then(&env) {
        return Ok((SecretString::from(val), SecretSource::Env));
    }

    if let Some(val) = keyring() {
        return Ok((SecretString::from(val), SecretSource::Keyring));
    }

    if let Some(ref secret) = cfg.secret {
        return Ok((SecretString::from(secret.clone()), SecretSource::Plaintext));
    }

    Err(ConfigError::NoCredentials)
}

fn keyring_secret() -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)
        .and_then(|entry| entry.get_password())
        .ok()
}

/// Store the API secret in the system keyring.
pub fn store_secret(secret: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?.set_password(secret)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ClientConfig` from the file config, resolving the secret.
pub fn to_client_config(cfg: &Config) -> Result<ClientConfig, ConfigError> {
    let secret = resolve_secret(cfg)?;
    client_config_with_secret(cfg, secret)
}

/// Build a `ClientConfig` from the file config with an explicit secret.
pub fn client_config_with_secret(
    cfg: &Config,
    secret: SecretString,
) -> Result<ClientConfig, ConfigError> {
    let url: url::Url = cfg.address.parse().map_err(|_| ConfigError::Validation {
        field: "address".into(),
        reason: format!("invalid URL: {}", cfg.address),
    })?;

    let tls = if cfg.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = cfg.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ClientConfig {
        url,
        secret,
        tls,
        timeout: Duration::from_secs(cfg.timeout),
    })
}
