// Wire types for the hotify management API.
//
// Field names follow the server's JSON exactly (camelCase). These types are
// shared by the client, the store, and the CLI; there is no separate domain
// layer because the API shape is already the domain shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// Reverse-proxy rule for a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Request matcher (e.g. a path or host).
    #[serde(rename = "match")]
    pub match_rule: String,
    /// Upstream address requests are forwarded to.
    pub upstream: String,
}

/// Description of a managed service. `name` is the identity key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub name: String,
    /// Git repository the service is cloned from.
    pub repo: String,
    /// Command that runs the service, relative to the checkout.
    pub exec: String,
    /// Command that builds the service, relative to the checkout.
    pub build: String,
    /// Restart the process when it exits.
    pub restart: bool,
    /// Restart attempts before giving up.
    pub max_restarts: u32,
    /// Webhook secret used for the service's own inbound triggers.
    pub secret: String,
    pub proxy: ProxyConfig,
}

/// Runtime status of a service.
///
/// Encoded on the wire as an integer: `0` = running, `1` = stopped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(try_from = "u8", into = "u8")]
#[strum(serialize_all = "lowercase")]
pub enum ServiceStatus {
    Running,
    Stopped,
}

impl TryFrom<u8> for ServiceStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Running),
            1 => Ok(Self::Stopped),
            other => Err(format!("unknown service status code {other}")),
        }
    }
}

impl From<ServiceStatus> for u8 {
    fn from(status: ServiceStatus) -> Self {
        match status {
            ServiceStatus::Running => 0,
            ServiceStatus::Stopped => 1,
        }
    }
}

/// A service as tracked by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub config: ServiceConfig,
    /// Checkout directory on the server.
    pub path: String,
    pub status: ServiceStatus,
    /// Restarts since the service was last (re)started by an operator.
    pub restarts: u32,
    /// Recent output lines, oldest first. Bounded by the server.
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<String>,
}

impl Service {
    /// The service's identity key.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn is_running(&self) -> bool {
        self.status == ServiceStatus::Running
    }
}

/// Server-wide configuration snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Path the server loaded its config file from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_path: Option<String>,
    /// Managed services keyed by name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: BTreeMap<String, ServiceConfig>,
    /// Listen address of the management API.
    pub address: String,
    /// Directory services are cloned and built in.
    pub services_path: String,
    /// Shared API secret.
    pub secret: String,
}

/// The server encodes empty lists and maps as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
