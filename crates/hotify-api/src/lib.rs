//! Async client for the hotify service-management API.
//!
//! Every request is authenticated with an HMAC-SHA256 signature over its
//! body, sent in the `X-Signature-256` header. [`SignedApiClient`] exposes
//! one method per API operation; state-changing calls notify an optional
//! [`MutationObserver`] injected at construction.
//!
//! ```no_run
//! # async fn run() -> Result<(), hotify_api::Error> {
//! use hotify_api::{ClientSession, SignedApiClient, TransportConfig};
//!
//! let session = ClientSession::new(
//!     "http://localhost:1234".parse()?,
//!     "secret".to_string().into(),
//! );
//! let client = SignedApiClient::new(session, &TransportConfig::default())?;
//! for service in client.services().await? {
//!     println!("{} {}", service.name(), service.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod observer;
pub mod session;
pub mod signing;
pub mod transport;

pub use client::SignedApiClient;
pub use error::Error;
pub use models::{Config, ProxyConfig, Service, ServiceConfig, ServiceStatus};
pub use observer::{Mutation, MutationKind, MutationObserver};
pub use session::ClientSession;
pub use transport::{TlsMode, TransportConfig};
