//! Synchronized service state between `hotify-api` and UI consumers.
//!
//! - **[`SyncedStore`]** — holds the authoritative local snapshot of the
//!   server's services. [`refresh()`](SyncedStore::refresh) replaces it
//!   wholesale; every mutating operation delegates to the signed client,
//!   whose injected observer resynchronizes the full list once the server
//!   accepts the change.
//!
//! - **[`ServiceStream`]** — subscription handle vended by the store.
//!   Exposes `current()` / `latest()` / `changed()` for reactive consumers.
//!
//! - **[`ClientConfig`]** — how to reach a server: address, shared secret,
//!   TLS and timeout. Built by the CLI; core never reads config files.

pub mod config;
pub mod error;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, DEFAULT_ADDRESS, TlsVerification};
pub use error::CoreError;
pub use store::SyncedStore;
pub use stream::{ServiceStream, ServiceWatchStream};

// Wire types are the domain types; re-export them for consumers.
pub use hotify_api::{
    Config, Error as ApiError, Mutation, MutationKind, ProxyConfig, Service, ServiceConfig,
    ServiceStatus,
};
