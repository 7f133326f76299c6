// Signed HTTP client for the hotify management API.
//
// Every request is signed over its exact body string (the empty string for
// bodyless requests) and carries `Content-Type: application/json`. Non-2xx
// responses are turned into `Error::UnexpectedStatus` with the raw body;
// nothing is retried.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use crate::error::Error;
use crate::models::{Config, Service, ServiceConfig};
use crate::observer::{Mutation, MutationKind, MutationObserver};
use crate::session::ClientSession;
use crate::signing::{SIGNATURE_HEADER, sign};
use crate::transport::TransportConfig;

/// HTTP client for the hotify management API.
///
/// Holds no mutable request state, so one instance can be shared (behind an
/// `Arc`) and used from concurrent tasks. The session and observer are
/// fixed at construction.
pub struct SignedApiClient {
    http: reqwest::Client,
    session: ClientSession,
    observer: Option<Arc<dyn MutationObserver>>,
}

impl SignedApiClient {
    /// Create a client from a session and a `TransportConfig`.
    pub fn new(session: ClientSession, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, session))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, session: ClientSession) -> Self {
        Self {
            http,
            session,
            observer: None,
        }
    }

    /// Install the post-mutation observer.
    ///
    /// Consumes the client: the observer is part of construction and cannot
    /// be replaced on a shared instance.
    pub fn with_observer(mut self, observer: Arc<dyn MutationObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The authentication context this client signs with.
    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// `GET api/config` — the server-wide configuration.
    pub async fn get_config(&self) -> Result<Config, Error> {
        self.get_json("api/config").await
    }

    /// `GET api/services` — every managed service, in server order.
    ///
    /// A server with no services answers `null`, which decodes to an empty
    /// list.
    pub async fn services(&self) -> Result<Vec<Service>, Error> {
        let services: Option<Vec<Service>> = self.get_json("api/services").await?;
        Ok(services.unwrap_or_default())
    }

    /// `GET api/services/{name}`.
    pub async fn service(&self, name: &str) -> Result<Service, Error> {
        self.get_json(&format!("api/services/{name}")).await
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// `GET api/services/{name}/start`.
    pub async fn start_service(&self, name: &str) -> Result<(), Error> {
        self.lifecycle(MutationKind::Start, name).await
    }

    /// `GET api/services/{name}/stop`.
    pub async fn stop_service(&self, name: &str) -> Result<(), Error> {
        self.lifecycle(MutationKind::Stop, name).await
    }

    /// `GET api/services/{name}/update` — pull, rebuild and restart.
    pub async fn update_service(&self, name: &str) -> Result<(), Error> {
        self.lifecycle(MutationKind::Update, name).await
    }

    /// `GET api/services/{name}/restart`.
    pub async fn restart_service(&self, name: &str) -> Result<(), Error> {
        self.lifecycle(MutationKind::Restart, name).await
    }

    /// `POST api/services` with the service config as the JSON body.
    pub async fn create_service(&self, config: &ServiceConfig) -> Result<(), Error> {
        let body = encode(config)?;
        self.send(Method::POST, "api/services", Some(body)).await?;
        self.notify(Mutation::new(MutationKind::Create, &config.name))
            .await
    }

    /// `DELETE api/services/{name}`.
    pub async fn delete_service(&self, name: &str) -> Result<(), Error> {
        self.send(Method::DELETE, &format!("api/services/{name}"), None)
            .await?;
        self.notify(Mutation::new(MutationKind::Delete, name)).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Start/stop/update/restart share the `api/services/{name}/{kind}` shape.
    async fn lifecycle(&self, kind: MutationKind, name: &str) -> Result<(), Error> {
        self.send(Method::GET, &format!("api/services/{name}/{kind}"), None)
            .await?;
        self.notify(Mutation::new(kind, name)).await
    }

    /// Send a bodyless GET and decode the JSON response.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let resp = self.send(Method::GET, path, None).await?;
        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Decode {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Sign and send one request, failing on any non-2xx status.
    ///
    /// The signature is computed over `body`, or over `""` when there is no
    /// body; in that case no body is attached to the request at all.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<reqwest::Response, Error> {
        let url = self.session.endpoint(path)?;
        let signature = sign(self.session.secret(), body.as_deref().unwrap_or(""))?;

        debug!("{method} {url}");

        let mut builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let resp = builder.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        trace!(%status, "response received");

        if !status.is_success() {
            let body = resp.text().await.map_err(Error::Transport)?;
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp)
    }

    /// Run the observer, if any, for a mutation the server accepted.
    async fn notify(&self, mutation: Mutation) -> Result<(), Error> {
        let Some(observer) = &self.observer else {
            return Ok(());
        };

        observer
            .mutation_applied(self, &mutation)
            .await
            .map_err(|source| {
                warn!(%mutation, error = %source, "post-mutation observer failed");
                Error::Observer {
                    mutation: mutation.to_string(),
                    source: Box::new(source),
                }
            })
    }
}

/// Serialize a request payload to the exact string that is signed and sent.
fn encode(payload: &impl Serialize) -> Result<String, Error> {
    serde_json::to_string(payload).map_err(Error::Encode)
}
