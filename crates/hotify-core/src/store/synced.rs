// ── Synchronized service store ──
//
// Owns the local copy of the service list and keeps it in step with the
// server. Mutations go through the client; the client's injected observer
// resynchronizes the full list after each one the server accepts.

use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use hotify_api::{
    Config, Error, Mutation, MutationObserver, Service, ServiceConfig, SignedApiClient,
};

use super::collection::ServiceCollection;
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::stream::ServiceStream;

/// Observer installed into every client the store builds.
///
/// Holds only the collection, not the store, so client and store never
/// reference each other.
struct Resync {
    collection: Arc<ServiceCollection>,
}

#[async_trait]
impl MutationObserver for Resync {
    async fn mutation_applied(
        &self,
        client: &SignedApiClient,
        mutation: &Mutation,
    ) -> Result<(), Error> {
        debug!(%mutation, "resynchronizing after mutation");
        self.collection.sync_from(client).await.map(|_| ())
    }
}

/// Authoritative local snapshot of the server's services.
///
/// Cheaply cloneable via `Arc<StoreInner>`. The collection only ever holds
/// a complete, name-sorted server response: it is empty until the first
/// successful sync and is replaced wholesale afterwards. A failed call never
/// touches it.
#[derive(Clone)]
pub struct SyncedStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    client: ArcSwap<SignedApiClient>,
    collection: Arc<ServiceCollection>,
}

impl SyncedStore {
    /// Build a client for `config` with resynchronization wired in.
    ///
    /// Does not contact the server; call [`refresh()`](Self::refresh) for
    /// the initial load.
    pub fn connect(config: &ClientConfig) -> Result<Self, CoreError> {
        let collection = Arc::new(ServiceCollection::new());
        let client = build_client(config, &collection)?;

        Ok(Self {
            inner: Arc::new(StoreInner {
                client: ArcSwap::from_pointee(client),
                collection,
            }),
        })
    }

    /// Swap in a fresh client built from `config`.
    ///
    /// This is the only way to change the address or rotate the secret.
    /// Calls already in flight finish on the old client; the collection is
    /// kept as is.
    pub fn reconfigure(&self, config: &ClientConfig) -> Result<(), CoreError> {
        let client = build_client(config, &self.inner.collection)?;
        self.inner.client.store(Arc::new(client));
        info!(address = %config.url, "client reconfigured");
        Ok(())
    }

    /// The client currently in use.
    pub fn client(&self) -> Arc<SignedApiClient> {
        self.inner.client.load_full()
    }

    // ── Synchronization ──────────────────────────────────────────

    /// Fetch the full service list and replace the collection with it.
    ///
    /// Safe to call concurrently: each call commits a complete response,
    /// and the last one to finish wins.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let client = self.client();
        let count = self.inner.collection.sync_from(&client).await?;
        info!(count, "services refreshed");
        Ok(())
    }

    // ── Mutations (resync happens inside the client call) ────────

    pub async fn start_service(&self, name: &str) -> Result<(), CoreError> {
        self.client().start_service(name).await?;
        Ok(())
    }

    pub async fn stop_service(&self, name: &str) -> Result<(), CoreError> {
        self.client().stop_service(name).await?;
        Ok(())
    }

    pub async fn update_service(&self, name: &str) -> Result<(), CoreError> {
        self.client().update_service(name).await?;
        Ok(())
    }

    pub async fn restart_service(&self, name: &str) -> Result<(), CoreError> {
        self.client().restart_service(name).await?;
        Ok(())
    }

    pub async fn create_service(&self, config: &ServiceConfig) -> Result<(), CoreError> {
        self.client().create_service(config).await?;
        Ok(())
    }

    pub async fn delete_service(&self, name: &str) -> Result<(), CoreError> {
        self.client().delete_service(name).await?;
        Ok(())
    }

    // ── Read-through queries (no cache mutation) ─────────────────

    /// Fetch the server-wide configuration.
    pub async fn fetch_config(&self) -> Result<Config, CoreError> {
        Ok(self.client().get_config().await?)
    }

    /// Fetch one service directly from the server, bypassing the snapshot.
    pub async fn fetch_service(&self, name: &str) -> Result<Service, CoreError> {
        Ok(self.client().service(name).await?)
    }

    // ── Snapshot accessors ───────────────────────────────────────

    /// The current service list, sorted by name.
    pub fn services_snapshot(&self) -> Arc<Vec<Arc<Service>>> {
        self.inner.collection.snapshot()
    }

    pub fn subscribe_services(&self) -> ServiceStream {
        ServiceStream::new(self.inner.collection.subscribe())
    }

    pub fn service_by_name(&self, name: &str) -> Option<Arc<Service>> {
        self.inner.collection.get(name)
    }

    pub fn service_count(&self) -> usize {
        self.inner.collection.len()
    }

    // ── Metadata ─────────────────────────────────────────────────

    /// Number of committed syncs since the store was created.
    pub fn version(&self) -> u64 {
        self.inner.collection.version()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.inner.collection.last_sync()
    }

    /// How long ago the last sync committed, or `None` if never synced.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }
}

fn build_client(
    config: &ClientConfig,
    collection: &Arc<ServiceCollection>,
) -> Result<SignedApiClient, CoreError> {
    let (session, transport) = config.to_parts()?;
    let observer = Arc::new(Resync {
        collection: Arc::clone(collection),
    });
    Ok(SignedApiClient::new(session, &transport)?.with_observer(observer))
}
