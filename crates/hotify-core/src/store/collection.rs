// ── Service collection ──
//
// The sorted snapshot of the server's service list. Every sync builds a
// complete replacement locally and commits it together with its version and
// sync time in one `watch` update, so readers see either the old state or
// the new one, never a mix.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::debug;

use hotify_api::{Error, Service, SignedApiClient};

pub(crate) type Snapshot = Arc<Vec<Arc<Service>>>;

/// One committed sync: the list and the metadata that describes it.
#[derive(Clone)]
pub(crate) struct SyncState {
    /// Sorted by `config.name`.
    pub(crate) services: Snapshot,

    /// Bumped once per committed replacement.
    pub(crate) version: u64,

    pub(crate) last_sync: Option<DateTime<Utc>>,
}

pub(crate) struct ServiceCollection {
    state: watch::Sender<SyncState>,
}

impl ServiceCollection {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(SyncState {
            services: Arc::new(Vec::new()),
            version: 0,
            last_sync: None,
        });
        Self { state }
    }

    /// Fetch the full list through `client` and commit it.
    ///
    /// On error nothing is written.
    pub(crate) async fn sync_from(&self, client: &SignedApiClient) -> Result<usize, Error> {
        let services = client.services().await?;
        let count = services.len();
        self.replace(services);
        debug!(count, "service list synchronized");
        Ok(count)
    }

    /// Replace the whole collection with `services`, sorted by name.
    pub(crate) fn replace(&self, mut services: Vec<Service>) {
        services.sort_by(|a, b| a.config.name.cmp(&b.config.name));
        let next: Snapshot = Arc::new(services.into_iter().map(Arc::new).collect());
        let now = Utc::now();

        self.state.send_modify(|state| {
            state.services = next;
            state.version += 1;
            state.last_sync = Some(now);
        });
    }

    /// Current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Snapshot {
        self.state.borrow().services.clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    pub(crate) fn get(&self, name: &str) -> Option<Arc<Service>> {
        let state = self.state.borrow();
        let snap = &state.services;
        snap.binary_search_by(|s| s.config.name.as_str().cmp(name))
            .ok()
            .and_then(|idx| snap.get(idx).cloned())
    }

    pub(crate) fn len(&self) -> usize {
        self.state.borrow().services.len()
    }

    pub(crate) fn version(&self) -> u64 {
        self.state.borrow().version
    }

    pub(crate) fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.state.borrow().last_sync
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hotify_api::{ServiceConfig, ServiceStatus};

    use super::*;

    fn service(name: &str) -> Service {
        Service {
            config: ServiceConfig {
                name: name.into(),
                ..ServiceConfig::default()
            },
            path: format!("/srv/{name}"),
            status: ServiceStatus::Running,
            restarts: 0,
            logs: Vec::new(),
        }
    }

    fn names(col: &ServiceCollection) -> Vec<String> {
        col.snapshot().iter().map(|s| s.config.name.clone()).collect()
    }

    #[test]
    fn starts_empty_and_unsynced() {
        let col = ServiceCollection::new();
        assert!(col.snapshot().is_empty());
        assert_eq!(col.version(), 0);
        assert!(col.last_sync().is_none());
    }

    #[test]
    fn replace_sorts_by_name() {
        let col = ServiceCollection::new();
        col.replace(vec![service("b"), service("a"), service("c")]);
        assert_eq!(names(&col), vec!["a", "b", "c"]);
    }

    #[test]
    fn replace_discards_previous_entries() {
        let col = ServiceCollection::new();
        col.replace(vec![service("web"), service("api")]);
        col.replace(vec![service("worker")]);

        assert_eq!(names(&col), vec!["worker"]);
        assert!(col.get("web").is_none());
        assert_eq!(col.version(), 2);
        assert!(col.last_sync().is_some());
    }

    #[test]
    fn earlier_snapshot_is_unaffected_by_replace() {
        let col = ServiceCollection::new();
        col.replace(vec![service("a")]);
        let before = col.snapshot();

        col.replace(vec![service("b"), service("c")]);

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].config.name, "a");
        assert_eq!(col.len(), 2);
    }

    #[test]
    fn get_finds_by_name() {
        let col = ServiceCollection::new();
        col.replace(vec![service("web"), service("api")]);

        assert_eq!(col.get("web").unwrap().path, "/srv/web");
        assert!(col.get("missing").is_none());
    }

    #[test]
    fn subscribers_see_replacement() {
        let col = ServiceCollection::new();
        let mut rx = col.subscribe();

        col.replace(vec![service("web")]);

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.services.len(), 1);
        assert_eq!(state.version, 1);
        assert!(state.last_sync.is_some());
    }

    #[test]
    fn metadata_is_committed_with_its_list() {
        let col = ServiceCollection::new();
        let rx = col.subscribe();
        col.replace(vec![service("a")]);
        let first = rx.borrow().clone();
        col.replace(vec![service("b"), service("c")]);
        let second = rx.borrow().clone();

        assert_eq!((first.version, first.services.len()), (1, 1));
        assert_eq!((second.version, second.services.len()), (2, 2));
        assert!(second.last_sync >= first.last_sync);
    }
}
