// ── Synchronized service store ──
//
// Wholesale-replaced service snapshot with push-based change notification.

mod collection;
mod synced;

pub(crate) use collection::SyncState;
pub use synced::SyncedStore;
