//! Published snapshots and the store that hands them out
//!
//! The store is the single shared resource between the refresh task and
//! concurrent lookups. Writers swap the published `Arc` under an exclusive
//! lock; readers clone the handle under a briefly-held read lock and then
//! search without holding any lock at all.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::SystemTime;

/// An immutable, ascending sequence of dataset values
///
/// Once published a snapshot is never mutated; the next successful refresh
/// replaces it wholesale.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    values: Vec<i64>,
    published_at: Option<SystemTime>,
}

impl Snapshot {
    /// Create an unpublished snapshot from parsed values
    ///
    /// The publish timestamp is stamped by [`SnapshotStore::publish`].
    pub fn new(values: Vec<i64>) -> Self {
        Self {
            values,
            published_at: None,
        }
    }

    /// The dataset values, ascending
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Number of values in the snapshot
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the snapshot holds no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// When this snapshot was published, if it has been
    pub fn published_at(&self) -> Option<SystemTime> {
        self.published_at
    }
}

/// Single-writer, multi-reader handoff of the current snapshot
///
/// Holds exactly one snapshot; no history is retained. A fresh store starts
/// with an empty snapshot, so lookups before the first publish return
/// not-found rather than failing.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    /// Create a store holding an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published snapshot
    ///
    /// Stamps the publish time and swaps the shared handle under the write
    /// lock. Lookups that already cloned the previous handle finish against
    /// it; lookups that start after the swap observe the new snapshot.
    pub fn publish(&self, mut snapshot: Snapshot) {
        snapshot.published_at = Some(SystemTime::now());
        let snapshot = Arc::new(snapshot);
        *self.current.write() = snapshot;
    }

    /// A consistent handle to the current snapshot
    ///
    /// The read lock is held only long enough to clone the `Arc`; the
    /// returned handle stays valid for the whole lookup even if a publish
    /// happens concurrently.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }
}
