use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use super::ancestors::Ancestry;

/// Default lifetime of a cached walk.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Cache key: one walk per root and generation bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WalkKey {
    dog_id: String,
    generations: usize,
}

impl WalkKey {
    pub fn new(dog_id: &str, generations: usize) -> Self {
        Self {
            dog_id: dog_id.to_string(),
            generations,
        }
    }
}

/// Storage for completed ancestor walks.
///
/// Implementations are shared between concurrent requests and must never
/// hand out an entry older than their advertised lifetime, since ancestry
/// edits have to show up eventually.
pub trait AncestorCache: Send + Sync {
    fn get(&self, key: &WalkKey) -> Option<Arc<Ancestry>>;

    fn put(&self, key: WalkKey, ancestry: Arc<Ancestry>);

    /// Drop expired entries, returning how many were removed.
    fn sweep_expired(&self) -> usize;

    /// Drop everything.
    fn clear(&self);
}

/// Cache that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl AncestorCache for NoCache {
    fn get(&self, _key: &WalkKey) -> Option<Arc<Ancestry>> {
        None
    }

    fn put(&self, _key: WalkKey, _ancestry: Arc<Ancestry>) {}

    fn sweep_expired(&self) -> usize {
        0
    }

    fn clear(&self) {}
}

/// In-memory walk cache with a fixed time-to-live, backed by moka.
///
/// Expired entries are never returned; [`AncestorCache::sweep_expired`]
/// runs moka's pending maintenance to reclaim them.
pub struct TtlAncestorCache {
    ttl: Duration,
    inner: Cache<WalkKey, Arc<Ancestry>>,
}

impl TtlAncestorCache {
    pub fn new(ttl: Duration) -> Self {
        let inner = Cache::builder().time_to_live(ttl).build();
        log::debug!("Ancestor cache initialized with a {:?} TTL", ttl);
        Self { ttl, inner }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries after pending maintenance has run.
    pub fn len(&self) -> usize {
        self.inner.run_pending_tasks();
        self.inner.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TtlAncestorCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl AncestorCache for TtlAncestorCache {
    fn get(&self, key: &WalkKey) -> Option<Arc<Ancestry>> {
        self.inner.get(key)
    }

    fn put(&self, key: WalkKey, ancestry: Arc<Ancestry>) {
        self.inner.insert(key, ancestry);
    }

    fn sweep_expired(&self) -> usize {
        let before = self.inner.entry_count();
        self.inner.run_pending_tasks();
        let removed = before.saturating_sub(self.inner.entry_count()) as usize;
        if removed > 0 {
            log::debug!("Swept {} expired ancestor walks", removed);
        }
        removed
    }

    fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks();
    }
}
