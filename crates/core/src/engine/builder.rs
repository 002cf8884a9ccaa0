use std::sync::Arc;
use std::time::Duration;

use crate::data::DogStore;
use crate::error::{GenealogyError, Result};
use crate::genetics::cache::{AncestorCache, NoCache, TtlAncestorCache, DEFAULT_CACHE_TTL};
use crate::genetics::coi::DEFAULT_MAX_COMMON_ANCESTORS;
use crate::types::{DEFAULT_GENERATIONS, MAX_GENERATIONS, MIN_GENERATIONS};

use super::GenealogyEngine;

enum CacheChoice {
    Ttl(Duration),
    Disabled,
    Custom(Arc<dyn AncestorCache>),
}

/// Builder for constructing a [`GenealogyEngine`].
pub struct GenealogyEngineBuilder {
    store: Option<Arc<dyn DogStore>>,
    cache: CacheChoice,
    default_generations: usize,
    max_common_ancestors: usize,
}

impl GenealogyEngineBuilder {
    /// Create a new builder with the default settings: 5 generations, a
    /// 5-minute walk cache and 10 reported common ancestors.
    pub fn new() -> Self {
        Self {
            store: None,
            cache: CacheChoice::Ttl(DEFAULT_CACHE_TTL),
            default_generations: DEFAULT_GENERATIONS,
            max_common_ancestors: DEFAULT_MAX_COMMON_ANCESTORS,
        }
    }

    /// Set the dog store.
    pub fn store(mut self, store: impl DogStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set a dog store that is shared with other owners.
    pub fn shared_store(mut self, store: Arc<dyn DogStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Lifetime of cached ancestor walks (default: 5 minutes).
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = CacheChoice::Ttl(ttl);
        self
    }

    /// Walk the store on every request.
    pub fn without_cache(mut self) -> Self {
        self.cache = CacheChoice::Disabled;
        self
    }

    /// Use a caller-supplied walk cache.
    pub fn cache(mut self, cache: impl AncestorCache + 'static) -> Self {
        self.cache = CacheChoice::Custom(Arc::new(cache));
        self
    }

    /// Generation bound used when a caller does not give one (default: 5).
    pub fn default_generations(mut self, generations: usize) -> Self {
        self.default_generations = generations;
        self
    }

    /// How many common ancestors a COI result lists (default: 10).
    pub fn max_common_ancestors(mut self, n: usize) -> Self {
        self.max_common_ancestors = n;
        self
    }

    /// Build the engine. Validates every setting.
    pub fn build(self) -> Result<GenealogyEngine> {
        let store = self
            .store
            .ok_or_else(|| GenealogyError::Config("No dog store provided".into()))?;

        if !(MIN_GENERATIONS..=MAX_GENERATIONS).contains(&self.default_generations) {
            return Err(GenealogyError::Config(format!(
                "default generations must be between {} and {}, got {}",
                MIN_GENERATIONS, MAX_GENERATIONS, self.default_generations
            )));
        }
        if self.max_common_ancestors == 0 {
            return Err(GenealogyError::Config(
                "max common ancestors must be at least 1".into(),
            ));
        }

        let cache: Arc<dyn AncestorCache> = match self.cache {
            CacheChoice::Ttl(ttl) if ttl.is_zero() => {
                return Err(GenealogyError::Config(
                    "cache TTL must be positive; use without_cache() to disable caching".into(),
                ));
            }
            CacheChoice::Ttl(ttl) => Arc::new(TtlAncestorCache::new(ttl)),
            CacheChoice::Disabled => Arc::new(NoCache),
            CacheChoice::Custom(cache) => cache,
        };

        log::debug!(
            "Genealogy engine: {} default generations, {} common ancestors reported",
            self.default_generations,
            self.max_common_ancestors
        );

        Ok(GenealogyEngine {
            store,
            cache,
            default_generations: self.default_generations,
            max_common_ancestors: self.max_common_ancestors,
        })
    }
}

impl Default for GenealogyEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryDogStore;

    #[test]
    fn test_defaults() {
        let engine = GenealogyEngineBuilder::new()
            .store(MemoryDogStore::new())
            .build()
            .unwrap();
        assert_eq!(engine.default_generations(), 5);
        assert_eq!(engine.max_common_ancestors(), 10);
    }

    #[test]
    fn test_missing_store() {
        let err = GenealogyEngineBuilder::new().build().err().unwrap();
        assert!(matches!(err, GenealogyError::Config(_)));
    }

    #[test]
    fn test_invalid_settings() {
        let bad_generations = GenealogyEngineBuilder::new()
            .store(MemoryDogStore::new())
            .default_generations(11)
            .build();
        assert!(matches!(bad_generations, Err(GenealogyError::Config(_))));

        let bad_max = GenealogyEngineBuilder::new()
            .store(MemoryDogStore::new())
            .max_common_ancestors(0)
            .build();
        assert!(matches!(bad_max, Err(GenealogyError::Config(_))));

        let bad_ttl = GenealogyEngineBuilder::new()
            .store(MemoryDogStore::new())
            .cache_ttl(Duration::ZERO)
            .build();
        assert!(matches!(bad_ttl, Err(GenealogyError::Config(_))));
    }

    #[test]
    fn test_shared_store_and_custom_cache() {
        let store: Arc<dyn DogStore> = Arc::new(MemoryDogStore::new());
        let engine = GenealogyEngineBuilder::new()
            .shared_store(Arc::clone(&store))
            .cache(NoCache)
            .default_generations(3)
            .build()
            .unwrap();
        assert_eq!(engine.default_generations(), 3);
        assert_eq!(Arc::strong_count(&store), 2);
    }
}
