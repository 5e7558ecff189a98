//! Cache registry - Central management for named caches.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::{CacheConfig, TypedCache};

/// Central registry for named typed caches.
///
/// Components that share a cache (the tenant repository and the admin
/// commands, for example) look it up by name and get the same instance.
#[derive(Clone)]
pub struct CacheRegistry {
    caches: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

/// Internal cache entry storing type-erased cache.
struct CacheEntry {
    cache: Box<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl CacheEntry {
    /// # Panics
    /// Panics if the cache was registered with different types. That is a
    /// programming error, not a runtime condition.
    fn downcast<K, V>(&self, name: &str) -> TypedCache<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        match self.cache.downcast_ref::<TypedCache<K, V>>() {
            Some(cache) if self.type_id == TypeId::of::<TypedCache<K, V>>() => cache.clone(),
            _ => panic!(
                "Cache '{}' type mismatch: expected {}, got {}",
                name,
                std::any::type_name::<TypedCache<K, V>>(),
                self.type_name
            ),
        }
    }
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self {
            caches: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get a cache by name, creating it with `config` on first use.
    pub fn get_or_create<K, V>(&self, name: &str, config: CacheConfig) -> TypedCache<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        if let Some(entry) = self.caches.read().get(name) {
            return entry.downcast(name);
        }

        let mut caches = self.caches.write();

        // Another task may have created it between the two locks.
        if let Some(entry) = caches.get(name) {
            return entry.downcast(name);
        }

        debug!("Creating cache: {}", name);

        let cache = TypedCache::new(name, config);
        caches.insert(
            name.to_string(),
            CacheEntry {
                cache: Box::new(cache.clone()),
                type_id: TypeId::of::<TypedCache<K, V>>(),
                type_name: std::any::type_name::<TypedCache<K, V>>(),
            },
        );

        cache
    }

    /// Get the number of registered caches.
    pub fn len(&self) -> usize {
        self.caches.read().len()
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let caches = self.caches.read();
        f.debug_struct("CacheRegistry")
            .field("cache_count", &caches.len())
            .field("cache_names", &caches.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_returns_shared_cache() {
        let registry = CacheRegistry::new();
        let a: TypedCache<i64, String> = registry.get_or_create("tenants", CacheConfig::default());
        let b: TypedCache<i64, String> = registry.get_or_create("tenants", CacheConfig::default());

        a.insert(1, "one".to_string());

        assert_eq!(b.get(&1).as_deref(), Some("one"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    #[should_panic(expected = "type mismatch")]
    fn test_type_mismatch_panics() {
        let registry = CacheRegistry::new();
        let _: TypedCache<i64, String> = registry.get_or_create("tenants", CacheConfig::default());
        let _: TypedCache<i64, u32> = registry.get_or_create("tenants", CacheConfig::default());
    }
}
