//! Admin status cache.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::moderation::{AdminLookup, MemberStatus, Sender, ANONYMOUS_ADMIN_ID};

/// Default freshness window for a cached status.
pub const DEFAULT_ADMIN_TTL: Duration = Duration::from_secs(60);

/// Cached member status with the time it was fetched.
#[derive(Clone, Copy, Debug)]
pub struct AdminEntry {
    pub status: MemberStatus,
    pub fetched_at: Instant,
}

impl AdminEntry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// Cache key for admin lookups.
type AdminCacheKey = (i64, u64); // (chat_id, user_id)

/// Decides whether a sender bypasses moderation.
///
/// Global admins (from GLOBAL_ADMIN_IDS) and anonymous group admins are
/// exempt without any lookup. Everyone else is resolved through the chat
/// transport and cached for `ttl`. A failed lookup counts as "not exempt".
#[derive(Clone)]
pub struct AdminStatusCache {
    lookup: Arc<dyn AdminLookup>,
    cache: TypedCache<AdminCacheKey, AdminEntry>,
    global_admins: Arc<HashSet<u64>>,
    ttl: Duration,
}

impl AdminStatusCache {
    pub fn new(
        lookup: Arc<dyn AdminLookup>,
        cache_registry: &CacheRegistry,
        global_admins: impl IntoIterator<Item = u64>,
        ttl: Duration,
    ) -> Self {
        let cache = cache_registry.get_or_create("admin_status", CacheConfig::admin_status(ttl));

        Self {
            lookup,
            cache,
            global_admins: Arc::new(global_admins.into_iter().collect()),
            ttl,
        }
    }

    #[inline]
    pub fn is_global_admin(&self, user_id: u64) -> bool {
        self.global_admins.contains(&user_id)
    }

    /// Whether moderation should skip this sender.
    pub async fn is_exempt(&self, chat_id: i64, sender: &Sender) -> bool {
        self.is_exempt_at(chat_id, sender, Instant::now()).await
    }

    pub async fn is_exempt_at(&self, chat_id: i64, sender: &Sender, now: Instant) -> bool {
        if sender.anonymous_admin || sender.id == ANONYMOUS_ADMIN_ID {
            return true;
        }
        self.is_admin_at(chat_id, sender.id, now).await
    }

    /// Whether a user is a chat admin (or a global admin).
    pub async fn is_admin(&self, chat_id: i64, user_id: u64) -> bool {
        self.is_admin_at(chat_id, user_id, Instant::now()).await
    }

    pub async fn is_admin_at(&self, chat_id: i64, user_id: u64, now: Instant) -> bool {
        if self.is_global_admin(user_id) {
            debug!("User {} is a global admin", user_id);
            return true;
        }

        let cache_key = (chat_id, user_id);

        if let Some(entry) = self.cache.get(&cache_key)
            && entry.is_fresh(now, self.ttl)
        {
            return entry.status.is_admin();
        }

        debug!("Admin cache miss for user {} in chat {}", user_id, chat_id);

        match self.lookup.member_status(chat_id, user_id).await {
            Ok(status) => {
                self.cache.insert(
                    cache_key,
                    AdminEntry {
                        status,
                        fetched_at: now,
                    },
                );
                status.is_admin()
            }
            Err(e) => {
                warn!(
                    "Admin lookup failed for user {} in chat {}, treating as member: {}",
                    user_id, chat_id, e
                );
                false
            }
        }
    }

    /// Drop a cached status. Called when a member's role changes.
    pub fn invalidate(&self, chat_id: i64, user_id: u64) {
        self.cache.invalidate(&(chat_id, user_id));
        debug!("Invalidated admin cache for user {} in chat {}", user_id, chat_id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::moderation::memory::CountingLookup;

    fn cache_with(lookup: Arc<CountingLookup>, globals: Vec<u64>) -> AdminStatusCache {
        AdminStatusCache::new(lookup, &CacheRegistry::new(), globals, DEFAULT_ADMIN_TTL)
    }

    #[tokio::test]
    async fn test_second_lookup_within_ttl_hits_cache() {
        let lookup = Arc::new(CountingLookup::new().with_status(-1, 7, MemberStatus::Administrator));
        let cache = cache_with(lookup.clone(), vec![]);
        let now = Instant::now();

        assert!(cache.is_admin_at(-1, 7, now).await);
        assert!(cache.is_admin_at(-1, 7, now + Duration::from_secs(59)).await);

        assert_eq!(lookup.calls(), 1);
    }

    #[tokio::test]
    async fn test_lookup_after_ttl_refreshes() {
        let lookup = Arc::new(CountingLookup::new().with_status(-1, 7, MemberStatus::Administrator));
        let cache = cache_with(lookup.clone(), vec![]);
        let now = Instant::now();

        assert!(cache.is_admin_at(-1, 7, now).await);
        lookup.set_status(-1, 7, MemberStatus::Member);
        assert!(!cache.is_admin_at(-1, 7, now + Duration::from_secs(61)).await);

        assert_eq!(lookup.calls(), 2);
    }

    #[tokio::test]
    async fn test_global_and_anonymous_admins_skip_lookup() {
        let lookup = Arc::new(CountingLookup::new());
        let cache = cache_with(lookup.clone(), vec![99]);

        assert!(cache.is_exempt(-1, &Sender::user(99, "Root")).await);
        assert!(cache.is_exempt(-1, &Sender::user(ANONYMOUS_ADMIN_ID, "Group")).await);

        let mut on_behalf = Sender::user(500, "Group");
        on_behalf.anonymous_admin = true;
        assert!(cache.is_exempt(-1, &on_behalf).await);

        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_not_exempt_and_not_cached() {
        let lookup = Arc::new(CountingLookup::new().with_status(-1, 7, MemberStatus::Owner));
        lookup.fail.store(true, Ordering::SeqCst);
        let cache = cache_with(lookup.clone(), vec![]);

        assert!(!cache.is_exempt(-1, &Sender::user(7, "Owner")).await);

        lookup.fail.store(false, Ordering::SeqCst);
        assert!(cache.is_exempt(-1, &Sender::user(7, "Owner")).await);
        assert_eq!(lookup.calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let lookup = Arc::new(CountingLookup::new().with_status(-1, 7, MemberStatus::Administrator));
        let cache = cache_with(lookup.clone(), vec![]);

        assert!(cache.is_admin(-1, 7).await);
        lookup.set_status(-1, 7, MemberStatus::Left);
        cache.invalidate(-1, 7);

        assert!(!cache.is_admin(-1, 7).await);
        assert_eq!(lookup.calls(), 2);
    }
}
