//! MongoDB-backed moderation store.

use std::collections::HashSet;

use async_trait::async_trait;

use super::mongo::Database;
use super::repository::{ActionLogRepository, FilterWordRepository, TenantRepository, WarningRepository};
use crate::cache::CacheRegistry;
use crate::moderation::{LogEntry, ModerationStore, StoreError, TenantConfig, TenantDefaults};

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(e: mongodb::bson::ser::Error) -> Self {
        Self::InvalidData(e.to_string())
    }
}

/// The persistence collaborator used in production.
pub struct MongoStore {
    tenants: TenantRepository,
    warnings: WarningRepository,
    words: FilterWordRepository,
    logs: ActionLogRepository,
}

impl MongoStore {
    pub fn new(db: &Database, cache: &CacheRegistry, defaults: TenantDefaults) -> Self {
        Self {
            tenants: TenantRepository::new(db, cache, defaults),
            warnings: WarningRepository::new(db),
            words: FilterWordRepository::new(db, cache),
            logs: ActionLogRepository::new(db),
        }
    }
}

#[async_trait]
impl ModerationStore for MongoStore {
    async fn tenant_config(&self, chat_id: i64) -> Result<TenantConfig, StoreError> {
        self.tenants.get_or_create(chat_id).await
    }

    async fn save_tenant_config(&self, config: &TenantConfig) -> Result<(), StoreError> {
        self.tenants.save(config).await
    }

    async fn warning_count(&self, chat_id: i64, user_id: u64) -> Result<u32, StoreError> {
        self.warnings.count(chat_id, user_id).await
    }

    async fn increment_warning(&self, chat_id: i64, user_id: u64, reason: &str) -> Result<u32, StoreError> {
        self.warnings.increment(chat_id, user_id, reason).await
    }

    async fn decrement_warning(&self, chat_id: i64, user_id: u64) -> Result<u32, StoreError> {
        self.warnings.decrement(chat_id, user_id).await
    }

    async fn reset_warnings(&self, chat_id: i64, user_id: u64) -> Result<(), StoreError> {
        self.warnings.reset(chat_id, user_id).await
    }

    async fn filter_words(&self, chat_id: i64) -> Result<HashSet<String>, StoreError> {
        self.words.list(chat_id).await
    }

    async fn add_filter_word(&self, chat_id: i64, word: &str, added_by: u64) -> Result<bool, StoreError> {
        self.words.add(chat_id, word, added_by).await
    }

    async fn remove_filter_word(&self, chat_id: i64, word: &str) -> Result<bool, StoreError> {
        self.words.remove(chat_id, word).await
    }

    async fn append_log(&self, entry: &LogEntry) -> Result<(), StoreError> {
        self.logs.append(entry).await
    }
}
