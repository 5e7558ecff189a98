//! Tenant config repository.
//!
//! Read on every moderated message, so configs are cached (5min TTL) and
//! the cache is updated on every save.

use mongodb::bson::{doc, to_document};
use mongodb::options::{ReplaceOptions, UpdateOptions};
use mongodb::Collection;
use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::mongo::{Database, TENANTS};
use crate::moderation::{StoreError, TenantConfig, TenantDefaults};

pub struct TenantRepository {
    collection: Collection<TenantConfig>,
    cache: TypedCache<i64, TenantConfig>,
    defaults: TenantDefaults,
}

impl TenantRepository {
    pub fn new(db: &Database, cache: &CacheRegistry, defaults: TenantDefaults) -> Self {
        Self {
            collection: db.collection(TENANTS),
            cache: cache.get_or_create("tenants", CacheConfig::tenant_settings()),
            defaults,
        }
    }

    /// Get the tenant config, creating the default record on first sight.
    pub async fn get_or_create(&self, chat_id: i64) -> Result<TenantConfig, StoreError> {
        if let Some(config) = self.cache.get(&chat_id) {
            return Ok(config);
        }

        let filter = doc! { "chat_id": chat_id };
        if let Some(config) = self.collection.find_one(filter.clone()).await? {
            self.cache.insert(chat_id, config.clone());
            return Ok(config);
        }

        // $setOnInsert keeps a concurrently created record intact.
        let config = TenantConfig::new(chat_id, &self.defaults);
        let options = UpdateOptions::builder().upsert(true).build();
        self.collection
            .update_one(filter.clone(), doc! { "$setOnInsert": to_document(&config)? })
            .with_options(options)
            .await?;

        let stored = self.collection.find_one(filter).await?.unwrap_or(config);
        debug!("Created tenant config for chat {}", chat_id);

        self.cache.insert(chat_id, stored.clone());
        Ok(stored)
    }

    /// Save a config (upsert) and refresh the cache.
    pub async fn save(&self, config: &TenantConfig) -> Result<(), StoreError> {
        let filter = doc! { "chat_id": config.chat_id };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(filter, config)
            .with_options(options)
            .await?;

        self.cache.insert(config.chat_id, config.clone());
        debug!("Saved tenant config for chat {}", config.chat_id);

        Ok(())
    }
}
