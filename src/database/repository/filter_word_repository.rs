//! Word filter repository.
//!
//! The per-chat word set is cached (10min TTL) and invalidated whenever a
//! word is added or removed.

use std::collections::HashSet;

use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, to_document};
use mongodb::options::UpdateOptions;
use mongodb::Collection;
use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::models::FilterWordDoc;
use crate::database::mongo::{Database, FILTER_WORDS};
use crate::moderation::filters::normalize_word;
use crate::moderation::StoreError;

pub struct FilterWordRepository {
    collection: Collection<FilterWordDoc>,
    cache: TypedCache<i64, HashSet<String>>,
}

impl FilterWordRepository {
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        Self {
            collection: db.collection(FILTER_WORDS),
            cache: cache.get_or_create("filter_words", CacheConfig::word_lists()),
        }
    }

    pub async fn list(&self, chat_id: i64) -> Result<HashSet<String>, StoreError> {
        if let Some(words) = self.cache.get(&chat_id) {
            return Ok(words);
        }

        let cursor = self.collection.find(doc! { "chat_id": chat_id }).await?;
        let docs: Vec<FilterWordDoc> = cursor.try_collect().await?;
        let words: HashSet<String> = docs.into_iter().map(|d| d.word).collect();

        debug!("Loaded {} filter words for chat {}", words.len(), chat_id);
        self.cache.insert(chat_id, words.clone());
        Ok(words)
    }

    /// Returns false if the word was already present.
    pub async fn add(&self, chat_id: i64, word: &str, added_by: u64) -> Result<bool, StoreError> {
        let word = normalize_word(word);
        if word.is_empty() {
            return Ok(false);
        }

        let entry = FilterWordDoc {
            id: None,
            chat_id,
            word: word.clone(),
            added_by: added_by as i64,
            created_at: Utc::now(),
        };
        let options = UpdateOptions::builder().upsert(true).build();

        let result = self
            .collection
            .update_one(
                doc! { "chat_id": chat_id, "word": word.as_str() },
                doc! { "$setOnInsert": to_document(&entry)? },
            )
            .with_options(options)
            .await?;

        self.cache.invalidate(&chat_id);
        Ok(result.upserted_id.is_some())
    }

    /// Returns false if the word was not present.
    pub async fn remove(&self, chat_id: i64, word: &str) -> Result<bool, StoreError> {
        let word = normalize_word(word);
        let result = self
            .collection
            .delete_one(doc! { "chat_id": chat_id, "word": word.as_str() })
            .await?;

        self.cache.invalidate(&chat_id);
        Ok(result.deleted_count > 0)
    }
}
