//! Collaborator interfaces consumed by the moderation core.
//!
//! The Telegram adapter and the MongoDB store implement these; tests plug in
//! in-memory fakes.

use std::collections::HashSet;

use async_trait::async_trait;

use super::action::ModerationAction;
use super::error::{StoreError, TransportError};
use super::model::{LogEntry, MemberStatus, TenantConfig};

/// Admin lookups against the chat transport.
#[async_trait]
pub trait AdminLookup: Send + Sync {
    async fn member_status(&self, chat_id: i64, user_id: u64) -> Result<MemberStatus, TransportError>;
}

/// Executes transport-side intents (everything but log entries).
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// `Kick` is a single operation: an unban failure after a successful ban
    /// must come back as [`TransportError::StuckBan`].
    async fn execute(&self, action: &ModerationAction) -> Result<(), TransportError>;
}

/// Persistent moderation state.
#[async_trait]
pub trait ModerationStore: Send + Sync {
    /// Get the tenant config, creating a default record if absent.
    async fn tenant_config(&self, chat_id: i64) -> Result<TenantConfig, StoreError>;

    async fn save_tenant_config(&self, config: &TenantConfig) -> Result<(), StoreError>;

    async fn warning_count(&self, chat_id: i64, user_id: u64) -> Result<u32, StoreError>;

    /// Atomically increment and return the new count.
    async fn increment_warning(&self, chat_id: i64, user_id: u64, reason: &str) -> Result<u32, StoreError>;

    /// Remove one warning (never below zero) and return the new count.
    async fn decrement_warning(&self, chat_id: i64, user_id: u64) -> Result<u32, StoreError>;

    async fn reset_warnings(&self, chat_id: i64, user_id: u64) -> Result<(), StoreError>;

    /// Normalized filter words for the tenant.
    async fn filter_words(&self, chat_id: i64) -> Result<HashSet<String>, StoreError>;

    /// Returns false if the word was already registered.
    async fn add_filter_word(&self, chat_id: i64, word: &str, added_by: u64) -> Result<bool, StoreError>;

    /// Returns false if the word was not registered.
    async fn remove_filter_word(&self, chat_id: i64, word: &str) -> Result<bool, StoreError>;

    async fn append_log(&self, entry: &LogEntry) -> Result<(), StoreError>;
}
