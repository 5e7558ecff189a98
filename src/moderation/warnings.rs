//! Warning state machine.
//!
//! Counts go up one violation at a time and drop to zero only through an
//! explicit reset. Reaching the tenant limit resets the count inside the same
//! per-user critical section, so one crossing yields exactly one kick.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use super::error::StoreError;
use super::model::{LogAction, LogEntry};
use super::ports::ModerationStore;

type WarnKey = (i64, u64); // (chat_id, user_id)

/// What a recorded violation did to the user's warning count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningTransition {
    /// Below the limit; `count` is the new total.
    Warned { count: u32, max: u32 },
    /// Limit reached; the user must be kicked. The stored count is already 0.
    LimitReached { count: u32, max: u32 },
}

/// Serializes warning mutations per (chat, user) on top of the store.
#[derive(Clone)]
pub struct WarningStateMachine {
    store: Arc<dyn ModerationStore>,
    locks: Arc<DashMap<WarnKey, Arc<Mutex<()>>>>,
}

impl WarningStateMachine {
    pub fn new(store: Arc<dyn ModerationStore>) -> Self {
        Self {
            store,
            locks: Arc::new(DashMap::new()),
        }
    }

    fn key_lock(&self, chat_id: i64, user_id: u64) -> Arc<Mutex<()>> {
        self.locks.entry((chat_id, user_id)).or_default().clone()
    }

    /// Add one warning and apply the limit transition.
    pub async fn record_violation(
        &self,
        chat_id: i64,
        user_id: u64,
        reason: &str,
        max_warnings: u32,
    ) -> Result<WarningTransition, StoreError> {
        let max = max_warnings.max(1);
        let lock = self.key_lock(chat_id, user_id);
        let _guard = lock.lock().await;

        let count = self.store.increment_warning(chat_id, user_id, reason).await?;
        debug!("User {} in chat {} now has {}/{} warnings", user_id, chat_id, count, max);

        if count < max {
            return Ok(WarningTransition::Warned { count, max });
        }

        if let Err(e) = self.store.reset_warnings(chat_id, user_id).await {
            // The kick still goes out; the next violation will cross again.
            error!(
                "Failed to reset warnings for user {} in chat {} after limit: {}",
                user_id, chat_id, e
            );
        }

        Ok(WarningTransition::LimitReached { count, max })
    }

    /// Add one warning without applying the limit.
    #[cfg(test)]
    pub async fn add_warning(&self, chat_id: i64, user_id: u64, reason: &str) -> Result<u32, StoreError> {
        let lock = self.key_lock(chat_id, user_id);
        let _guard = lock.lock().await;
        self.store.increment_warning(chat_id, user_id, reason).await
    }

    /// Remove one warning on behalf of `admin_id`.
    pub async fn remove_one(&self, chat_id: i64, user_id: u64, admin_id: u64) -> Result<u32, StoreError> {
        let count = {
            let lock = self.key_lock(chat_id, user_id);
            let _guard = lock.lock().await;
            self.store.decrement_warning(chat_id, user_id).await?
        };

        let reason = format!("warning removed, now {}", count);
        self.log(LogEntry::by_admin(chat_id, user_id, admin_id, LogAction::Unwarn, reason))
            .await;
        Ok(count)
    }

    /// Set the count back to zero on behalf of `admin_id`.
    pub async fn reset(&self, chat_id: i64, user_id: u64, admin_id: u64) -> Result<(), StoreError> {
        {
            let lock = self.key_lock(chat_id, user_id);
            let _guard = lock.lock().await;
            self.store.reset_warnings(chat_id, user_id).await?;
        }

        self.log(LogEntry::by_admin(chat_id, user_id, admin_id, LogAction::ResetWarns, "warnings reset"))
            .await;
        Ok(())
    }

    /// The change already happened; a lost log line is only reported.
    async fn log(&self, entry: LogEntry) {
        if let Err(e) = self.store.append_log(&entry).await {
            warn!(
                "Failed to log {} for user {} in chat {}: {}",
                entry.action.as_str(),
                entry.user_id,
                entry.chat_id,
                e
            );
        }
    }

    pub async fn count(&self, chat_id: i64, user_id: u64) -> Result<u32, StoreError> {
        self.store.warning_count(chat_id, user_id).await
    }

    /// Drop locks nobody is holding or waiting on.
    pub fn prune_idle_locks(&self) -> usize {
        let before = self.locks.len();
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before.saturating_sub(self.locks.len())
    }
}
