//! In-memory collaborators for tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;

use super::action::ModerationAction;
use super::error::{StoreError, TransportError};
use super::filters::normalize_word;
use super::model::{LogEntry, MemberStatus, TenantConfig, TenantDefaults};
use super::ports::{ActionExecutor, AdminLookup, ModerationStore};

/// DashMap-backed store. Failure switches simulate an unreachable backend.
#[derive(Default)]
pub struct MemoryStore {
    defaults: TenantDefaults,
    configs: DashMap<i64, TenantConfig>,
    warnings: DashMap<(i64, u64), u32>,
    words: DashMap<i64, HashSet<String>>,
    logs: Mutex<Vec<LogEntry>>,
    pub fail_configs: AtomicBool,
    pub fail_warnings: AtomicBool,
    pub fail_words: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(self, config: TenantConfig) -> Self {
        self.configs.insert(config.chat_id, config);
        self
    }

    pub fn with_word(self, chat_id: i64, word: &str) -> Self {
        self.words.entry(chat_id).or_default().insert(normalize_word(word));
        self
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.logs.lock().clone()
    }

    fn check(flag: &AtomicBool) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ModerationStore for MemoryStore {
    async fn tenant_config(&self, chat_id: i64) -> Result<TenantConfig, StoreError> {
        Self::check(&self.fail_configs)?;
        Ok(self
            .configs
            .entry(chat_id)
            .or_insert_with(|| TenantConfig::new(chat_id, &self.defaults))
            .clone())
    }

    async fn save_tenant_config(&self, config: &TenantConfig) -> Result<(), StoreError> {
        Self::check(&self.fail_configs)?;
        self.configs.insert(config.chat_id, config.clone());
        Ok(())
    }

    async fn warning_count(&self, chat_id: i64, user_id: u64) -> Result<u32, StoreError> {
        Self::check(&self.fail_warnings)?;
        Ok(self.warnings.get(&(chat_id, user_id)).map(|c| *c).unwrap_or(0))
    }

    async fn increment_warning(&self, chat_id: i64, user_id: u64, _reason: &str) -> Result<u32, StoreError> {
        Self::check(&self.fail_warnings)?;
        let mut count = self.warnings.entry((chat_id, user_id)).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    async fn decrement_warning(&self, chat_id: i64, user_id: u64) -> Result<u32, StoreError> {
        Self::check(&self.fail_warnings)?;
        let mut count = self.warnings.entry((chat_id, user_id)).or_insert(0);
        *count = count.saturating_sub(1);
        Ok(*count)
    }

    async fn reset_warnings(&self, chat_id: i64, user_id: u64) -> Result<(), StoreError> {
        Self::check(&self.fail_warnings)?;
        self.warnings.remove(&(chat_id, user_id));
        Ok(())
    }

    async fn filter_words(&self, chat_id: i64) -> Result<HashSet<String>, StoreError> {
        Self::check(&self.fail_words)?;
        Ok(self.words.get(&chat_id).map(|w| w.clone()).unwrap_or_default())
    }

    async fn add_filter_word(&self, chat_id: i64, word: &str, _added_by: u64) -> Result<bool, StoreError> {
        Self::check(&self.fail_words)?;
        Ok(self.words.entry(chat_id).or_default().insert(normalize_word(word)))
    }

    async fn remove_filter_word(&self, chat_id: i64, word: &str) -> Result<bool, StoreError> {
        Self::check(&self.fail_words)?;
        Ok(self
            .words
            .get_mut(&chat_id)
            .map(|mut w| w.remove(&normalize_word(word)))
            .unwrap_or(false))
    }

    async fn append_log(&self, entry: &LogEntry) -> Result<(), StoreError> {
        self.logs.lock().push(entry.clone());
        Ok(())
    }
}

/// Fixed member statuses; counts transport calls.
#[derive(Default)]
pub struct CountingLookup {
    statuses: DashMap<(i64, u64), MemberStatus>,
    calls: AtomicUsize,
    pub fail: AtomicBool,
}

impl CountingLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(self, chat_id: i64, user_id: u64, status: MemberStatus) -> Self {
        self.statuses.insert((chat_id, user_id), status);
        self
    }

    pub fn set_status(&self, chat_id: i64, user_id: u64, status: MemberStatus) {
        self.statuses.insert((chat_id, user_id), status);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdminLookup for CountingLookup {
    async fn member_status(&self, chat_id: i64, user_id: u64) -> Result<MemberStatus, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(TransportError::Request("network down".to_string()));
        }
        Ok(self
            .statuses
            .get(&(chat_id, user_id))
            .map(|s| *s)
            .unwrap_or(MemberStatus::Member))
    }
}

/// Records executed actions. A kick can be made to fail at the unban step.
#[derive(Default)]
pub struct RecordingExecutor {
    executed: Mutex<Vec<ModerationAction>>,
    pub fail_unban: AtomicBool,
    pub fail_delete: AtomicBool,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executed(&self) -> Vec<ModerationAction> {
        self.executed.lock().clone()
    }
}

#[async_trait]
impl ActionExecutor for RecordingExecutor {
    async fn execute(&self, action: &ModerationAction) -> Result<(), TransportError> {
        match action {
            ModerationAction::Kick { chat_id, user_id } if self.fail_unban.load(Ordering::SeqCst) => {
                self.executed.lock().push(action.clone());
                Err(TransportError::StuckBan {
                    chat_id: *chat_id,
                    user_id: *user_id,
                    reason: "unban rejected".to_string(),
                })
            }
            ModerationAction::DeleteMessage { .. } if self.fail_delete.load(Ordering::SeqCst) => {
                Err(TransportError::Request("message to delete not found".to_string()))
            }
            _ => {
                self.executed.lock().push(action.clone());
                Ok(())
            }
        }
    }
}
