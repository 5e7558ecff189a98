//! Moderation pipeline.
//!
//! Turns one inbound message into a [`Decision`]: what happened and the side
//! effects to perform. Nothing here talks to Telegram directly; the caller
//! hands the actions to [`ModerationPipeline::apply`] with an executor.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use super::action::ModerationAction;
use super::filters;
use super::flood::FloodDetector;
use super::message::{InboundMessage, Sender};
use super::model::{LogAction, LogEntry, TenantConfig, TenantDefaults};
use super::ports::{ActionExecutor, ModerationStore};
use super::verdict::{ModerationVerdict, Violation};
use super::warnings::{WarningStateMachine, WarningTransition};
use crate::i18n::get_text_with;
use crate::permissions::AdminStatusCache;
use crate::utils::{format_duration, html_escape, mention_html};

/// Why the pipeline did not look at a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotApplicable {
    NotGroup,
    NoSender,
    ExemptSender,
    TenantInactive,
}

/// What the pipeline decided.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    NotApplicable(NotApplicable),
    Allowed,
    /// Linked channel forward.
    Skipped,
    Flooded { mute: Duration },
    Warned { violation: Violation, count: u32, max: u32 },
    Kicked { violation: Violation, max: u32 },
    /// Deleted without a warning (silent word filter).
    Deleted { violation: Violation },
    /// Deleted, but the warning could not be persisted.
    WarningNotRecorded { violation: Violation },
}

/// Outcome plus the side effects to perform, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub outcome: Outcome,
    pub actions: Vec<ModerationAction>,
}

impl Decision {
    fn none(outcome: Outcome) -> Self {
        Self {
            outcome,
            actions: Vec::new(),
        }
    }

    fn not_applicable(reason: NotApplicable) -> Self {
        Self::none(Outcome::NotApplicable(reason))
    }
}

/// Summary of one [`ModerationPipeline::apply`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Applied {
    pub executed: usize,
    pub failed: usize,
    pub stuck_bans: usize,
}

/// Shared moderation state for the whole process.
#[derive(Clone)]
pub struct ModerationPipeline {
    store: Arc<dyn ModerationStore>,
    admins: AdminStatusCache,
    flood: FloodDetector,
    warnings: WarningStateMachine,
    defaults: Arc<TenantDefaults>,
}

impl ModerationPipeline {
    pub fn new(store: Arc<dyn ModerationStore>, admins: AdminStatusCache, defaults: TenantDefaults) -> Self {
        Self {
            warnings: WarningStateMachine::new(store.clone()),
            store,
            admins,
            flood: FloodDetector::new(),
            defaults: Arc::new(defaults),
        }
    }

    pub fn store(&self) -> &Arc<dyn ModerationStore> {
        &self.store
    }

    pub fn admins(&self) -> &AdminStatusCache {
        &self.admins
    }

    pub fn warnings(&self) -> &WarningStateMachine {
        &self.warnings
    }

    #[cfg(test)]
    pub fn flood(&self) -> &FloodDetector {
        &self.flood
    }

    /// Tenant config with defaults applied. Store failures fall back to the
    /// process defaults.
    pub async fn tenant_config(&self, chat_id: i64) -> TenantConfig {
        match self.store.tenant_config(chat_id).await {
            Ok(config) => config.sanitized(&self.defaults),
            Err(e) => {
                warn!("Using default config for chat {}: {}", chat_id, e);
                TenantConfig::new(chat_id, &self.defaults)
            }
        }
    }

    pub async fn handle_message(&self, msg: &InboundMessage) -> Decision {
        self.handle_message_at(msg, Instant::now()).await
    }

    /// Decide what to do with `msg`, received at `now`.
    pub async fn handle_message_at(&self, msg: &InboundMessage, now: Instant) -> Decision {
        let sender = match self.guard(msg, now).await {
            Ok(sender) => sender,
            Err(reason) => return Decision::not_applicable(reason),
        };

        let config = self.tenant_config(msg.chat_id).await;
        if !config.is_active {
            return Decision::not_applicable(NotApplicable::TenantInactive);
        }

        let check = self.flood.check(msg.chat_id, sender.id, now, &config.antiflood);
        let verdict = if check.within_limit {
            let words = if filters::needs_words(&config, msg) {
                self.store.filter_words(msg.chat_id).await.unwrap_or_else(|e| {
                    warn!("Word filter skipped for chat {}: {}", msg.chat_id, e);
                    Default::default()
                })
            } else {
                Default::default()
            };
            filters::evaluate(&config, msg, &words)
        } else {
            debug!("Flood trip by user {} in chat {} after {} messages", sender.id, msg.chat_id, check.count);
            ModerationVerdict::DeleteAndMute(Duration::from_secs(config.antiflood.mute_secs))
        };

        match verdict {
            ModerationVerdict::Allow => Decision::none(Outcome::Allowed),
            ModerationVerdict::Skip => Decision::none(Outcome::Skipped),
            ModerationVerdict::DeleteAndWarn(violation) => self.warn_decision(&config, msg, sender, violation).await,
            ModerationVerdict::DeleteSilently(violation) => {
                let actions = vec![
                    delete(msg),
                    ModerationAction::AppendLog(LogEntry::automatic(
                        msg.chat_id,
                        sender.id,
                        LogAction::Filter,
                        violation.reason(),
                    )),
                ];
                Decision {
                    outcome: Outcome::Deleted { violation },
                    actions,
                }
            }
            ModerationVerdict::DeleteAndMute(mute) => self.flood_decision(&config, msg, sender, mute),
        }
    }

    /// Entry guards. Returns the sender when moderation applies.
    async fn guard<'a>(&self, msg: &'a InboundMessage, now: Instant) -> Result<&'a Sender, NotApplicable> {
        if !msg.chat_kind.is_group() {
            return Err(NotApplicable::NotGroup);
        }
        let sender = msg.sender.as_ref().ok_or(NotApplicable::NoSender)?;
        if self.admins.is_exempt_at(msg.chat_id, sender, now).await {
            return Err(NotApplicable::ExemptSender);
        }
        Ok(sender)
    }

    fn flood_decision(&self, config: &TenantConfig, msg: &InboundMessage, sender: &Sender, mute: Duration) -> Decision {
        info!("Muting user {} in chat {} for flooding", sender.id, msg.chat_id);

        let secs = mute.as_secs();
        let notice = get_text_with(&config.language, "moderation.flood_muted", &[
            ("mention", &mention_html(sender.id, &sender.display_name)),
            ("duration", &format_duration(&config.language, secs)),
        ]);

        Decision {
            outcome: Outcome::Flooded { mute },
            actions: vec![
                delete(msg),
                ModerationAction::MuteFor {
                    chat_id: msg.chat_id,
                    user_id: sender.id,
                    duration: mute,
                },
                ModerationAction::AppendLog(
                    LogEntry::automatic(msg.chat_id, sender.id, LogAction::AutoMute, "flood").with_duration(secs),
                ),
                send(msg.chat_id, notice),
            ],
        }
    }

    async fn warn_decision(
        &self,
        config: &TenantConfig,
        msg: &InboundMessage,
        sender: &Sender,
        violation: Violation,
    ) -> Decision {
        let reason = violation.reason();
        let transition = self
            .warnings
            .record_violation(msg.chat_id, sender.id, &reason, config.max_warnings)
            .await;

        let transition = match transition {
            Ok(transition) => transition,
            Err(e) => {
                error!(
                    "Failed to record warning for user {} in chat {}: {}",
                    sender.id, msg.chat_id, e
                );
                return Decision {
                    outcome: Outcome::WarningNotRecorded { violation },
                    actions: vec![delete(msg)],
                };
            }
        };

        let lang = &config.language;
        let mention = mention_html(sender.id, &sender.display_name);

        match transition {
            WarningTransition::Warned { count, max } => {
                debug!("Warned user {} in chat {} ({}/{})", sender.id, msg.chat_id, count, max);
                let notice = get_text_with(lang, "moderation.warned", &[
                    ("mention", &mention),
                    ("reason", &reason_label(lang, &violation)),
                    ("count", &count.to_string()),
                    ("max", &max.to_string()),
                ]);
                Decision {
                    actions: vec![
                        delete(msg),
                        ModerationAction::AppendLog(LogEntry::automatic(
                            msg.chat_id,
                            sender.id,
                            LogAction::Warn,
                            reason,
                        )),
                        send(msg.chat_id, notice),
                    ],
                    outcome: Outcome::Warned { violation, count, max },
                }
            }
            WarningTransition::LimitReached { count, max } => {
                info!("Kicking user {} from chat {} at {}/{} warnings", sender.id, msg.chat_id, count, max);
                let notice = get_text_with(lang, "moderation.kicked", &[
                    ("mention", &mention),
                    ("max", &max.to_string()),
                ]);
                Decision {
                    actions: vec![
                        delete(msg),
                        ModerationAction::Kick {
                            chat_id: msg.chat_id,
                            user_id: sender.id,
                        },
                        ModerationAction::AppendLog(LogEntry::automatic(
                            msg.chat_id,
                            sender.id,
                            LogAction::AutoKick,
                            format!("{} ({}/{} warnings)", reason, count, max),
                        )),
                        send(msg.chat_id, notice),
                    ],
                    outcome: Outcome::Kicked { violation, max },
                }
            }
        }
    }

    /// Perform a decision's actions in order.
    ///
    /// A failed action does not stop the rest. A kick whose unban step failed
    /// is reported on the `stuck_ban` log target and recorded in the
    /// moderation log.
    pub async fn apply(&self, executor: &dyn ActionExecutor, actions: &[ModerationAction]) -> Applied {
        let mut applied = Applied::default();

        for action in actions {
            let result = match action {
                ModerationAction::AppendLog(entry) => self.store.append_log(entry).await.map_err(|e| e.to_string()),
                _ => match executor.execute(action).await {
                    Ok(()) => Ok(()),
                    Err(e) if e.is_stuck_ban() => {
                        applied.stuck_bans += 1;
                        self.report_stuck_ban(action, &e.to_string()).await;
                        Err(e.to_string())
                    }
                    Err(e) => Err(e.to_string()),
                },
            };

            match result {
                Ok(()) => applied.executed += 1,
                Err(e) => {
                    applied.failed += 1;
                    warn!("Action {} failed: {}", action.name(), e);
                }
            }
        }

        applied
    }

    async fn report_stuck_ban(&self, action: &ModerationAction, reason: &str) {
        let ModerationAction::Kick { chat_id, user_id } = *action else {
            return;
        };

        error!(
            target: "stuck_ban",
            chat_id,
            user_id,
            "User left banned after failed unban: {}",
            reason
        );

        let entry = LogEntry::automatic(chat_id, user_id, LogAction::StuckBan, reason);
        if let Err(e) = self.store.append_log(&entry).await {
            error!("Failed to record stuck ban for user {} in chat {}: {}", user_id, chat_id, e);
        }
    }

    /// Drop idle flood windows and unused warning locks.
    pub fn sweep(&self, now: Instant, idle: Duration) -> (usize, usize) {
        (self.flood.prune_idle(now, idle), self.warnings.prune_idle_locks())
    }
}

fn delete(msg: &InboundMessage) -> ModerationAction {
    ModerationAction::DeleteMessage {
        chat_id: msg.chat_id,
        message_id: msg.message_id,
    }
}

fn send(chat_id: i64, text: String) -> ModerationAction {
    ModerationAction::SendMessage { chat_id, text }
}

/// Localized, HTML-safe description of what was not allowed.
fn reason_label(lang: &str, violation: &Violation) -> String {
    match violation {
        Violation::Link => get_text_with(lang, "reason.link", &[]),
        Violation::File { extension } => get_text_with(lang, "reason.file", &[("ext", &html_escape(extension))]),
        Violation::Media(kind) => get_text_with(lang, &format!("reason.media.{}", kind.as_str()), &[]),
        Violation::Word { .. } => get_text_with(lang, "reason.word", &[]),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::cache::CacheRegistry;
    use crate::moderation::memory::{CountingLookup, MemoryStore, RecordingExecutor};
    use crate::moderation::message::{ChatKind, EntityKind, ForwardOrigin, MediaKind};
    use crate::moderation::model::MemberStatus;
    use crate::permissions::DEFAULT_ADMIN_TTL;

    const CHAT: i64 = -100;
    const USER: u64 = 42;
    const ADMIN: u64 = 1;

    struct Harness {
        store: Arc<MemoryStore>,
        lookup: Arc<CountingLookup>,
        pipeline: ModerationPipeline,
    }

    fn harness_with(store: MemoryStore) -> Harness {
        let store = Arc::new(store);
        let lookup = Arc::new(CountingLookup::new().with_status(CHAT, ADMIN, MemberStatus::Administrator));
        let admins = AdminStatusCache::new(lookup.clone(), &CacheRegistry::new(), vec![], DEFAULT_ADMIN_TTL);
        let pipeline = ModerationPipeline::new(store.clone(), admins, TenantDefaults::default());
        Harness { store, lookup, pipeline }
    }

    fn harness() -> Harness {
        harness_with(MemoryStore::new())
    }

    fn msg(id: i32, text: &str) -> InboundMessage {
        InboundMessage::text(CHAT, id, Sender::user(USER, "Bob"), text)
    }

    fn deleted_ids(actions: &[ModerationAction]) -> Vec<i32> {
        actions
            .iter()
            .filter_map(|a| match a {
                ModerationAction::DeleteMessage { message_id, .. } => Some(*message_id),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_exempt_sender_is_never_moderated() {
        let h = harness();
        let now = Instant::now();
        let admin = Sender::user(ADMIN, "Alice");

        for i in 0..10 {
            let spam = InboundMessage::text(CHAT, i, admin.clone(), "https://spam.example")
                .with_entities(vec![EntityKind::Url]);
            let decision = h.pipeline.handle_message_at(&spam, now).await;
            assert_eq!(decision.outcome, Outcome::NotApplicable(NotApplicable::ExemptSender));
            assert!(decision.actions.is_empty());
        }

        assert_eq!(h.pipeline.flood().window_len(CHAT, ADMIN), 0);
        assert_eq!(h.store.warning_count(CHAT, ADMIN).await.unwrap(), 0);
        assert_eq!(h.lookup.calls(), 1);
    }

    #[tokio::test]
    async fn test_linked_channel_forward_is_skipped() {
        let h = harness();
        let post = msg(1, "https://channel.example")
            .with_entities(vec![EntityKind::Url])
            .with_media(MediaKind::Photo)
            .with_forward_origin(ForwardOrigin::LinkedChannel);

        let decision = h.pipeline.handle_message(&post).await;

        assert_eq!(decision.outcome, Outcome::Skipped);
        assert!(decision.actions.is_empty());
    }

    #[tokio::test]
    async fn test_link_warns_with_persistent_notice() {
        let h = harness();
        let decision = h.pipeline.handle_message(&msg(7, "visit https://spam.example")).await;

        assert_eq!(
            decision.outcome,
            Outcome::Warned {
                violation: Violation::Link,
                count: 1,
                max: 3
            }
        );
        assert_eq!(deleted_ids(&decision.actions), vec![7]);
        assert!(matches!(
            decision.actions.last(),
            Some(ModerationAction::SendMessage { text, .. }) if text.contains("1/3")
        ));

        let executor = RecordingExecutor::new();
        let applied = h.pipeline.apply(&executor, &decision.actions).await;
        assert_eq!(applied.failed, 0);

        let deletes: Vec<_> = deleted_ids(&executor.executed());
        assert_eq!(deletes, vec![7]);
        assert_eq!(h.store.logs()[0].action, LogAction::Warn);
    }

    #[tokio::test]
    async fn test_bare_mention_warns_like_url() {
        let h = harness();

        let url = h.pipeline.handle_message(&msg(1, "https://example.com")).await;
        let mention = h.pipeline.handle_message(&msg(2, "@username")).await;

        assert!(matches!(url.outcome, Outcome::Warned { violation: Violation::Link, .. }));
        assert!(matches!(mention.outcome, Outcome::Warned { violation: Violation::Link, .. }));
    }

    #[tokio::test]
    async fn test_filtered_word_case_insensitive() {
        let h = harness_with(MemoryStore::new().with_word(CHAT, "manzil"));

        let decision = h.pipeline.handle_message(&msg(1, "Manzil bormi?")).await;

        assert!(matches!(
            decision.outcome,
            Outcome::Warned { violation: Violation::Word { .. }, count: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_third_violation_kicks_and_resets() {
        let h = harness();

        let mut last = None;
        for id in 1..=3 {
            last = Some(h.pipeline.handle_message(&msg(id, "t.me/spam")).await);
        }
        let last = last.unwrap();

        assert_eq!(
            last.outcome,
            Outcome::Kicked {
                violation: Violation::Link,
                max: 3
            }
        );
        assert!(last.actions.contains(&ModerationAction::Kick {
            chat_id: CHAT,
            user_id: USER
        }));
        assert_eq!(h.store.warning_count(CHAT, USER).await.unwrap(), 0);

        let next = h.pipeline.handle_message(&msg(4, "t.me/spam")).await;
        assert!(matches!(next.outcome, Outcome::Warned { count: 1, .. }));
    }

    #[tokio::test]
    async fn test_flood_mutes_without_warning() {
        let h = harness();
        let start = Instant::now();

        let mut decisions = Vec::new();
        for (i, ms) in [0u64, 1_800, 3_600, 5_400, 7_200, 9_000].into_iter().enumerate() {
            let at = start + Duration::from_millis(ms);
            decisions.push(h.pipeline.handle_message_at(&msg(i as i32, "hi"), at).await);
        }

        assert!(decisions[..5].iter().all(|d| d.outcome == Outcome::Allowed));
        let flooded = &decisions[5];
        assert_eq!(
            flooded.outcome,
            Outcome::Flooded {
                mute: Duration::from_secs(300)
            }
        );
        assert_eq!(deleted_ids(&flooded.actions), vec![5]);
        assert!(flooded.actions.contains(&ModerationAction::MuteFor {
            chat_id: CHAT,
            user_id: USER,
            duration: Duration::from_secs(300),
        }));
        assert_eq!(h.store.warning_count(CHAT, USER).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_flood_runs_before_filters() {
        let h = harness();
        let now = Instant::now();

        for i in 0..5 {
            h.pipeline.handle_message_at(&msg(i, "hello"), now).await;
        }
        let decision = h.pipeline.handle_message_at(&msg(5, "https://spam.example"), now).await;

        assert!(matches!(decision.outcome, Outcome::Flooded { .. }));
        assert_eq!(h.store.warning_count(CHAT, USER).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_admin_lookup_failure_moderates() {
        let h = harness();
        h.lookup.fail.store(true, Ordering::SeqCst);
        let admin_spam = InboundMessage::text(CHAT, 1, Sender::user(ADMIN, "Alice"), "https://x.example");

        let decision = h.pipeline.handle_message(&admin_spam).await;

        assert!(matches!(decision.outcome, Outcome::Warned { .. }));
    }

    #[tokio::test]
    async fn test_config_store_outage_uses_defaults() {
        let store = MemoryStore::new();
        store.fail_configs.store(true, Ordering::SeqCst);
        let h = harness_with(store);

        let decision = h.pipeline.handle_message(&msg(1, "www.spam.example")).await;

        assert!(matches!(decision.outcome, Outcome::Warned { .. }));
    }

    #[tokio::test]
    async fn test_warning_store_outage_only_deletes() {
        let store = MemoryStore::new();
        store.fail_warnings.store(true, Ordering::SeqCst);
        let h = harness_with(store);

        let decision = h.pipeline.handle_message(&msg(9, "https://spam.example")).await;

        assert_eq!(
            decision.outcome,
            Outcome::WarningNotRecorded {
                violation: Violation::Link
            }
        );
        assert_eq!(
            decision.actions,
            vec![ModerationAction::DeleteMessage {
                chat_id: CHAT,
                message_id: 9
            }]
        );
    }

    #[tokio::test]
    async fn test_silent_word_filter_deletes_and_logs() {
        let mut config = TenantConfig::new(CHAT, &TenantDefaults::default());
        config.word_filter.warn = false;
        let h = harness_with(MemoryStore::new().with_config(config).with_word(CHAT, "cheap"));

        let decision = h.pipeline.handle_message(&msg(3, "Cheap pills")).await;
        h.pipeline.apply(&RecordingExecutor::new(), &decision.actions).await;

        assert!(matches!(decision.outcome, Outcome::Deleted { .. }));
        assert_eq!(h.store.warning_count(CHAT, USER).await.unwrap(), 0);
        assert_eq!(h.store.logs()[0].action, LogAction::Filter);
    }

    #[tokio::test]
    async fn test_stuck_ban_is_reported() {
        let mut config = TenantConfig::new(CHAT, &TenantDefaults::default());
        config.max_warnings = 1;
        let h = harness_with(MemoryStore::new().with_config(config));
        let executor = RecordingExecutor::new();
        executor.fail_unban.store(true, Ordering::SeqCst);

        let decision = h.pipeline.handle_message(&msg(1, "https://spam.example")).await;
        let applied = h.pipeline.apply(&executor, &decision.actions).await;

        assert_eq!(applied.stuck_bans, 1);
        assert_eq!(applied.failed, 1);
        let actions: Vec<LogAction> = h.store.logs().iter().map(|e| e.action).collect();
        assert!(actions.contains(&LogAction::StuckBan));
        assert!(actions.contains(&LogAction::AutoKick));
        assert!(matches!(
            executor.executed().last(),
            Some(ModerationAction::SendMessage { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_delete_does_not_stop_notice() {
        let h = harness();
        let executor = RecordingExecutor::new();
        executor.fail_delete.store(true, Ordering::SeqCst);

        let decision = h.pipeline.handle_message(&msg(1, "https://spam.example")).await;
        let applied = h.pipeline.apply(&executor, &decision.actions).await;

        assert_eq!(applied.failed, 1);
        assert_eq!(applied.executed, 2);
        assert!(matches!(
            executor.executed().as_slice(),
            [ModerationAction::SendMessage { .. }]
        ));
    }

    #[tokio::test]
    async fn test_guards() {
        let h = harness();

        let mut private = msg(1, "https://x.example");
        private.chat_kind = ChatKind::Private;
        let mut no_sender = msg(2, "https://x.example");
        no_sender.sender = None;

        assert_eq!(
            h.pipeline.handle_message(&private).await.outcome,
            Outcome::NotApplicable(NotApplicable::NotGroup)
        );
        assert_eq!(
            h.pipeline.handle_message(&no_sender).await.outcome,
            Outcome::NotApplicable(NotApplicable::NoSender)
        );
        assert_eq!(h.lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_slash_prefixed_text_is_moderated() {
        let h = harness();
        let now = Instant::now();
        let spam = |id| msg(id, "/x https://spam.example @spammer");

        let first = h.pipeline.handle_message_at(&spam(1), now).await;
        assert_eq!(
            first.outcome,
            Outcome::Warned {
                violation: Violation::Link,
                count: 1,
                max: 3
            }
        );
        assert_eq!(deleted_ids(&first.actions), vec![1]);

        let mut last = first;
        for id in 2..=6 {
            last = h.pipeline.handle_message_at(&spam(id), now).await;
        }

        assert_eq!(
            last.outcome,
            Outcome::Flooded {
                mute: Duration::from_secs(300)
            }
        );
        assert_eq!(deleted_ids(&last.actions), vec![6]);
    }

    #[tokio::test]
    async fn test_inactive_tenant() {
        let mut config = TenantConfig::new(CHAT, &TenantDefaults::default());
        config.is_active = false;
        let h = harness_with(MemoryStore::new().with_config(config));

        let decision = h.pipeline.handle_message(&msg(1, "https://x.example")).await;

        assert_eq!(decision.outcome, Outcome::NotApplicable(NotApplicable::TenantInactive));
    }

    #[tokio::test]
    async fn test_notice_in_tenant_language() {
        let mut config = TenantConfig::new(CHAT, &TenantDefaults::default());
        config.language = "uz".to_string();
        let h = harness_with(MemoryStore::new().with_config(config));

        let decision = h.pipeline.handle_message(&msg(1, "").with_media(MediaKind::Sticker)).await;

        assert!(matches!(
            decision.actions.last(),
            Some(ModerationAction::SendMessage { text, .. }) if text.contains("stikerlar")
        ));
    }
}
