//! Telegram side of the moderation core.
//!
//! Resolves member statuses and executes moderation actions through the
//! throttled bot. Network failures are retried once; API errors are not.

use std::future::IntoFuture;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use teloxide::prelude::*;
use teloxide::types::{ChatMemberKind, ChatPermissions, MessageId, ParseMode};
use teloxide::RequestError;
use tracing::{debug, warn};

use super::dispatcher::ThrottledBot;
use crate::moderation::{ActionExecutor, AdminLookup, MemberStatus, ModerationAction, TransportError, MAX_MUTE_SECS};

/// Telegram treats restrictions shorter than this as permanent.
const MIN_RESTRICT_SECS: u64 = 30;

#[derive(Clone)]
pub struct TelegramTransport {
    bot: ThrottledBot,
}

impl TelegramTransport {
    pub fn new(bot: ThrottledBot) -> Self {
        Self { bot }
    }

    async fn kick(&self, chat_id: i64, user_id: u64) -> Result<(), TransportError> {
        let (chat, user) = (ChatId(chat_id), UserId(user_id));

        with_retry("ban_chat_member", || self.bot.ban_chat_member(chat, user))
            .await
            .map_err(|e| TransportError::BanFailed {
                chat_id,
                user_id,
                reason: e.to_string(),
            })?;

        with_retry("unban_chat_member", || self.bot.unban_chat_member(chat, user))
            .await
            .map_err(|e| TransportError::StuckBan {
                chat_id,
                user_id,
                reason: e.to_string(),
            })?;

        debug!("Kicked user {} from chat {}", user_id, chat_id);
        Ok(())
    }
}

#[async_trait]
impl AdminLookup for TelegramTransport {
    async fn member_status(&self, chat_id: i64, user_id: u64) -> Result<MemberStatus, TransportError> {
        let member = with_retry("get_chat_member", || {
            self.bot.get_chat_member(ChatId(chat_id), UserId(user_id))
        })
        .await
        .map_err(request_error)?;

        Ok(member_status(&member.kind))
    }
}

fn member_status(kind: &ChatMemberKind) -> MemberStatus {
    if kind.is_owner() {
        MemberStatus::Owner
    } else if kind.is_administrator() {
        MemberStatus::Administrator
    } else if kind.is_banned() {
        MemberStatus::Banned
    } else if kind.is_left() {
        MemberStatus::Left
    } else if kind.is_restricted() {
        MemberStatus::Restricted
    } else {
        MemberStatus::Member
    }
}

#[async_trait]
impl ActionExecutor for TelegramTransport {
    async fn execute(&self, action: &ModerationAction) -> Result<(), TransportError> {
        match action {
            ModerationAction::DeleteMessage { chat_id, message_id } => {
                with_retry("delete_message", || {
                    self.bot.delete_message(ChatId(*chat_id), MessageId(*message_id))
                })
                .await
                .map_err(request_error)?;
            }
            ModerationAction::Kick { chat_id, user_id } => {
                self.kick(*chat_id, *user_id).await?;
            }
            ModerationAction::MuteFor {
                chat_id,
                user_id,
                duration,
            } => {
                let until = restrict_until(chrono::Utc::now(), *duration)?;

                with_retry("restrict_chat_member", || {
                    self.bot
                        .restrict_chat_member(ChatId(*chat_id), UserId(*user_id), ChatPermissions::empty())
                        .until_date(until)
                })
                .await
                .map_err(request_error)?;
            }
            ModerationAction::SendMessage { chat_id, text } => {
                with_retry("send_message", || {
                    self.bot
                        .send_message(ChatId(*chat_id), text.clone())
                        .parse_mode(ParseMode::Html)
                })
                .await
                .map_err(request_error)?;
            }
            ModerationAction::AppendLog(_) => {
                // Log entries belong to the store.
                warn!("Log entry passed to the Telegram transport, ignoring");
            }
        }
        Ok(())
    }
}

/// End of a restriction starting at `now`, clamped to what Telegram accepts.
fn restrict_until(now: DateTime<Utc>, duration: Duration) -> Result<DateTime<Utc>, TransportError> {
    let secs = duration.as_secs().clamp(MIN_RESTRICT_SECS, MAX_MUTE_SECS);
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| TransportError::Request(format!("mute of {}s is out of range", secs)))
}

fn request_error(e: RequestError) -> TransportError {
    TransportError::Request(e.to_string())
}

fn is_transient(e: &RequestError) -> bool {
    matches!(e, RequestError::Network(_) | RequestError::Io(_))
}

/// Send a request, retrying once on a network failure.
async fn with_retry<T, F, R>(op: &'static str, mut request: F) -> Result<T, RequestError>
where
    F: FnMut() -> R,
    R: IntoFuture<Output = Result<T, RequestError>>,
{
    match request().await {
        Err(e) if is_transient(&e) => {
            warn!("{} failed ({}), retrying once", op, e);
            request().await
        }
        other => other,
    }
}
