//! Event handlers: group message moderation and member status updates.

pub mod classify;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::ChatMemberUpdated;
use tracing::debug;

use crate::bot::dispatcher::AppState;
use crate::moderation::Outcome;

pub use classify::classify;

/// Run every group message through the moderation pipeline.
pub fn message_event_handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(|msg: Message| msg.chat.is_group() || msg.chat.is_supergroup()).endpoint(moderate_message)
}

async fn moderate_message(msg: Message, state: AppState) -> anyhow::Result<()> {
    moderate(&msg, &state).await?;
    Ok(())
}

/// Run one message through the pipeline and perform the resulting actions.
pub async fn moderate(msg: &Message, state: &AppState) -> anyhow::Result<Outcome> {
    let inbound = classify(msg);
    let decision = state.pipeline.handle_message(&inbound).await;

    debug!(
        "Message {} in chat {}: {:?}",
        inbound.message_id, inbound.chat_id, decision.outcome
    );

    if decision.actions.is_empty() {
        return Ok(decision.outcome);
    }

    let applied = state.pipeline.apply(state.transport.as_ref(), &decision.actions).await;
    if applied.failed > 0 || applied.stuck_bans > 0 {
        debug!(
            "Message {} in chat {}: {} actions done, {} failed, {} stuck bans",
            inbound.message_id, inbound.chat_id, applied.executed, applied.failed, applied.stuck_bans
        );
    }

    Ok(decision.outcome)
}

/// Keep the admin cache in step with promotions, demotions and departures.
pub fn member_event_handler() -> UpdateHandler<anyhow::Error> {
    dptree::endpoint(refresh_admin_status)
}

async fn refresh_admin_status(update: ChatMemberUpdated, state: AppState) -> anyhow::Result<()> {
    let was_admin = update.old_chat_member.is_privileged();
    let is_admin = update.new_chat_member.is_privileged();

    if was_admin != is_admin {
        let user_id = update.new_chat_member.user.id.0;
        state.pipeline.admins().invalidate(update.chat.id.0, user_id);
        debug!(
            "Admin status of user {} in chat {} changed ({} -> {})",
            user_id, update.chat.id, was_admin, is_admin
        );
    }

    Ok(())
}
