//! Warning commands: /warns, /unwarn, /resetwarns (reply to a user).

use teloxide::prelude::*;
use teloxide::types::User;
use tracing::{info, warn};

use super::{admin_context, reply, reply_target, AdminContext};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::{get_text, get_text_with};
use crate::utils::mention_html;

/// Resolve the guard and the replied-to user.
async fn prepare<'a>(
    bot: &ThrottledBot,
    msg: &'a Message,
    state: &AppState,
) -> anyhow::Result<Option<(AdminContext, &'a User)>> {
    let Some(ctx) = admin_context(bot, msg, state).await? else {
        return Ok(None);
    };

    match reply_target(msg) {
        Some(user) => Ok(Some((ctx, user))),
        None => {
            reply(bot, msg, get_text(&ctx.lang, "common.reply_required")).await?;
            Ok(None)
        }
    }
}

/// Handle /warns.
pub async fn warns_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some((ctx, user)) = prepare(&bot, &msg, &state).await? else {
        return Ok(());
    };

    let max = state.pipeline.tenant_config(ctx.chat_id).await.max_warnings;
    let text = match state.pipeline.warnings().count(ctx.chat_id, user.id.0).await {
        Ok(count) => get_text_with(&ctx.lang, "warns.count", &[
            ("mention", &mention_html(user.id.0, &user.full_name())),
            ("count", &count.to_string()),
            ("max", &max.to_string()),
        ]),
        Err(e) => {
            warn!("Failed to read warnings in chat {}: {}", ctx.chat_id, e);
            get_text(&ctx.lang, "common.store_error")
        }
    };

    reply(&bot, &msg, text).await
}

/// Handle /unwarn.
pub async fn unwarn_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some((ctx, user)) = prepare(&bot, &msg, &state).await? else {
        return Ok(());
    };

    let max = state.pipeline.tenant_config(ctx.chat_id).await.max_warnings;
    let text = match state.pipeline.warnings().remove_one(ctx.chat_id, user.id.0, ctx.admin_id).await {
        Ok(count) => {
            info!("Admin {} removed a warning from user {} in chat {}", ctx.admin_id, user.id, ctx.chat_id);
            get_text_with(&ctx.lang, "warns.removed", &[
                ("mention", &mention_html(user.id.0, &user.full_name())),
                ("count", &count.to_string()),
                ("max", &max.to_string()),
            ])
        }
        Err(e) => {
            warn!("Failed to remove warning in chat {}: {}", ctx.chat_id, e);
            get_text(&ctx.lang, "common.store_error")
        }
    };

    reply(&bot, &msg, text).await
}

/// Handle /resetwarns.
pub async fn resetwarns_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some((ctx, user)) = prepare(&bot, &msg, &state).await? else {
        return Ok(());
    };

    let text = match state.pipeline.warnings().reset(ctx.chat_id, user.id.0, ctx.admin_id).await {
        Ok(()) => {
            info!("Admin {} reset warnings of user {} in chat {}", ctx.admin_id, user.id, ctx.chat_id);
            get_text_with(&ctx.lang, "warns.reset", &[("mention", &mention_html(user.id.0, &user.full_name()))])
        }
        Err(e) => {
            warn!("Failed to reset warnings in chat {}: {}", ctx.chat_id, e);
            get_text(&ctx.lang, "common.store_error")
        }
    };

    reply(&bot, &msg, text).await
}
