//! Admin commands.
//!
//! Every command is group-only and admin-only; the guard lives in
//! [`admin_context`].

pub mod filters;
pub mod settings;
pub mod warn;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{ParseMode, ReplyParameters, User};
use teloxide::utils::command::BotCommands;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::events;
use crate::i18n::get_text;
use crate::moderation::Outcome;

/// All bot commands.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Moderation commands:")]
pub enum Command {
    #[command(description = "Show this list (admins)")]
    Help,

    // Word filter
    #[command(description = "Add a filtered word")]
    Filter(String),

    #[command(description = "Remove a filtered word")]
    Unfilter(String),

    #[command(description = "List filtered words")]
    Filters,

    // Warnings (reply to a user)
    #[command(description = "Show a user's warnings")]
    Warns,

    #[command(description = "Remove one warning")]
    Unwarn,

    #[command(description = "Reset a user's warnings")]
    Resetwarns,

    // Settings
    #[command(description = "Show moderation settings")]
    Settings,

    #[command(description = "Change a setting: /set key value")]
    Set(String),
}

/// Build the combined command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    teloxide::filter_command::<Command, _>()
        .branch(case![Command::Help].endpoint(help_command))
        .branch(case![Command::Filter(word)].endpoint(filters::filter_command))
        .branch(case![Command::Unfilter(word)].endpoint(filters::unfilter_command))
        .branch(case![Command::Filters].endpoint(filters::filters_command))
        .branch(case![Command::Warns].endpoint(warn::warns_command))
        .branch(case![Command::Unwarn].endpoint(warn::unwarn_command))
        .branch(case![Command::Resetwarns].endpoint(warn::resetwarns_command))
        .branch(case![Command::Settings].endpoint(settings::settings_command))
        .branch(case![Command::Set(args)].endpoint(settings::set_command))
}

async fn help_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    if admin_context(&bot, &msg, &state).await?.is_none() {
        return Ok(());
    }

    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}

/// Who is running an admin command, and where.
pub struct AdminContext {
    pub chat_id: i64,
    pub admin_id: u64,
    pub lang: String,
}

/// Group-only and admin-only guard. Replies with the reason and returns
/// `None` when the command does not apply.
pub async fn admin_context(bot: &ThrottledBot, msg: &Message, state: &AppState) -> anyhow::Result<Option<AdminContext>> {
    let chat_id = msg.chat.id.0;

    if !msg.chat.is_group() && !msg.chat.is_supergroup() {
        reply(bot, msg, get_text(crate::i18n::FALLBACK_LANG, "common.group_only")).await?;
        return Ok(None);
    }

    let lang = state.pipeline.tenant_config(chat_id).await.language;

    let Some(user) = msg.from.as_ref() else {
        return Ok(None);
    };

    let sender = events::classify(msg).sender;
    let anonymous = sender.as_ref().is_some_and(|s| s.anonymous_admin);

    if !anonymous && !state.pipeline.admins().is_admin(chat_id, user.id.0).await {
        // A command from a regular member is still an ordinary message.
        if events::moderate(msg, state).await? == Outcome::Allowed {
            reply(bot, msg, get_text(&lang, "common.admin_only")).await?;
        }
        return Ok(None);
    }

    Ok(Some(AdminContext {
        chat_id,
        admin_id: user.id.0,
        lang,
    }))
}

/// Author of the replied-to message.
pub fn reply_target(msg: &Message) -> Option<&User> {
    msg.reply_to_message()?.from.as_ref()
}

/// Reply to the command message with HTML text.
pub async fn reply(bot: &ThrottledBot, msg: &Message, text: String) -> anyhow::Result<()> {
    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}
