//! Word filter commands: /filter, /unfilter, /filters.

use teloxide::prelude::*;
use tracing::{info, warn};

use super::{admin_context, reply};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::{get_text, get_text_with};
use crate::moderation::filters::normalize_word;
use crate::utils::html_escape;

/// Handle /filter <word>.
pub async fn filter_command(bot: ThrottledBot, msg: Message, state: AppState, word: String) -> anyhow::Result<()> {
    let Some(ctx) = admin_context(&bot, &msg, &state).await? else {
        return Ok(());
    };

    let word = normalize_word(&word);
    if word.is_empty() {
        return reply(&bot, &msg, get_text(&ctx.lang, "filter.usage")).await;
    }

    let shown = html_escape(&word);
    let text = match state.pipeline.store().add_filter_word(ctx.chat_id, &word, ctx.admin_id).await {
        Ok(true) => {
            info!("Admin {} added filter word in chat {}", ctx.admin_id, ctx.chat_id);
            get_text_with(&ctx.lang, "filter.added", &[("word", &shown)])
        }
        Ok(false) => get_text_with(&ctx.lang, "filter.exists", &[("word", &shown)]),
        Err(e) => {
            warn!("Failed to add filter word in chat {}: {}", ctx.chat_id, e);
            get_text(&ctx.lang, "common.store_error")
        }
    };

    reply(&bot, &msg, text).await
}

/// Handle /unfilter <word>.
pub async fn unfilter_command(bot: ThrottledBot, msg: Message, state: AppState, word: String) -> anyhow::Result<()> {
    let Some(ctx) = admin_context(&bot, &msg, &state).await? else {
        return Ok(());
    };

    let word = normalize_word(&word);
    if word.is_empty() {
        return reply(&bot, &msg, get_text(&ctx.lang, "filter.unfilter_usage")).await;
    }

    let shown = html_escape(&word);
    let text = match state.pipeline.store().remove_filter_word(ctx.chat_id, &word).await {
        Ok(true) => get_text_with(&ctx.lang, "filter.removed", &[("word", &shown)]),
        Ok(false) => get_text_with(&ctx.lang, "filter.missing", &[("word", &shown)]),
        Err(e) => {
            warn!("Failed to remove filter word in chat {}: {}", ctx.chat_id, e);
            get_text(&ctx.lang, "common.store_error")
        }
    };

    reply(&bot, &msg, text).await
}

/// Handle /filters.
pub async fn filters_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(ctx) = admin_context(&bot, &msg, &state).await? else {
        return Ok(());
    };

    let words = match state.pipeline.store().filter_words(ctx.chat_id).await {
        Ok(words) => words,
        Err(e) => {
            warn!("Failed to list filter words in chat {}: {}", ctx.chat_id, e);
            return reply(&bot, &msg, get_text(&ctx.lang, "common.store_error")).await;
        }
    };

    if words.is_empty() {
        return reply(&bot, &msg, get_text(&ctx.lang, "filter.empty")).await;
    }

    let mut words: Vec<String> = words.into_iter().collect();
    words.sort();

    let mut text = get_text_with(&ctx.lang, "filter.list_header", &[("count", &words.len().to_string())]);
    for word in &words {
        text.push_str(&format!("\n• <code>{}</code>", html_escape(word)));
    }

    reply(&bot, &msg, text).await
}
