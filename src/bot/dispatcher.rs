//! Message dispatcher setup.
//!
//! Builds the dispatcher with the command, moderation and member handlers.

use std::sync::Arc;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use super::transport::TelegramTransport;
use crate::events;
use crate::moderation::ModerationPipeline;
use crate::plugins;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Moderation core: store, admin cache, flood windows, warnings.
    pub pipeline: ModerationPipeline,

    /// Executes moderation actions against Telegram.
    pub transport: Arc<TelegramTransport>,
}

impl AppState {
    pub fn new(pipeline: ModerationPipeline, transport: Arc<TelegramTransport>) -> Self {
        Self { pipeline, transport }
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(
    bot: ThrottledBot,
    state: AppState,
) -> Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    use teloxide::dispatching::UpdateFilterExt;

    // Commands first; everything else goes through moderation.
    let message_handler = Update::filter_message()
        .branch(plugins::command_handler())
        .branch(events::message_event_handler());

    let member_handler = Update::filter_chat_member().branch(events::member_event_handler());

    dptree::entry().branch(message_handler).branch(member_handler)
}
