//! Groupwarden - multi-tenant Telegram group moderation bot
//!
//! Every group message passes through one pipeline: admin exemption,
//! flood detection, the content filter chain and the warning state machine.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `moderation` - Transport-neutral moderation core
//! - `permissions` - Admin status cache (fail-closed)
//! - `database` - MongoDB-backed store
//! - `cache` - Moka-based caches
//! - `bot` - Telegram transport, dispatcher and runtime
//! - `plugins` - Admin commands
//! - `events` - Message and member update handlers
//! - `i18n` - Notice translations
//! - `utils` - Formatting and argument parsing

mod bot;
mod cache;
mod config;
mod database;
mod events;
mod i18n;
mod moderation;
mod permissions;
mod plugins;
mod utils;

use std::sync::Arc;
use std::time::{Duration, Instant};

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bot::{AppState, TelegramTransport};
use cache::CacheRegistry;
use config::Config;
use database::{Database, MongoStore};
use moderation::ModerationPipeline;
use permissions::AdminStatusCache;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// How often idle flood windows and warning locks are dropped.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("groupwarden=info,teloxide=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting Groupwarden...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");
    info!("Bot mode: {:?}", config.bot_mode);

    info!("Connecting to MongoDB...");
    let db = Database::connect(&config.mongodb_uri, &config.mongodb_database).await?;
    db.ensure_indexes().await?;
    info!("Database connected");

    let cache = Arc::new(CacheRegistry::new());

    // Throttle respects Telegram's per-chat and global rate limits
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());

    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    if config.global_admin_ids.is_empty() {
        info!("No global admins configured (GLOBAL_ADMIN_IDS is empty)");
    } else {
        info!("Global admins: {:?}", config.global_admin_ids);
    }

    let defaults = config.tenant_defaults();
    let transport = Arc::new(TelegramTransport::new(bot.clone()));
    let admins = AdminStatusCache::new(
        transport.clone(),
        &cache,
        config.global_admin_ids.iter().copied(),
        config.admin_cache_ttl,
    );
    let store = Arc::new(MongoStore::new(&db, &cache, defaults.clone()));
    let pipeline = ModerationPipeline::new(store, admins, defaults);

    spawn_sweeper(pipeline.clone());

    let state = AppState::new(pipeline, transport);
    let dispatcher = bot::build_dispatcher(bot.clone(), state);

    bot::run(&config, bot, dispatcher).await
}

/// Periodically drop flood windows and warning locks nobody has used lately.
fn spawn_sweeper(pipeline: ModerationPipeline) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let (windows, locks) = pipeline.sweep(Instant::now(), SWEEP_INTERVAL);
            if windows > 0 || locks > 0 {
                debug!("Swept {} flood windows and {} warning locks", windows, locks);
            }
        }
    });
}
