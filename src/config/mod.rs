//! Configuration module.
//!
//! Loads configuration from environment variables (and `.env` via dotenvy).

use std::env;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::moderation::TenantDefaults;
use crate::permissions::DEFAULT_ADMIN_TTL;

/// Bot running mode
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<String>,
    pub webhook_port: u16,
    pub webhook_secret: Option<String>,

    /// Users exempt from moderation in every chat (comma-separated ids).
    pub global_admin_ids: Vec<u64>,

    // MongoDB
    pub mongodb_uri: String,
    pub mongodb_database: String,

    // Moderation defaults for new tenants
    pub default_max_warnings: u32,
    pub flood_limit: u32,
    pub flood_time_secs: u32,
    pub flood_mute_secs: u64,
    pub default_language: String,

    pub admin_cache_ttl: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &'static str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        let bot_mode = match var("BOT_MODE").map(|m| m.to_lowercase()).as_deref() {
            None | Some("polling") => BotMode::Polling,
            Some("webhook") => BotMode::Webhook,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "BOT_MODE",
                    value: other.to_string(),
                    reason: "expected polling or webhook",
                });
            }
        };

        let webhook_url = var("WEBHOOK_URL");
        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            return Err(ConfigError::Missing("WEBHOOK_URL"));
        }

        let global_admin_ids = match var("GLOBAL_ADMIN_IDS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<u64>().map_err(|_| ConfigError::Invalid {
                        name: "GLOBAL_ADMIN_IDS",
                        value: s.to_string(),
                        reason: "expected comma-separated user ids",
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        let default_language = var("DEFAULT_LANGUAGE").unwrap_or_else(|| "en".to_string());
        if !crate::i18n::is_supported(&default_language) {
            return Err(ConfigError::Invalid {
                name: "DEFAULT_LANGUAGE",
                value: default_language,
                reason: "no translations for this language",
            });
        }

        Ok(Self {
            bot_token: required("BOT_TOKEN")?,
            bot_mode,
            webhook_url,
            webhook_port: parse_number(&var, "WEBHOOK_PORT", 8443)?,
            webhook_secret: var("WEBHOOK_SECRET"),
            global_admin_ids,
            mongodb_uri: required("MONGODB_URI")?,
            mongodb_database: var("MONGODB_DATABASE").unwrap_or_else(|| "groupwarden".to_string()),
            default_max_warnings: parse_number(&var, "DEFAULT_MAX_WARNINGS", 3)?,
            flood_limit: parse_number(&var, "FLOOD_LIMIT", 5)?,
            flood_time_secs: parse_number(&var, "FLOOD_TIME", 10)?,
            flood_mute_secs: parse_number(&var, "FLOOD_MUTE_SECS", 300)?,
            default_language,
            admin_cache_ttl: Duration::from_secs(parse_number(&var, "ADMIN_CACHE_TTL_SECS", DEFAULT_ADMIN_TTL.as_secs())?),
        })
    }

    /// Defaults applied to tenants created lazily.
    pub fn tenant_defaults(&self) -> TenantDefaults {
        TenantDefaults {
            max_warnings: self.default_max_warnings,
            flood_limit: self.flood_limit,
            flood_window_secs: self.flood_time_secs,
            flood_mute_secs: self.flood_mute_secs,
            language: self.default_language.clone(),
        }
    }
}

/// Parse a positive number, falling back to `default` when unset.
fn parse_number<T>(var: &impl Fn(&'static str) -> Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = var(name) else {
        return Ok(default);
    };
    match raw.parse::<T>() {
        Ok(n) if n > T::default() => Ok(n),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw,
            reason: "expected a positive integer",
        }),
    }
}
