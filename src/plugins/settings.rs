//! Tenant settings: /settings and /set.

use teloxide::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use super::{admin_context, reply};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::{self, get_text, get_text_with};
use crate::moderation::{TenantConfig, MAX_MUTE_SECS};
use crate::utils::{format_duration, html_escape, parse_duration, parse_positive, parse_switch};

/// Why a `/set` could not be applied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingError {
    #[error("unknown setting {0}")]
    UnknownKey(String),

    #[error("invalid value {value} for {key}")]
    InvalidValue { key: String, value: String },
}

/// Apply `key = value` to a config. Returns the value as it will be shown.
pub fn apply_setting(config: &mut TenantConfig, key: &str, value: &str) -> Result<String, SettingError> {
    let key = key.to_lowercase();
    let invalid = || SettingError::InvalidValue {
        key: key.clone(),
        value: value.to_string(),
    };

    let switch = match key.as_str() {
        "flood" => Some(&mut config.antiflood.enabled),
        "links" => Some(&mut config.antilink_enabled),
        "files" => Some(&mut config.antifile_enabled),
        "words" => Some(&mut config.word_filter.enabled),
        "wordwarn" => Some(&mut config.word_filter.warn),
        "photo" => Some(&mut config.media.photo),
        "video" => Some(&mut config.media.video),
        "audio" => Some(&mut config.media.audio),
        "voice" => Some(&mut config.media.voice),
        "sticker" => Some(&mut config.media.sticker),
        "animation" => Some(&mut config.media.animation),
        "videonote" => Some(&mut config.media.video_note),
        _ => None,
    };

    if let Some(flag) = switch {
        let on = parse_switch(value).ok_or_else(invalid)?;
        *flag = on;
        return Ok(if on { "on" } else { "off" }.to_string());
    }

    match key.as_str() {
        "maxwarns" => {
            config.max_warnings = parse_positive(value).ok_or_else(invalid)?;
            Ok(config.max_warnings.to_string())
        }
        "floodlimit" => {
            config.antiflood.max_messages = parse_positive(value).ok_or_else(invalid)?;
            Ok(config.antiflood.max_messages.to_string())
        }
        "floodtime" => {
            let secs = parse_duration(value).ok_or_else(invalid)?.as_secs();
            config.antiflood.window_secs = u32::try_from(secs).map_err(|_| invalid())?;
            Ok(format!("{}s", secs))
        }
        "mutetime" => {
            let secs = parse_duration(value)
                .map(|d| d.as_secs())
                .filter(|secs| *secs <= MAX_MUTE_SECS)
                .ok_or_else(invalid)?;
            config.antiflood.mute_secs = secs;
            Ok(format!("{}s", secs))
        }
        "lang" => {
            let lang = value.to_lowercase();
            if !i18n::is_supported(&lang) {
                return Err(invalid());
            }
            config.language = lang.clone();
            Ok(lang)
        }
        _ => Err(SettingError::UnknownKey(key.clone())),
    }
}

/// Human-readable summary of a tenant config.
pub fn render_settings(config: &TenantConfig) -> String {
    let lang = config.language.as_str();
    let flag = |on: bool| get_text(lang, if on { "settings.on" } else { "settings.off" });

    let mut lines = vec![get_text(lang, "settings.header"), String::new()];
    lines.push(format!(
        "flood: {} ({} / {}, mute {})",
        flag(config.antiflood.enabled),
        config.antiflood.max_messages,
        format_duration(lang, u64::from(config.antiflood.window_secs)),
        format_duration(lang, config.antiflood.mute_secs)
    ));
    lines.push(format!("links: {}", flag(config.antilink_enabled)));
    lines.push(format!(
        "files: {} ({})",
        flag(config.antifile_enabled),
        html_escape(&config.blocked_extensions.join(", "))
    ));
    lines.push(format!(
        "words: {}, wordwarn: {}",
        flag(config.word_filter.enabled),
        flag(config.word_filter.warn)
    ));

    let media = &config.media;
    lines.push(format!(
        "photo: {}, video: {}, audio: {}, voice: {}",
        flag(media.photo),
        flag(media.video),
        flag(media.audio),
        flag(media.voice)
    ));
    lines.push(format!(
        "sticker: {}, animation: {}, videonote: {}",
        flag(media.sticker),
        flag(media.animation),
        flag(media.video_note)
    ));
    lines.push(format!("maxwarns: {}", config.max_warnings));
    lines.push(format!("lang: {}", config.language));

    lines.join("\n")
}

/// Handle /settings.
pub async fn settings_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(ctx) = admin_context(&bot, &msg, &state).await? else {
        return Ok(());
    };

    let config = state.pipeline.tenant_config(ctx.chat_id).await;
    reply(&bot, &msg, render_settings(&config)).await
}

/// Handle /set <key> <value>.
pub async fn set_command(bot: ThrottledBot, msg: Message, state: AppState, args: String) -> anyhow::Result<()> {
    let Some(ctx) = admin_context(&bot, &msg, &state).await? else {
        return Ok(());
    };

    let mut parts = args.split_whitespace();
    let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
        return reply(&bot, &msg, get_text(&ctx.lang, "settings.set_usage")).await;
    };

    // Read the stored record directly; saving fallback defaults over an
    // unreachable record would wipe the tenant's settings.
    let mut config = match state.pipeline.store().tenant_config(ctx.chat_id).await {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load settings of chat {}: {}", ctx.chat_id, e);
            return reply(&bot, &msg, get_text(&ctx.lang, "common.store_error")).await;
        }
    };

    let shown = match apply_setting(&mut config, key, value) {
        Ok(shown) => shown,
        Err(SettingError::UnknownKey(key)) => {
            let text = get_text_with(&ctx.lang, "settings.unknown_key", &[("key", &html_escape(&key))]);
            return reply(&bot, &msg, text).await;
        }
        Err(SettingError::InvalidValue { key, value }) => {
            let text = get_text_with(&ctx.lang, "settings.invalid_value", &[
                ("key", &html_escape(&key)),
                ("value", &html_escape(&value)),
            ]);
            return reply(&bot, &msg, text).await;
        }
    };

    if let Err(e) = state.pipeline.store().save_tenant_config(&config).await {
        warn!("Failed to save settings of chat {}: {}", ctx.chat_id, e);
        return reply(&bot, &msg, get_text(&ctx.lang, "common.store_error")).await;
    }

    info!("Admin {} set {}={} in chat {}", ctx.admin_id, key, shown, ctx.chat_id);

    // Answer in the new language when the language itself changed.
    let text = get_text_with(&config.language, "settings.updated", &[
        ("key", &html_escape(&key.to_lowercase())),
        ("value", &html_escape(&shown)),
    ]);
    reply(&bot, &msg, text).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moderation::TenantDefaults;

    fn config() -> TenantConfig {
        TenantConfig::new(-100, &TenantDefaults::default())
    }

    #[test]
    fn test_switches() {
        let mut config = config();

        assert_eq!(apply_setting(&mut config, "links", "off").unwrap(), "off");
        assert!(!config.antilink_enabled);

        assert_eq!(apply_setting(&mut config, "Sticker", "no").unwrap(), "off");
        assert!(!config.media.sticker);

        apply_setting(&mut config, "videonote", "on").unwrap();
        assert!(config.media.video_note);
    }

    #[test]
    fn test_numbers_and_durations() {
        let mut config = config();

        apply_setting(&mut config, "maxwarns", "5").unwrap();
        assert_eq!(config.max_warnings, 5);

        apply_setting(&mut config, "floodtime", "30").unwrap();
        assert_eq!(config.antiflood.window_secs, 30);

        assert_eq!(apply_setting(&mut config, "mutetime", "10m").unwrap(), "600s");
        assert_eq!(config.antiflood.mute_secs, 600);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = config();

        assert_eq!(
            apply_setting(&mut config, "maxwarns", "0"),
            Err(SettingError::InvalidValue {
                key: "maxwarns".to_string(),
                value: "0".to_string()
            })
        );
        assert!(apply_setting(&mut config, "flood", "maybe").is_err());
        assert!(apply_setting(&mut config, "lang", "fr").is_err());
        assert_eq!(config.max_warnings, 3);
        assert_eq!(config.language, "en");
    }

    #[test]
    fn test_mute_time_is_capped() {
        let mut config = config();

        assert!(apply_setting(&mut config, "mutetime", "100000000000000").is_err());
        assert!(apply_setting(&mut config, "mutetime", "367d").is_err());
        assert_eq!(config.antiflood.mute_secs, 300);

        assert_eq!(apply_setting(&mut config, "mutetime", "366d").unwrap(), "31622400s");
        assert_eq!(config.antiflood.mute_secs, MAX_MUTE_SECS);
    }

    #[test]
    fn test_unknown_key() {
        let mut config = config();
        assert_eq!(
            apply_setting(&mut config, "colour", "red"),
            Err(SettingError::UnknownKey("colour".to_string()))
        );
    }

    #[test]
    fn test_language() {
        let mut config = config();
        assert_eq!(apply_setting(&mut config, "lang", "UZ").unwrap(), "uz");
        assert_eq!(config.language, "uz");
    }

    #[test]
    fn test_render_mentions_every_key() {
        let text = render_settings(&config());
        for key in ["flood", "links", "files", "words", "sticker", "maxwarns", "lang"] {
            assert!(text.contains(key), "missing {key}");
        }
    }
}
