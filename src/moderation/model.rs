//! Tenant configuration and log models.
//!
//! These are stored as-is in MongoDB; every field carries a serde default so
//! records written by older versions still load.

use serde::{Deserialize, Serialize};

/// Extensions blocked by the file filter unless a tenant overrides the list.
pub const DEFAULT_BLOCKED_EXTENSIONS: &[&str] = &[
    "exe", "msi", "bat", "cmd", "com", "scr", "vbs", "js", "jar", // Windows
    "apk", "xapk", "apks", // Android
    "ipa",  // iOS
    "deb", "rpm", // Linux packages
    "dmg", "pkg", "app", // macOS
    "sh", "run", // Shell scripts
    "dll", "sys", "drv", // System files
    "zip", "rar", "7z", "tar", "gz", "bz2", "xz", // Archives
];

/// Telegram treats restrictions longer than this as permanent.
pub const MAX_MUTE_SECS: u64 = 366 * 24 * 60 * 60;

/// Process-wide defaults applied to tenants created lazily.
#[derive(Debug, Clone)]
pub struct TenantDefaults {
    pub max_warnings: u32,
    pub flood_limit: u32,
    pub flood_window_secs: u32,
    pub flood_mute_secs: u64,
    pub language: String,
}

impl Default for TenantDefaults {
    fn default() -> Self {
        Self {
            max_warnings: 3,
            flood_limit: 5,
            flood_window_secs: 10,
            flood_mute_secs: 300,
            language: "en".to_string(),
        }
    }
}

/// Antiflood settings for a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FloodSettings {
    #[serde(default = "enabled")]
    pub enabled: bool,

    /// More than this many messages inside the window trips the detector.
    #[serde(default = "default_flood_limit")]
    pub max_messages: u32,

    #[serde(default = "default_flood_window")]
    pub window_secs: u32,

    #[serde(default = "default_mute_secs")]
    pub mute_secs: u64,
}

/// Media kinds blocked for a tenant (`true` = delete and warn).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaFilters {
    #[serde(default = "enabled")]
    pub photo: bool,
    #[serde(default = "enabled")]
    pub video: bool,
    #[serde(default = "enabled")]
    pub audio: bool,
    #[serde(default = "enabled")]
    pub voice: bool,
    #[serde(default = "enabled")]
    pub sticker: bool,
    #[serde(default = "enabled")]
    pub animation: bool,
    #[serde(default = "enabled")]
    pub video_note: bool,
}

impl Default for MediaFilters {
    fn default() -> Self {
        Self {
            photo: true,
            video: true,
            audio: true,
            voice: true,
            sticker: true,
            animation: true,
            video_note: true,
        }
    }
}

impl MediaFilters {
    /// Same flags with every kind allowed.
    pub fn allow_all() -> Self {
        Self {
            photo: false,
            video: false,
            audio: false,
            voice: false,
            sticker: false,
            animation: false,
            video_note: false,
        }
    }
}

/// Word-list filter settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordFilterSettings {
    #[serde(default = "enabled")]
    pub enabled: bool,

    /// When false a filtered word only deletes the message (no warning).
    #[serde(default = "enabled")]
    pub warn: bool,
}

impl Default for WordFilterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            warn: true,
        }
    }
}

/// Per-chat moderation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TenantConfig {
    /// Telegram chat ID (unique index)
    pub chat_id: i64,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_flood_settings")]
    pub antiflood: FloodSettings,

    #[serde(default = "enabled")]
    pub antilink_enabled: bool,

    #[serde(default = "enabled")]
    pub antifile_enabled: bool,

    #[serde(default = "default_blocked_extensions")]
    pub blocked_extensions: Vec<String>,

    #[serde(default)]
    pub media: MediaFilters,

    #[serde(default)]
    pub word_filter: WordFilterSettings,

    #[serde(default = "default_max_warnings")]
    pub max_warnings: u32,

    #[serde(default = "enabled")]
    pub is_active: bool,
}

fn enabled() -> bool {
    true
}

fn default_flood_limit() -> u32 {
    5
}

fn default_flood_window() -> u32 {
    10
}

fn default_mute_secs() -> u64 {
    300 // 5 minutes
}

fn default_max_warnings() -> u32 {
    3
}

fn default_language() -> String {
    "en".to_string()
}

fn default_flood_settings() -> FloodSettings {
    FloodSettings {
        enabled: true,
        max_messages: default_flood_limit(),
        window_secs: default_flood_window(),
        mute_secs: default_mute_secs(),
    }
}

fn default_blocked_extensions() -> Vec<String> {
    DEFAULT_BLOCKED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

impl TenantConfig {
    /// Create a config for a new tenant from process defaults.
    pub fn new(chat_id: i64, defaults: &TenantDefaults) -> Self {
        Self {
            chat_id,
            title: None,
            language: defaults.language.clone(),
            antiflood: FloodSettings {
                enabled: true,
                max_messages: defaults.flood_limit,
                window_secs: defaults.flood_window_secs,
                mute_secs: defaults.flood_mute_secs,
            },
            antilink_enabled: true,
            antifile_enabled: true,
            blocked_extensions: default_blocked_extensions(),
            media: MediaFilters::default(),
            word_filter: WordFilterSettings::default(),
            max_warnings: defaults.max_warnings,
            is_active: true,
        }
    }

    /// Replace non-positive thresholds with defaults.
    ///
    /// Stored documents can be edited by hand; the pipeline never sees a zero
    /// threshold or window.
    #[must_use]
    pub fn sanitized(mut self, defaults: &TenantDefaults) -> Self {
        if self.max_warnings == 0 {
            self.max_warnings = defaults.max_warnings.max(1);
        }
        if self.antiflood.max_messages == 0 {
            self.antiflood.max_messages = defaults.flood_limit.max(1);
        }
        if self.antiflood.window_secs == 0 {
            self.antiflood.window_secs = defaults.flood_window_secs.max(1);
        }
        if self.antiflood.mute_secs == 0 {
            self.antiflood.mute_secs = defaults.flood_mute_secs.max(1);
        }
        self.antiflood.mute_secs = self.antiflood.mute_secs.min(MAX_MUTE_SECS);
        for ext in self.blocked_extensions.iter_mut() {
            *ext = ext.trim().trim_start_matches('.').to_lowercase();
        }
        self
    }

    /// Whether the file filter blocks this extension (lowercase, no dot).
    pub fn blocks_extension(&self, ext: &str) -> bool {
        self.blocked_extensions.iter().any(|e| e == ext)
    }
}

/// Chat member status as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Owner,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Owner | Self::Administrator)
    }
}

/// Moderation log action names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum LogAction {
    AutoMute,
    Warn,
    AutoKick,
    Filter,
    StuckBan,
    Unwarn,
    ResetWarns,
}

impl LogAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AutoMute => "AUTO-MUTE",
            Self::Warn => "WARN",
            Self::AutoKick => "AUTO-KICK",
            Self::Filter => "FILTER",
            Self::StuckBan => "STUCK-BAN",
            Self::Unwarn => "UNWARN",
            Self::ResetWarns => "RESET-WARNS",
        }
    }
}

/// Admin id recorded for actions taken by the bot itself.
pub const AUTOMATIC_ACTOR: u64 = 0;

/// One moderation log line.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub chat_id: i64,
    pub user_id: u64,
    pub admin_id: u64,
    pub action: LogAction,
    pub reason: String,
    pub duration_secs: Option<u64>,
}

impl LogEntry {
    /// Entry for an action the bot took on its own.
    pub fn automatic(chat_id: i64, user_id: u64, action: LogAction, reason: impl Into<String>) -> Self {
        Self {
            chat_id,
            user_id,
            admin_id: AUTOMATIC_ACTOR,
            action,
            reason: reason.into(),
            duration_secs: None,
        }
    }

    /// Entry for an action an admin took by command.
    pub fn by_admin(chat_id: i64, user_id: u64, admin_id: u64, action: LogAction, reason: impl Into<String>) -> Self {
        Self {
            chat_id,
            user_id,
            admin_id,
            action,
            reason: reason.into(),
            duration_secs: None,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, secs: u64) -> Self {
        self.duration_secs = Some(secs);
        self
    }
}
