//! Utility functions.
//!
//! HTML formatting for notices and argument parsing for admin commands.

pub mod parser;

pub use parser::{parse_duration, parse_positive, parse_switch};

use crate::i18n::get_text_with;

/// Escape text for Telegram HTML parse mode.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Clickable HTML mention of a user.
pub fn mention_html(user_id: u64, name: &str) -> String {
    format!("<a href=\"tg://user?id={}\">{}</a>", user_id, html_escape(name))
}

/// Human-readable duration in the tenant's language.
pub fn format_duration(lang: &str, secs: u64) -> String {
    let (key, n) = if secs < 60 {
        ("duration.seconds", secs)
    } else if secs < 3600 {
        ("duration.minutes", secs / 60)
    } else {
        ("duration.hours", secs / 3600)
    };
    get_text_with(lang, key, &[("n", &n.to_string())])
}
