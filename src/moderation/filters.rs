//! Content filter chain.
//!
//! Filters run in a fixed order and the first match wins:
//! forward origin, links/mentions, dangerous files, blocked media, filtered
//! words. The chain only classifies; side effects belong to the pipeline.

use std::collections::HashSet;

use super::message::{ForwardOrigin, InboundMessage, MediaKind};
use super::model::{MediaFilters, TenantConfig};
use super::verdict::{ModerationVerdict, Violation};

/// Text markers treated as links when the message carries no entities.
const URL_MARKERS: &[&str] = &["http://", "https://", "www.", "t.me/"];

/// Normalize a filter word for storage and matching.
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Evaluate the filter chain for one message.
pub fn evaluate(
    config: &TenantConfig,
    msg: &InboundMessage,
    words: &HashSet<String>,
) -> ModerationVerdict {
    if is_linked_channel_forward(msg) {
        return ModerationVerdict::Skip;
    }

    if config.antilink_enabled && has_link(msg) {
        return ModerationVerdict::DeleteAndWarn(Violation::Link);
    }

    if config.antifile_enabled
        && let Some(extension) = msg.document_extension()
        && config.blocks_extension(&extension)
    {
        return ModerationVerdict::DeleteAndWarn(Violation::File { extension });
    }

    if let Some(kind) = msg.media
        && media_blocked(&config.media, kind)
    {
        return ModerationVerdict::DeleteAndWarn(Violation::Media(kind));
    }

    if config.word_filter.enabled
        && let Some(word) = find_filtered_word(msg.text.as_deref(), words)
    {
        let violation = Violation::Word { word };
        return if config.word_filter.warn {
            ModerationVerdict::DeleteAndWarn(violation)
        } else {
            ModerationVerdict::DeleteSilently(violation)
        };
    }

    ModerationVerdict::Allow
}

/// Whether the word filter could match, so callers can skip loading words.
pub fn needs_words(config: &TenantConfig, msg: &InboundMessage) -> bool {
    config.word_filter.enabled && msg.text.as_deref().is_some_and(|t| !t.is_empty())
}

fn is_linked_channel_forward(msg: &InboundMessage) -> bool {
    msg.forward_origin == Some(ForwardOrigin::LinkedChannel)
}

/// Links and mentions: entity kinds first, then a plain-text fallback.
pub fn has_link(msg: &InboundMessage) -> bool {
    if msg.entities.iter().any(|e| e.is_link()) {
        return true;
    }

    match msg.text.as_deref() {
        Some(text) => contains_url(text) || contains_mention(text),
        None => false,
    }
}

fn contains_url(text: &str) -> bool {
    let lower = text.to_lowercase();
    URL_MARKERS.iter().any(|marker| {
        lower.match_indices(marker).any(|(idx, _)| {
            lower[idx + marker.len()..]
                .chars()
                .next()
                .is_some_and(|c| !c.is_whitespace())
        })
    })
}

/// `@username` tokens: a letter, then letters, digits or underscores,
/// 4 to 32 characters long.
fn contains_mention(text: &str) -> bool {
    text.split_whitespace().any(|token| {
        let Some(name) = token.strip_prefix('@') else {
            return false;
        };
        let name = name.trim_end_matches(|c: char| matches!(c, '.' | ',' | '!' | '?' | ':' | ';' | ')'));
        let mut chars = name.chars();
        let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        starts_with_letter
            && (5..=32).contains(&name.len())
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

fn media_blocked(filters: &MediaFilters, kind: MediaKind) -> bool {
    match kind {
        MediaKind::Photo => filters.photo,
        MediaKind::Video => filters.video,
        MediaKind::Audio => filters.audio,
        MediaKind::Voice => filters.voice,
        MediaKind::Sticker => filters.sticker,
        MediaKind::Animation => filters.animation,
        MediaKind::VideoNote => filters.video_note,
    }
}

/// Case-folded substring match. The smallest matching word is reported so
/// the result does not depend on set iteration order.
fn find_filtered_word(text: Option<&str>, words: &HashSet<String>) -> Option<String> {
    let text = text?.to_lowercase();
    words
        .iter()
        .filter(|w| !w.is_empty() && text.contains(w.as_str()))
        .min()
        .cloned()
}
