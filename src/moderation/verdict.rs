//! Verdicts produced by the filter chain and flood detector.

use std::time::Duration;

use super::message::MediaKind;

/// Why a message was flagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Link,
    File { extension: String },
    Media(MediaKind),
    Word { word: String },
}

impl Violation {
    /// Short reason stored with the warning and in the moderation log.
    pub fn reason(&self) -> String {
        match self {
            Self::Link => "link detected (antilink)".to_string(),
            Self::File { extension } => format!("file .{} detected (antifile)", extension),
            Self::Media(kind) => format!("media detected: {}", kind.as_str()),
            Self::Word { word } => format!("filtered word: {}", word),
        }
    }
}

/// Classification of one message. Discarded once its side effects are issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationVerdict {
    Allow,
    /// Moderation does not apply (linked channel forward).
    Skip,
    DeleteAndWarn(Violation),
    DeleteAndMute(Duration),
    DeleteSilently(Violation),
}
