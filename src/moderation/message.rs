//! Transport-neutral classification of an inbound group message.

/// Telegram's `GroupAnonymousBot`, the sender of messages posted by
/// anonymous group admins.
pub const ANONYMOUS_ADMIN_ID: u64 = 1_087_968_824;

/// Kind of chat the message was posted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    pub fn is_group(self) -> bool {
        matches!(self, Self::Group | Self::Supergroup)
    }
}

/// Entity kinds the link filter cares about; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Url,
    TextLink,
    Mention,
    TextMention,
    Other,
}

impl EntityKind {
    pub fn is_link(self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// Media attached to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Audio,
    Voice,
    Sticker,
    Animation,
    VideoNote,
}

impl MediaKind {
    /// Translation key suffix and log label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Voice => "voice",
            Self::Sticker => "sticker",
            Self::Animation => "animation",
            Self::VideoNote => "videonote",
        }
    }
}

/// Where a forwarded message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardOrigin {
    /// Automatic forward of a channel post into its linked discussion group.
    LinkedChannel,
    /// Manual forward of a channel post.
    Channel,
    /// Manual forward of a user's message.
    User,
}

/// Who sent the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: u64,
    pub display_name: String,
    /// Posted on behalf of the group by an anonymous admin.
    pub anonymous_admin: bool,
}

#[cfg(test)]
impl Sender {
    pub fn user(id: u64, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            anonymous_admin: id == ANONYMOUS_ADMIN_ID,
        }
    }
}

/// An inbound message reduced to what moderation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub chat_kind: ChatKind,
    pub message_id: i32,
    pub sender: Option<Sender>,
    /// Message text, or the media caption.
    pub text: Option<String>,
    pub entities: Vec<EntityKind>,
    pub media: Option<MediaKind>,
    pub document_name: Option<String>,
    pub forward_origin: Option<ForwardOrigin>,
}

impl InboundMessage {
    /// A plain text message from a regular user in a supergroup.
    #[cfg(test)]
    pub fn text(chat_id: i64, message_id: i32, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            chat_kind: ChatKind::Supergroup,
            message_id,
            sender: Some(sender),
            text: Some(text.into()),
            entities: Vec::new(),
            media: None,
            document_name: None,
            forward_origin: None,
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_entities(mut self, entities: Vec<EntityKind>) -> Self {
        self.entities = entities;
        self
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_media(mut self, media: MediaKind) -> Self {
        self.media = Some(media);
        self
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_document(mut self, name: impl Into<String>) -> Self {
        self.document_name = Some(name.into());
        self
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_forward_origin(mut self, origin: ForwardOrigin) -> Self {
        self.forward_origin = Some(origin);
        self
    }

    /// Lowercased extension of the attached document, if any.
    pub fn document_extension(&self) -> Option<String> {
        let name = self.document_name.as_deref()?;
        let (_, ext) = name.rsplit_once('.')?;
        if ext.is_empty() {
            return None;
        }
        Some(ext.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_extension() {
        let msg = InboundMessage::text(-1, 1, Sender::user(7, "a"), "")
            .with_document("Setup.Tar.GZ");
        assert_eq!(msg.document_extension().as_deref(), Some("gz"));

        let msg = InboundMessage::text(-1, 1, Sender::user(7, "a"), "").with_document("README");
        assert_eq!(msg.document_extension(), None);

        let msg = InboundMessage::text(-1, 1, Sender::user(7, "a"), "").with_document("trailing.");
        assert_eq!(msg.document_extension(), None);
    }

    #[test]
    fn test_anonymous_admin_sender() {
        assert!(Sender::user(ANONYMOUS_ADMIN_ID, "Group").anonymous_admin);
        assert!(!Sender::user(42, "Bob").anonymous_admin);
    }
}
