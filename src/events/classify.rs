//! Reduce a Telegram message to an [`InboundMessage`].

use teloxide::types::{Message, MessageEntityKind, MessageOrigin};

use crate::moderation::{
    ChatKind, EntityKind, ForwardOrigin, InboundMessage, MediaKind, Sender, ANONYMOUS_ADMIN_ID,
};

pub fn classify(msg: &Message) -> InboundMessage {
    InboundMessage {
        chat_id: msg.chat.id.0,
        chat_kind: chat_kind(msg),
        message_id: msg.id.0,
        sender: sender(msg),
        text: msg.text().or_else(|| msg.caption()).map(str::to_string),
        entities: entities(msg),
        media: media(msg),
        document_name: msg.document().and_then(|d| d.file_name.clone()),
        forward_origin: forward_origin(msg),
    }
}

fn chat_kind(msg: &Message) -> ChatKind {
    if msg.chat.is_supergroup() {
        ChatKind::Supergroup
    } else if msg.chat.is_group() {
        ChatKind::Group
    } else if msg.chat.is_channel() {
        ChatKind::Channel
    } else {
        ChatKind::Private
    }
}

fn sender(msg: &Message) -> Option<Sender> {
    let user = msg.from.as_ref()?;

    // Anonymous admins post as the group itself.
    let on_behalf_of_group = msg.sender_chat.as_ref().is_some_and(|c| c.id == msg.chat.id);

    Some(Sender {
        id: user.id.0,
        display_name: match (&msg.sender_chat, on_behalf_of_group) {
            (Some(chat), true) => chat.title().unwrap_or("Group").to_string(),
            _ => user.full_name(),
        },
        anonymous_admin: on_behalf_of_group || user.id.0 == ANONYMOUS_ADMIN_ID,
    })
}

fn entities(msg: &Message) -> Vec<EntityKind> {
    msg.entities()
        .or_else(|| msg.caption_entities())
        .unwrap_or_default()
        .iter()
        .map(|e| match e.kind {
            MessageEntityKind::Url => EntityKind::Url,
            MessageEntityKind::TextLink { .. } => EntityKind::TextLink,
            MessageEntityKind::Mention => EntityKind::Mention,
            MessageEntityKind::TextMention { .. } => EntityKind::TextMention,
            _ => EntityKind::Other,
        })
        .collect()
}

fn media(msg: &Message) -> Option<MediaKind> {
    if msg.photo().is_some() {
        Some(MediaKind::Photo)
    } else if msg.video().is_some() {
        Some(MediaKind::Video)
    } else if msg.audio().is_some() {
        Some(MediaKind::Audio)
    } else if msg.voice().is_some() {
        Some(MediaKind::Voice)
    } else if msg.sticker().is_some() {
        Some(MediaKind::Sticker)
    } else if msg.animation().is_some() {
        Some(MediaKind::Animation)
    } else if msg.video_note().is_some() {
        Some(MediaKind::VideoNote)
    } else {
        None
    }
}

fn forward_origin(msg: &Message) -> Option<ForwardOrigin> {
    if msg.is_automatic_forward() {
        return Some(ForwardOrigin::LinkedChannel);
    }
    match msg.forward_origin()? {
        MessageOrigin::Channel { .. } | MessageOrigin::Chat { .. } => Some(ForwardOrigin::Channel),
        MessageOrigin::User { .. } | MessageOrigin::HiddenUser { .. } => Some(ForwardOrigin::User),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> Message {
        serde_json::from_value(value).unwrap()
    }

    fn base() -> serde_json::Value {
        json!({
            "message_id": 10,
            "date": 1_700_000_000,
            "chat": { "id": -1001, "type": "supergroup", "title": "Group" },
            "from": { "id": 42, "is_bot": false, "first_name": "Bob" }
        })
    }

    #[test]
    fn test_text_with_url_entity() {
        let mut value = base();
        value["text"] = json!("see example.com");
        value["entities"] = json!([{ "type": "url", "offset": 4, "length": 11 }]);

        let inbound = classify(&parse(value));

        assert_eq!(inbound.chat_id, -1001);
        assert_eq!(inbound.chat_kind, ChatKind::Supergroup);
        assert_eq!(inbound.message_id, 10);
        assert_eq!(inbound.entities, vec![EntityKind::Url]);
        assert_eq!(inbound.sender.map(|s| s.id), Some(42));
    }

    #[test]
    fn test_document_with_caption() {
        let mut value = base();
        value["document"] = json!({ "file_id": "f", "file_unique_id": "u", "file_name": "setup.exe" });
        value["caption"] = json!("free game");

        let inbound = classify(&parse(value));

        assert_eq!(inbound.document_extension().as_deref(), Some("exe"));
        assert_eq!(inbound.text.as_deref(), Some("free game"));
        assert_eq!(inbound.media, None);
    }

    #[test]
    fn test_anonymous_admin() {
        let mut value = base();
        value["from"] = json!({ "id": ANONYMOUS_ADMIN_ID, "is_bot": true, "first_name": "Group", "username": "GroupAnonymousBot" });
        value["sender_chat"] = json!({ "id": -1001, "type": "supergroup", "title": "Group" });
        value["text"] = json!("hello");

        let sender = classify(&parse(value)).sender.unwrap();

        assert!(sender.anonymous_admin);
        assert_eq!(sender.display_name, "Group");
    }
}
