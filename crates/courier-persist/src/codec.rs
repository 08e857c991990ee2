//! Wire format for persisted chat collections
//!
//! ```json
//! { "schema_version": 1, "chats": [ { "id": "1", "name": "...", "messages": [...] } ] }
//! ```
//!
//! Timestamps are integer milliseconds since the Unix epoch, enums are kebab-case strings.

use courier_types::ChatCollection;
use serde::{Deserialize, Serialize};

use crate::error::{PersistError, Result};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    schema_version: u32,
    chats: &'a ChatCollection,
}

#[derive(Deserialize)]
struct Header {
    schema_version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    chats: ChatCollection,
}

pub fn encode(chats: &ChatCollection) -> Result<String> {
    let envelope = EnvelopeRef {
        schema_version: SCHEMA_VERSION,
        chats,
    };
    Ok(serde_json::to_string(&envelope)?)
}

pub fn decode(blob: &str) -> Result<ChatCollection> {
    let header: Header = serde_json::from_str(blob)?;
    if header.schema_version != SCHEMA_VERSION {
        return Err(PersistError::UnsupportedSchema(header.schema_version));
    }

    let envelope: Envelope = serde_json::from_str(blob)?;
    if let Some(id) = envelope.chats.duplicate_id() {
        return Err(PersistError::Corrupt(format!("duplicate chat id {}", id)));
    }
    for chat in envelope.chats.iter() {
        if let Some(id) = chat.duplicate_message_id() {
            return Err(PersistError::Corrupt(format!("duplicate message id {} in chat {}", id, chat.id)));
        }
    }
    Ok(envelope.chats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use courier_types::{Chat, ChatKind, Message};

    fn collection() -> ChatCollection {
        let at = chrono::Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        ChatCollection::from_chats(vec![
            Chat::new("1", "Assistant", ChatKind::Automated)
                .with_messages(vec![Message::automated("Hello! How can I help?").with_created_at(at)]),
            Chat::new("2", "Empty", ChatKind::Contact).with_online(false),
            Chat::new("3", "Émilie \"quotes\" & <tags>", ChatKind::Contact).with_messages(vec![
                Message::incoming("línea 1\nline 2\t🎉 \\ \u{0}").with_created_at(at),
                Message::outgoing("").with_created_at(at),
            ]),
        ])
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let original = collection();
        let blob = encode(&original).unwrap();
        let decoded = decode(&blob).unwrap();

        assert_eq!(decoded, original);
        assert_eq!(encode(&decoded).unwrap(), blob);
    }

    #[test]
    fn test_round_trip_empty_collection() {
        let blob = encode(&ChatCollection::new()).unwrap();
        assert!(decode(&blob).unwrap().is_empty());
    }

    #[test]
    fn test_timestamps_encoded_as_millis() {
        let blob = encode(&collection()).unwrap();
        assert!(blob.contains("\"created_at\":1700000000123"));
        assert!(blob.contains("\"schema_version\":1"));
        assert!(blob.contains("\"kind\":\"automated\""));
    }

    #[test]
    fn test_rejects_unknown_schema() {
        let blob = r#"{"schema_version": 2, "chats": []}"#;
        assert!(matches!(decode(blob), Err(PersistError::UnsupportedSchema(2))));
    }

    #[test]
    fn test_rejects_duplicate_chat_ids() {
        let dup = ChatCollection::from_chats(vec![
            Chat::new("x", "One", ChatKind::Contact),
            Chat::new("x", "Two", ChatKind::Contact),
        ]);
        let blob = encode(&dup).unwrap();
        assert!(matches!(decode(&blob), Err(PersistError::Corrupt(_))));
    }

    #[test]
    fn test_rejects_repeated_message_id_in_a_chat() {
        let message = Message::incoming("once");
        let chats = ChatCollection::from_chats(vec![
            Chat::new("1", "Left", ChatKind::Contact).with_messages(vec![message.clone()]),
            Chat::new("2", "Right", ChatKind::Contact).with_messages(vec![message.clone(), message.clone()]),
        ]);
        let blob = encode(&chats).unwrap();

        match decode(&blob) {
            Err(PersistError::Corrupt(reason)) => assert!(reason.contains("chat 2")),
            other => panic!("expected corrupt blob, got {:?}", other),
        }
    }

    #[test]
    fn test_same_message_id_in_two_chats_is_accepted() {
        let message = Message::incoming("shared");
        let chats = ChatCollection::from_chats(vec![
            Chat::new("1", "Left", ChatKind::Contact).with_messages(vec![message.clone()]),
            Chat::new("2", "Right", ChatKind::Contact).with_messages(vec![message]),
        ]);
        let blob = encode(&chats).unwrap();
        assert_eq!(decode(&blob).unwrap(), chats);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(decode("not json"), Err(PersistError::Serialization(_))));
    }
}
