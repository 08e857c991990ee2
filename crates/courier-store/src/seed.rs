use chrono::Duration;
use courier_types::{now_millis, truncate_to_millis, Chat, ChatCollection, ChatKind, Message};

pub const ASSISTANT_CHAT_ID: &str = "1";
pub const SUPPORT_CHAT_ID: &str = "2";
pub const ALICE_CHAT_ID: &str = "3";
pub const BOB_CHAT_ID: &str = "4";

/// Chats shown on first launch, before anything was saved
///
/// - `1` automated assistant with a read greeting
/// - `2` automated responder with two unread messages
/// - `3`, `4` contacts with one read message each (`4` is offline)
pub fn seed_chats() -> ChatCollection {
    let now = now_millis();
    let ago = |minutes: i64| truncate_to_millis(now - Duration::minutes(minutes));

    ChatCollection::from_chats(vec![
        Chat::new(ASSISTANT_CHAT_ID, "AI Assistant", ChatKind::Automated).with_messages(vec![
            Message::automated("Hello! I'm your assistant. How can I help you today?")
                .with_created_at(ago(60)),
        ]),
        Chat::new(SUPPORT_CHAT_ID, "Support Bot", ChatKind::Automated).with_messages(vec![
            Message::automated("Welcome to support! Ask me anything about your account.")
                .with_read(false)
                .with_created_at(ago(45)),
            Message::automated("Reminder: your ticket #4821 has a new update.")
                .with_read(false)
                .with_created_at(ago(30)),
        ]),
        Chat::new(ALICE_CHAT_ID, "Alice Johnson", ChatKind::Contact).with_messages(vec![
            Message::incoming("Are we still on for lunch tomorrow?")
                .with_read(true)
                .with_created_at(ago(120)),
        ]),
        Chat::new(BOB_CHAT_ID, "Bob Smith", ChatKind::Contact)
            .with_online(false)
            .with_messages(vec![Message::incoming("Sent you the files, let me know.")
                .with_read(true)
                .with_created_at(ago(24 * 60))]),
    ])
}
