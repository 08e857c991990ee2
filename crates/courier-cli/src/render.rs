use courier_engine::ComposingState;
use courier_store::partition_by_kind;
use courier_types::{Chat, ChatCollection, EngineEvent, Message, Origin};
use std::fmt::Write;

const PREVIEW_CHARS: usize = 40;

/// Chat list grouped into automated chats and contacts
pub fn chat_list(chats: &ChatCollection, composing: &ComposingState) -> String {
    if chats.is_empty() {
        return "(no chats)".to_string();
    }

    let (automated, contacts) = partition_by_kind(chats);
    let mut out = String::new();
    let unread = chats.total_unread();
    if unread > 0 {
        let _ = writeln!(out, "{} unread", unread);
    }
    for (title, group) in [("Assistants", automated), ("Contacts", contacts)] {
        if group.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}", title);
        for chat in &group {
            let _ = writeln!(out, "  {}", chat_line(chat, composing.is_composing(&chat.id)));
        }
    }
    out.trim_end().to_string()
}

fn chat_line(chat: &Chat, composing: bool) -> String {
    let presence = if chat.online { '●' } else { '○' };
    let unread = if chat.unread_count > 0 {
        format!(" ({})", chat.unread_count)
    } else {
        String::new()
    };
    let preview = if composing {
        "typing...".to_string()
    } else {
        chat.last_message().map(|m| preview(&m.body)).unwrap_or_default()
    };
    format!("[{}] {} {}{}  {}", chat.id, presence, chat.name, unread, preview)
}

fn preview(body: &str) -> String {
    let line = body.lines().next().unwrap_or_default();
    if line.chars().count() > PREVIEW_CHARS {
        let cut: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        line.to_string()
    }
}

/// Full message history of one chat
pub fn chat_view(chat: &Chat) -> String {
    let mut out = format!("== {} ({}) ==", chat.name, chat.kind);
    if chat.messages.is_empty() {
        out.push_str("\n(no messages yet)");
    }
    for message in &chat.messages {
        let _ = write!(out, "\n{}", message_line(chat, message));
    }
    out
}

fn message_line(chat: &Chat, message: &Message) -> String {
    let author = match message.origin {
        Origin::LocalUser => "you",
        Origin::Automated | Origin::RemoteContact => chat.name.as_str(),
    };
    format!("{} {}: {}", message.created_at().format("%H:%M"), author, message.body)
}

/// One-line notice for events worth showing; snapshot publications are silent
///
/// Replies are looked up in `chats` so the notice can show their text.
pub fn event_notice(event: &EngineEvent, chats: &ChatCollection) -> Option<String> {
    match event {
        EngineEvent::ComposingStarted { chat_id } => Some(format!("[{}] is typing...", chat_id)),
        EngineEvent::ReplyAppended { chat_id, message_id } => {
            let chat = chats.get(chat_id)?;
            let message = chat.messages.iter().rev().find(|m| &m.id == message_id)?;
            Some(format!("[{}] {}", chat_id, message_line(chat, message)))
        }
        EngineEvent::ReplyFailed { chat_id, error } => Some(format!("[{}] reply failed: {}", chat_id, error)),
        EngineEvent::SnapshotPublished { .. } | EngineEvent::ComposingFinished { .. } => None,
    }
}
