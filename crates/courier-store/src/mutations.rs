use chrono::{DateTime, Utc};
use courier_types::{Chat, ChatCollection, ChatId, ChatKind, Message};
use std::sync::Arc;

use crate::error::{ChatError, Result};

fn locate<'a>(chats: &'a ChatCollection, chat_id: &ChatId) -> Result<(usize, &'a Arc<Chat>)> {
    chats
        .iter()
        .enumerate()
        .find(|(_, chat)| &chat.id == chat_id)
        .ok_or_else(|| ChatError::ChatNotFound(chat_id.clone()))
}

/// Append `message` to the chat `chat_id`
///
/// Every other chat in the result is the same allocation as in `chats`.
pub fn append_message(chats: &ChatCollection, chat_id: &ChatId, message: Message) -> Result<ChatCollection> {
    let (index, current) = locate(chats, chat_id)?;

    if current.contains_message(&message.id) {
        return Err(ChatError::DuplicateMessage {
            chat_id: chat_id.clone(),
            message_id: message.id,
        });
    }

    let mut chat = Chat::clone(current);
    chat.messages.push(message);
    chat.reconcile_unread();
    Ok(chats.with_replaced(index, chat))
}

/// Insert an empty chat at the front and return its id
pub fn create_chat(chats: &ChatCollection, kind: ChatKind, name: &str) -> Result<(ChatCollection, ChatId)> {
    create_chat_at(chats, kind, name, Utc::now())
}

pub fn create_chat_at(
    chats: &ChatCollection,
    kind: ChatKind,
    name: &str,
    now: DateTime<Utc>,
) -> Result<(ChatCollection, ChatId)> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ChatError::InvalidName(name.to_string()));
    }

    let id = next_chat_id(chats, now);
    let chat = Chat::new(id.clone(), name, kind);
    Ok((chats.with_prepended(chat), id))
}

/// Millisecond timestamp of `now`, bumped until it is free in `chats`
fn next_chat_id(chats: &ChatCollection, now: DateTime<Utc>) -> ChatId {
    let mut candidate = now.timestamp_millis();
    loop {
        let id = ChatId::new(candidate.to_string());
        if !chats.contains(&id) {
            return id;
        }
        candidate += 1;
    }
}

/// Mark every message in the chat as read and zero its unread counter
///
/// A chat that is already fully read comes back untouched.
pub fn mark_read(chats: &ChatCollection, chat_id: &ChatId) -> Result<ChatCollection> {
    let (index, current) = locate(chats, chat_id)?;
    if current.is_fully_read() {
        return Ok(chats.clone());
    }

    let mut chat = Chat::clone(current);
    for message in &mut chat.messages {
        message.read = true;
    }
    chat.unread_count = 0;
    Ok(chats.with_replaced(index, chat))
}

pub fn set_presence(chats: &ChatCollection, chat_id: &ChatId, online: bool) -> Result<ChatCollection> {
    let (index, current) = locate(chats, chat_id)?;
    if current.online == online {
        return Ok(chats.clone());
    }

    let chat = Chat::clone(current).with_online(online);
    Ok(chats.with_replaced(index, chat))
}
