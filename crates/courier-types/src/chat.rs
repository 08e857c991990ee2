use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::message::{Message, MessageId};

/// Unique chat identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(String);

impl ChatId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChatId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ChatId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Counterpart category of a chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChatKind {
    /// Replies come from a reply generator
    Automated,
    /// A human contact
    Contact,
}

impl fmt::Display for ChatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatKind::Automated => f.write_str("automated"),
            ChatKind::Contact => f.write_str("contact"),
        }
    }
}

impl FromStr for ChatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "automated" | "bot" | "ai" => Ok(ChatKind::Automated),
            "contact" | "human" => Ok(ChatKind::Contact),
            other => Err(format!("unknown chat kind: {}", other)),
        }
    }
}

/// A named thread of messages with one counterpart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    pub name: String,
    pub kind: ChatKind,
    pub online: bool,
    pub unread_count: u32,
    pub messages: Vec<Message>,
}

impl Chat {
    pub fn new(id: impl Into<ChatId>, name: impl Into<String>, kind: ChatKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            online: true,
            unread_count: 0,
            messages: Vec::new(),
        }
    }

    /// Replace the message sequence and recompute the unread counter
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self.reconcile_unread();
        self
    }

    pub fn with_online(mut self, online: bool) -> Self {
        self.online = online;
        self
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn contains_message(&self, id: &MessageId) -> bool {
        self.messages.iter().any(|m| &m.id == id)
    }

    /// First message id that appears more than once, if any
    pub fn duplicate_message_id(&self) -> Option<&MessageId> {
        let mut seen = HashSet::new();
        self.messages.iter().map(|m| &m.id).find(|id| !seen.insert(*id))
    }

    /// Number of inbound messages not yet read
    pub fn derived_unread(&self) -> u32 {
        let count = self.messages.iter().filter(|m| m.counts_as_unread()).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    pub fn is_fully_read(&self) -> bool {
        self.unread_count == 0 && self.messages.iter().all(|m| m.read)
    }

    /// Bring `unread_count` back in line with the messages. Returns true if it changed.
    pub fn reconcile_unread(&mut self) -> bool {
        let derived = self.derived_unread();
        let changed = derived != self.unread_count;
        self.unread_count = derived;
        changed
    }

    pub fn is_automated(&self) -> bool {
        self.kind == ChatKind::Automated
    }
}

/// The full set of chats, in display order
///
/// Chats are shared behind `Arc`, so deriving a new collection from an old one only
/// reallocates the chats that actually changed. `Arc::ptr_eq` on a chat is a valid
/// "unchanged" check between two collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatCollection {
    chats: Vec<Arc<Chat>>,
}

impl ChatCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_chats(chats: impl IntoIterator<Item = Chat>) -> Self {
        Self {
            chats: chats.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Chat>> {
        self.chats.iter()
    }

    pub fn get(&self, id: &ChatId) -> Option<&Arc<Chat>> {
        self.chats.iter().find(|c| &c.id == id)
    }

    pub fn position(&self, id: &ChatId) -> Option<usize> {
        self.chats.iter().position(|c| &c.id == id)
    }

    pub fn contains(&self, id: &ChatId) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ChatId> {
        self.chats.iter().map(|c| &c.id)
    }

    /// New collection with the chat at `index` swapped out; every other chat is shared
    pub fn with_replaced(&self, index: usize, chat: Chat) -> Self {
        let mut chats = self.chats.clone();
        chats[index] = Arc::new(chat);
        Self { chats }
    }

    /// New collection with `chat` inserted at the front
    pub fn with_prepended(&self, chat: Chat) -> Self {
        let mut chats = Vec::with_capacity(self.chats.len() + 1);
        chats.push(Arc::new(chat));
        chats.extend(self.chats.iter().cloned());
        Self { chats }
    }

    /// View containing the chats matching `predicate`, in the same order
    pub fn filtered(&self, mut predicate: impl FnMut(&Chat) -> bool) -> Self {
        Self {
            chats: self.chats.iter().filter(|c| predicate(c)).cloned().collect(),
        }
    }

    /// First chat id that appears more than once, if any
    pub fn duplicate_id(&self) -> Option<&ChatId> {
        let mut seen = HashSet::new();
        self.chats.iter().map(|c| &c.id).find(|id| !seen.insert(*id))
    }

    /// True when both hold the very same chat allocations in the same order
    pub fn shares_all(&self, other: &Self) -> bool {
        self.chats.len() == other.chats.len()
            && self.chats.iter().zip(&other.chats).all(|(a, b)| Arc::ptr_eq(a, b))
    }

    pub fn total_unread(&self) -> u64 {
        self.chats.iter().map(|c| u64::from(c.unread_count)).sum()
    }
}

impl<'a> IntoIterator for &'a ChatCollection {
    type Item = &'a Arc<Chat>;
    type IntoIter = std::slice::Iter<'a, Arc<Chat>>;

    fn into_iter(self) -> Self::IntoIter {
        self.chats.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ChatCollection {
        ChatCollection::from_chats(vec![
            Chat::new("a", "Alpha", ChatKind::Automated),
            Chat::new("b", "Beta", ChatKind::Contact)
                .with_messages(vec![Message::incoming("hey"), Message::outgoing("yo")]),
        ])
    }

    #[test]
    fn test_with_messages_derives_unread() {
        let chats = sample();
        let beta = chats.get(&ChatId::from("b")).unwrap();
        assert_eq!(beta.unread_count, 1);
        assert_eq!(beta.last_message().unwrap().body, "yo");
    }

    #[test]
    fn test_with_replaced_shares_untouched_chats() {
        let chats = sample();
        let next = chats.with_replaced(0, Chat::new("a", "Renamed", ChatKind::Automated));

        assert!(!Arc::ptr_eq(chats.get(&"a".into()).unwrap(), next.get(&"a".into()).unwrap()));
        assert!(Arc::ptr_eq(chats.get(&"b".into()).unwrap(), next.get(&"b".into()).unwrap()));
    }

    #[test]
    fn test_with_prepended_goes_first() {
        let next = sample().with_prepended(Chat::new("z", "Zed", ChatKind::Contact));
        let ids: Vec<&str> = next.ids().map(ChatId::as_str).collect();
        assert_eq!(ids, vec!["z", "a", "b"]);
    }

    #[test]
    fn test_duplicate_id_detection() {
        assert!(sample().duplicate_id().is_none());

        let dup = ChatCollection::from_chats(vec![
            Chat::new("x", "One", ChatKind::Contact),
            Chat::new("x", "Two", ChatKind::Contact),
        ]);
        assert_eq!(dup.duplicate_id(), Some(&ChatId::from("x")));
    }

    #[test]
    fn test_duplicate_message_id_detection() {
        let message = Message::incoming("twice");
        let chat = Chat::new("c", "Carol", ChatKind::Contact).with_messages(vec![message.clone()]);
        assert!(chat.duplicate_message_id().is_none());

        let chat = chat.with_messages(vec![message.clone(), Message::outgoing("x"), message.clone()]);
        assert_eq!(chat.duplicate_message_id(), Some(&message.id));
    }

    #[test]
    fn test_chat_kind_parsing() {
        assert_eq!("Contact".parse::<ChatKind>().unwrap(), ChatKind::Contact);
        assert_eq!("bot".parse::<ChatKind>().unwrap(), ChatKind::Automated);
        assert!("robot".parse::<ChatKind>().is_err());
    }
}
