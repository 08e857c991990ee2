use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique message identifier
///
/// Generated as a UUIDv7, so ids are ordered by creation time and ties inside the same
/// millisecond are broken by the generator's counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a fresh time-ordered id
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    LocalUser,
    Automated,
    RemoteContact,
}

impl Origin {
    /// Messages from anyone but the local user count towards unread state
    pub fn is_inbound(self) -> bool {
        !matches!(self, Origin::LocalUser)
    }
}

/// A single chat message
///
/// Everything except `read` is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub body: String,
    /// Always whole milliseconds, the precision the wire format keeps
    #[serde(with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
    pub origin: Origin,
    pub read: bool,
}

impl Message {
    pub fn new(body: impl Into<String>, origin: Origin, read: bool) -> Self {
        Self {
            id: MessageId::generate(),
            body: body.into(),
            created_at: now_millis(),
            origin,
            read,
        }
    }

    /// Message typed by the local user (always read)
    pub fn outgoing(body: impl Into<String>) -> Self {
        Self::new(body, Origin::LocalUser, true)
    }

    /// Reply produced by an automated responder
    pub fn automated(body: impl Into<String>) -> Self {
        Self::new(body, Origin::Automated, true)
    }

    /// Message delivered by a remote contact, unread until the chat is opened
    pub fn incoming(body: impl Into<String>) -> Self {
        Self::new(body, Origin::RemoteContact, false)
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = truncate_to_millis(created_at);
        self
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn with_read(mut self, read: bool) -> Self {
        self.read = read;
        self
    }

    pub fn counts_as_unread(&self) -> bool {
        !self.read && self.origin.is_inbound()
    }
}

/// Current time at the precision the wire format keeps
pub fn now_millis() -> DateTime<Utc> {
    truncate_to_millis(Utc::now())
}

pub fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at)
}
