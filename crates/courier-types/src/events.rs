use serde::{Deserialize, Serialize};

use crate::chat::ChatId;
use crate::message::MessageId;

/// Notifications broadcast by the synchronization engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A new snapshot became authoritative
    SnapshotPublished {
        revision: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        chat_id: Option<ChatId>,
    },

    /// An automated reply was requested for this chat
    ComposingStarted {
        chat_id: ChatId,
    },

    /// No reply is pending for this chat any more
    ComposingFinished {
        chat_id: ChatId,
    },

    /// An automated reply was appended and persisted
    ReplyAppended {
        chat_id: ChatId,
        message_id: MessageId,
    },

    /// Reply generation or its persistence failed; nothing was appended
    ReplyFailed {
        chat_id: ChatId,
        error: String,
    },
}

impl EngineEvent {
    pub fn chat_id(&self) -> Option<&ChatId> {
        match self {
            EngineEvent::SnapshotPublished { chat_id, .. } => chat_id.as_ref(),
            EngineEvent::ComposingStarted { chat_id }
            | EngineEvent::ComposingFinished { chat_id }
            | EngineEvent::ReplyAppended { chat_id, .. }
            | EngineEvent::ReplyFailed { chat_id, .. } => Some(chat_id),
        }
    }
}
