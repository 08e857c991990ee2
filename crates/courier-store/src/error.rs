use courier_persist::PersistError;
use courier_types::{ChatId, MessageId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] PersistError),

    #[error("Chat not found: {0}")]
    ChatNotFound(ChatId),

    #[error("Message {message_id} already exists in chat {chat_id}")]
    DuplicateMessage {
        chat_id: ChatId,
        message_id: MessageId,
    },

    #[error("Chat id {0} appears more than once")]
    DuplicateChat(ChatId),

    #[error("Message body is empty")]
    EmptyMessage,

    #[error("Invalid chat name: {0:?}")]
    InvalidName(String),

    #[error("Reply generation failed: {0}")]
    ReplyGenerationFailed(String),
}

impl ChatError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChatError::ChatNotFound(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, ChatError::StorageUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
