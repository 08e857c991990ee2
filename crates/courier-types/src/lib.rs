pub mod chat;
pub mod config;
pub mod events;
pub mod message;

pub use chat::{Chat, ChatCollection, ChatId, ChatKind};
pub use config::EngineConfig;
pub use events::EngineEvent;
pub use message::{now_millis, truncate_to_millis, Message, MessageId, Origin};
