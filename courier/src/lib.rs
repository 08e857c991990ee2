//! # Courier - chat state engine for Rust
//!
//! Courier keeps a set of chat threads (human contacts and automated responders), appends
//! messages to them, tracks unread state and persists everything across sessions:
//! - **Single writer**: every mutation is read-latest, apply, persist, publish
//! - **Snapshots**: consumers get immutable `Arc` views through a `watch` channel
//! - **Automated replies**: generated in the background, appended to the freshest state
//! - **Pluggable storage**: memory, a JSON file, or MongoDB (`mongodb` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use courier::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = CourierBuilder::new()
//!         .file("data/chats.json")
//!         .echo_replies()
//!         .build()
//!         .await?;
//!
//!     engine.send(&ChatId::from("1"), "Hello!").await?;
//!     engine.wait_idle().await;
//!
//!     let snapshot = engine.snapshot();
//!     let chat = snapshot.chat(&ChatId::from("1")).unwrap();
//!     println!("{}", chat.last_message().unwrap().body);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **courier-types**: ids, messages, chats, the chat collection, engine events and config
//! - **courier-persist**: wire format and storage gateways
//! - **courier-store**: pure queries and mutations over a collection
//! - **courier-reply**: reply generator trait and built-in generators
//! - **courier-engine**: the synchronization engine
//!
//! ## Features
//!
//! - `mongodb`: MongoDB storage gateway

// Re-export all public APIs
pub use courier_engine as engine;
pub use courier_persist as persist;
pub use courier_reply as reply;
pub use courier_store as store;
pub use courier_types as types;

// Re-export commonly used types
pub use courier_engine::{ChatError, ComposingState, SendReceipt, Snapshot, SyncEngine};
pub use courier_persist::{FileGateway, MemoryGateway, PersistenceGateway};
pub use courier_reply::{CannedReplyGenerator, EchoReplyGenerator, ReplyGenerator};
pub use courier_types::{Chat, ChatCollection, ChatId, ChatKind, EngineConfig, EngineEvent, Message, Origin};

/// High-level builder for a ready-to-use engine
pub mod builder;

/// Convenient prelude with commonly used types
pub mod prelude {
    pub use crate::builder::CourierBuilder;
    pub use crate::engine::{ChatError, Snapshot, SyncEngine};
    pub use crate::types::{ChatId, ChatKind, EngineEvent, Origin};
    pub use anyhow::Result;
}
