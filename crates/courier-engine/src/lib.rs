//! Synchronization engine for Courier
//!
//! [`SyncEngine`] owns the chat collection. Presentation code issues mutations through it
//! and renders the [`Snapshot`]s it publishes; automated replies are generated in
//! background tasks and committed against the latest state when they arrive.

pub mod builder;
pub mod composing;
pub mod engine;
pub mod snapshot;

pub use builder::EngineBuilder;
pub use composing::ComposingState;
pub use engine::{SendReceipt, SyncEngine};
pub use snapshot::Snapshot;

pub use courier_store::{ChatError, Result};
