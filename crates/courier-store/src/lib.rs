//! Pure query and mutation primitives over a [`ChatCollection`]
//!
//! Every mutation takes the current collection by reference and returns a new one; chats the
//! mutation did not touch stay shared with the input. The only I/O is [`load`].

pub mod error;
pub mod mutations;
pub mod queries;
pub mod seed;

use courier_persist::PersistenceGateway;
use courier_types::ChatCollection;

pub use error::{ChatError, Result};
pub use mutations::{append_message, create_chat, create_chat_at, mark_read, set_presence};
pub use queries::{filter_by_query, partition_by_kind};
pub use seed::seed_chats;

/// Read the collection from `gateway`
///
/// An empty slot yields the seed chats. Unread counters that disagree with the stored
/// messages are recomputed.
pub async fn load(gateway: &dyn PersistenceGateway) -> Result<ChatCollection> {
    let Some(blob) = gateway.load().await? else {
        tracing::info!("No saved chats in {}, starting from seed", gateway.describe());
        return Ok(seed_chats());
    };

    let decoded = courier_persist::decode(&blob)?;
    let mut reconciled = 0usize;
    let chats = decoded
        .iter()
        .map(|chat| {
            let mut chat = courier_types::Chat::clone(chat);
            if chat.reconcile_unread() {
                reconciled += 1;
            }
            chat
        })
        .collect::<Vec<_>>();

    if reconciled > 0 {
        tracing::warn!("Recomputed unread counters for {} chat(s) loaded from {}", reconciled, gateway.describe());
    }
    tracing::info!("Loaded {} chats from {}", chats.len(), gateway.describe());

    Ok(ChatCollection::from_chats(chats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_persist::{encode, MemoryGateway};
    use courier_types::{Chat, ChatId, ChatKind, Message};

    #[tokio::test]
    async fn test_empty_slot_loads_seed() {
        let gateway = MemoryGateway::new();
        let chats = load(&gateway).await.unwrap();

        assert_eq!(chats.len(), 4);
        assert_eq!(chats.get(&ChatId::from(seed::SUPPORT_CHAT_ID)).unwrap().unread_count, 2);
        // seeding alone never writes
        assert_eq!(gateway.save_count(), 0);
    }

    #[tokio::test]
    async fn test_load_decodes_saved_blob() {
        let saved = ChatCollection::from_chats(vec![
            Chat::new("x", "Xavier", ChatKind::Contact).with_messages(vec![Message::incoming("yo")])
        ]);
        let gateway = MemoryGateway::with_blob(encode(&saved).unwrap());

        let chats = load(&gateway).await.unwrap();
        assert_eq!(chats, saved);
    }

    #[tokio::test]
    async fn test_load_reconciles_unread_counter() {
        let mut chat = Chat::new("x", "Xavier", ChatKind::Contact)
            .with_messages(vec![Message::incoming("a"), Message::incoming("b")]);
        chat.unread_count = 9;
        let gateway = MemoryGateway::with_blob(encode(&ChatCollection::from_chats(vec![chat])).unwrap());

        let chats = load(&gateway).await.unwrap();
        assert_eq!(chats.get(&ChatId::from("x")).unwrap().unread_count, 2);
    }

    #[tokio::test]
    async fn test_unreachable_storage() {
        let gateway = MemoryGateway::new();
        gateway.set_fail_loads(true);

        let err = load(&gateway).await.unwrap_err();
        assert!(err.is_storage());
    }

    #[tokio::test]
    async fn test_undecodable_blob() {
        let gateway = MemoryGateway::with_blob("not json at all");
        assert!(load(&gateway).await.unwrap_err().is_storage());
    }
}
