use courier_types::{Chat, ChatCollection, ChatId};
use std::sync::Arc;

/// An immutable, published view of the chat collection
///
/// `revision` starts at 0 for the loaded state and goes up by one with every successful
/// commit.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub revision: u64,
    pub chats: Arc<ChatCollection>,
}

impl Snapshot {
    pub(crate) fn initial(chats: ChatCollection) -> Self {
        Self {
            revision: 0,
            chats: Arc::new(chats),
        }
    }

    pub(crate) fn next(&self, chats: ChatCollection) -> Self {
        Self {
            revision: self.revision + 1,
            chats: Arc::new(chats),
        }
    }

    pub fn chat(&self, chat_id: &ChatId) -> Option<&Arc<Chat>> {
        self.chats.get(chat_id)
    }

    /// True when both refer to the very same published collection
    pub fn same_as(&self, other: &Snapshot) -> bool {
        self.revision == other.revision && Arc::ptr_eq(&self.chats, &other.chats)
    }
}
