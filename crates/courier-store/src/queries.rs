use courier_types::{ChatCollection, ChatKind};

/// Chats whose display name contains `query`, ignoring case
///
/// A blank query matches everything. Any other query is matched as typed, surrounding
/// whitespace included. The result shares its chats with `chats`.
pub fn filter_by_query(chats: &ChatCollection, query: &str) -> ChatCollection {
    if query.trim().is_empty() {
        return chats.clone();
    }
    let needle = query.to_lowercase();
    chats.filtered(|chat| chat.name.to_lowercase().contains(&needle))
}

/// Split into (automated, contacts), keeping the display order inside each group
pub fn partition_by_kind(chats: &ChatCollection) -> (ChatCollection, ChatCollection) {
    let automated = chats.filtered(|chat| chat.kind == ChatKind::Automated);
    let contacts = chats.filtered(|chat| chat.kind == ChatKind::Contact);
    (automated, contacts)
}
