use courier_types::ChatId;
use std::collections::BTreeMap;

/// Chats that are waiting on at least one automated reply
///
/// Each chat carries the number of replies still outstanding; the indicator for a chat is
/// up while that number is above zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposingState {
    pending: BTreeMap<ChatId, usize>,
}

impl ComposingState {
    pub fn is_composing(&self, chat_id: &ChatId) -> bool {
        self.pending.contains_key(chat_id)
    }

    /// Outstanding replies for `chat_id`
    pub fn pending(&self, chat_id: &ChatId) -> usize {
        self.pending.get(chat_id).copied().unwrap_or(0)
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn chats(&self) -> impl Iterator<Item = &ChatId> {
        self.pending.keys()
    }

    /// Returns true when the indicator went up
    pub(crate) fn raise(&mut self, chat_id: &ChatId) -> bool {
        let count = self.pending.entry(chat_id.clone()).or_insert(0);
        *count += 1;
        *count == 1
    }

    /// Returns true when the indicator went down
    pub(crate) fn lower(&mut self, chat_id: &ChatId) -> bool {
        match self.pending.get_mut(chat_id) {
            Some(count) if *count > 1 => {
                *count -= 1;
                false
            }
            Some(_) => {
                self.pending.remove(chat_id);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_stays_up_until_last_reply() {
        let chat = ChatId::from("1");
        let mut state = ComposingState::default();

        assert!(state.raise(&chat));
        assert!(!state.raise(&chat));
        assert_eq!(state.pending(&chat), 2);

        assert!(!state.lower(&chat));
        assert!(state.is_composing(&chat));
        assert!(state.lower(&chat));
        assert!(state.is_idle());
    }

    #[test]
    fn test_chats_are_independent() {
        let (a, b) = (ChatId::from("a"), ChatId::from("b"));
        let mut state = ComposingState::default();
        state.raise(&a);
        state.raise(&b);
        state.lower(&a);

        assert!(!state.is_composing(&a));
        assert!(state.is_composing(&b));
        assert_eq!(state.chats().collect::<Vec<_>>(), vec![&b]);
    }

    #[test]
    fn test_lower_unknown_chat_is_ignored() {
        let mut state = ComposingState::default();
        assert!(!state.lower(&ChatId::from("x")));
        assert!(state.is_idle());
    }
}
