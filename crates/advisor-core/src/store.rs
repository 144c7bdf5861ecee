use crate::state::ChatTurn;

/// Ordered, append-only log of chat turns (oldest first)
#[derive(Debug, Default, Clone)]
pub struct MessageStore {
    turns: Vec<ChatTurn>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    pub fn append(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    /// Read-only view of every turn in insertion order
    pub fn all(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ChatRole;

    #[test]
    fn test_append_preserves_order() {
        let mut store = MessageStore::new();
        store.append(ChatTurn::assistant("first"));
        store.append(ChatTurn::user("second"));
        store.append(ChatTurn::assistant("third"));

        let texts: Vec<&str> = store.all().iter().map(|t| t.text()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(store.last().map(|t| t.role()), Some(ChatRole::Assistant));
    }

    #[test]
    fn test_all_is_stable_without_append() {
        let mut store = MessageStore::new();
        store.append(ChatTurn::user("hi"));
        let first = store.all().to_vec();
        let second = store.all().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_store() {
        let store = MessageStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.last().is_none());
    }
}
