//! Quest log mirror

use mana_core::QuestId;
use mana_protocol::{QuestState, QuestlogEntry};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quest {
    pub id: QuestId,
    pub state: QuestState,
    pub title: String,
    pub description: String,
}

impl Quest {
    pub fn new(id: QuestId) -> Self {
        Self {
            id,
            state: QuestState::default(),
            title: String::new(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct QuestLog {
    quests: BTreeMap<QuestId, Quest>,
}

impl QuestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a partial update, creating the quest if needed
    ///
    /// Fields absent from the update keep their value.
    pub fn apply(&mut self, update: QuestlogEntry) -> &Quest {
        let quest = self
            .quests
            .entry(update.id)
            .or_insert_with(|| Quest::new(update.id));
        if let Some(state) = update.state {
            quest.state = state;
        }
        if let Some(title) = update.title {
            quest.title = title;
        }
        if let Some(description) = update.description {
            quest.description = description;
        }
        quest
    }

    #[inline]
    pub fn get(&self, id: QuestId) -> Option<&Quest> {
        self.quests.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quest> {
        self.quests.values()
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    pub fn clear(&mut self) {
        self.quests.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(id: u16) -> QuestlogEntry {
        QuestlogEntry { id: QuestId::new(id), state: None, title: None, description: None }
    }

    #[test]
    fn test_partial_updates_keep_other_fields() {
        let mut log = QuestLog::new();
        log.apply(QuestlogEntry {
            title: Some("Rats".into()),
            description: Some("Clear the cellar".into()),
            ..update(4)
        });
        log.apply(QuestlogEntry { state: Some(QuestState::Finished), ..update(4) });

        let quest = log.get(QuestId::new(4)).unwrap();
        assert_eq!(quest.title, "Rats");
        assert_eq!(quest.description, "Clear the cellar");
        assert_eq!(quest.state, QuestState::Finished);
    }

    #[test]
    fn test_empty_update_creates_quest() {
        let mut log = QuestLog::new();
        log.apply(update(9));
        assert_eq!(log.get(QuestId::new(9)), Some(&Quest::new(QuestId::new(9))));
    }
}
