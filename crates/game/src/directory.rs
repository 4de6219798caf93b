//! # Entity Directory
//!
//! This module tracks every being on the current map and which one of them is
//! the local player.

use crate::being::Being;
use mana_core::BeingId;
use std::collections::BTreeMap;

/// Entity Directory
///
/// # Purpose
/// Owns all live beings, keyed by their server-assigned id.
///
/// # Invariant
/// `player`, when set, names a being that is present in `beings`.
#[derive(Debug, Default)]
pub struct EntityDirectory {
    /// Key: BeingId, Value: Being
    beings: BTreeMap<BeingId, Being>,

    /// The being controlled by this client
    player: Option<BeingId>,
}

impl EntityDirectory {
    /// Create an empty directory
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a being, replacing any previous being with the same id
    ///
    /// Replacing the local player also clears the player reference; the
    /// caller binds it again if the newcomer is the player.
    ///
    /// # Returns
    /// The replaced being, if any
    pub fn insert(&mut self, being: Being) -> Option<Being> {
        tracing::debug!("Adding being {}", being.id);
        if self.player == Some(being.id) {
            self.player = None;
        }
        self.beings.insert(being.id, being)
    }

    /// Remove a being
    ///
    /// Removing the local player also clears the player reference.
    pub fn remove(&mut self, id: BeingId) -> Option<Being> {
        let removed = self.beings.remove(&id);
        if removed.is_some() {
            tracing::debug!("Removing being {}", id);
            if self.player == Some(id) {
                self.player = None;
            }
        }
        removed
    }

    /// Remove every being and the player reference
    pub fn clear(&mut self) {
        self.beings.clear();
        self.player = None;
    }

    #[inline]
    pub fn get(&self, id: BeingId) -> Option<&Being> {
        self.beings.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: BeingId) -> Option<&mut Being> {
        self.beings.get_mut(&id)
    }

    #[inline]
    pub fn contains(&self, id: BeingId) -> bool {
        self.beings.contains_key(&id)
    }

    /// Mark a being as the local player
    ///
    /// # Returns
    /// `false` if no being with that id exists
    pub fn set_player(&mut self, id: BeingId) -> bool {
        if !self.beings.contains_key(&id) {
            return false;
        }
        self.player = Some(id);
        true
    }

    #[inline]
    pub fn player_id(&self) -> Option<BeingId> {
        self.player
    }

    pub fn player(&self) -> Option<&Being> {
        self.player.and_then(|id| self.beings.get(&id))
    }

    pub fn player_mut(&mut self) -> Option<&mut Being> {
        match self.player {
            Some(id) => self.beings.get_mut(&id),
            None => None,
        }
    }

    /// Number of live beings
    #[inline]
    pub fn len(&self) -> usize {
        self.beings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.beings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Being> {
        self.beings.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Being> {
        self.beings.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::being::{BeingKind, CharacterLooks};
    use mana_core::Position;

    fn character(id: u16, name: &str) -> Being {
        Being::new(
            BeingId::new(id),
            BeingKind::Character { name: name.into(), looks: CharacterLooks::default() },
            Position::default(),
        )
    }

    #[test]
    fn test_directory_creation() {
        let directory = EntityDirectory::new();
        assert_eq!(directory.len(), 0);
        assert!(directory.player().is_none());
    }

    #[test]
    fn test_add_remove_being() {
        let mut directory = EntityDirectory::new();
        directory.insert(character(1, "a"));
        directory.insert(character(2, "b"));
        assert_eq!(directory.len(), 2);

        assert!(directory.remove(BeingId::new(1)).is_some());
        assert!(directory.remove(BeingId::new(1)).is_none());
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_reappearing_id_replaces() {
        let mut directory = EntityDirectory::new();
        directory.insert(character(1, "a"));
        let old = directory.insert(character(1, "b"));
        assert_eq!(old.map(|b| b.name().to_string()), Some("a".to_string()));
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_removing_player_clears_reference() {
        let mut directory = EntityDirectory::new();
        directory.insert(character(7, "me"));
        assert!(directory.set_player(BeingId::new(7)));
        assert_eq!(directory.player_id(), Some(BeingId::new(7)));

        directory.remove(BeingId::new(7));
        assert_eq!(directory.player_id(), None);
    }

    #[test]
    fn test_replacing_player_clears_reference() {
        let mut directory = EntityDirectory::new();
        directory.insert(character(7, "me"));
        directory.set_player(BeingId::new(7));

        directory.insert(character(7, "someone else"));
        assert_eq!(directory.player_id(), None);
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_player_must_exist() {
        let mut directory = EntityDirectory::new();
        assert!(!directory.set_player(BeingId::new(3)));
        assert_eq!(directory.player_id(), None);
    }

    #[test]
    fn test_clear_drops_player() {
        let mut directory = EntityDirectory::new();
        directory.insert(character(7, "me"));
        directory.set_player(BeingId::new(7));
        directory.clear();
        assert!(directory.is_empty());
        assert!(directory.player().is_none());
    }
}
