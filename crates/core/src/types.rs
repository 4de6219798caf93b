//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Being ID (16-bit, assigned by the game server)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BeingId(pub u16);

impl BeingId {
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u16 {
        self.0
    }
}

impl From<u16> for BeingId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl fmt::Display for BeingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Item ID (16-bit, 0 means "no item")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u16);

impl ItemId {
    pub const NONE: ItemId = ItemId(0);

    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u16 {
        self.0
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl From<u16> for ItemId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

/// Ability ID (8-bit on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AbilityId(pub u8);

impl AbilityId {
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl From<u8> for AbilityId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

/// Attribute ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttributeId(pub u16);

impl AttributeId {
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u16 {
        self.0
    }
}

impl From<u16> for AttributeId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

/// Quest ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestId(pub u16);

impl QuestId {
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u16 {
        self.0
    }
}

impl From<u16> for QuestId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

/// Map name (String-based)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MapName(pub String);

impl MapName {
    pub fn new(name: String) -> Self {
        Self(name)
    }

    pub fn get(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for MapName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&str> for MapName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_none() {
        assert!(ItemId::NONE.is_none());
        assert!(!ItemId::new(5).is_none());
    }

    #[test]
    fn test_being_id_ordering() {
        let mut ids = vec![BeingId::new(9), BeingId::new(2), BeingId::new(5)];
        ids.sort();
        assert_eq!(ids, vec![BeingId::new(2), BeingId::new(5), BeingId::new(9)]);
    }
}
