//! Ability definitions

use crate::error::Result;
use mana_core::AbilityId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

fn default_use_action() -> String {
    "attack".to_string()
}

/// Static information about one ability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityInfo {
    pub id: AbilityId,
    pub name: String,
    /// Action name a being switches to while using the ability
    #[serde(default = "default_use_action")]
    pub use_action: String,
}

/// Lookup table of ability definitions
#[derive(Debug, Clone, Default)]
pub struct AbilityDb {
    abilities: HashMap<AbilityId, AbilityInfo>,
}

impl AbilityDb {
    pub fn new(abilities: impl IntoIterator<Item = AbilityInfo>) -> Self {
        Self {
            abilities: abilities.into_iter().map(|info| (info.id, info)).collect(),
        }
    }

    /// Parse a JSON array of ability definitions
    pub fn from_json(text: &str) -> Result<Self> {
        let abilities: Vec<AbilityInfo> = serde_json::from_str(text)?;
        Ok(Self::new(abilities))
    }

    /// Load ability definitions from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let db = Self::from_json(&text)?;
        tracing::info!(
            "Loaded {} abilities from {}",
            db.len(),
            path.as_ref().display()
        );
        Ok(db)
    }

    #[inline]
    pub fn get(&self, id: AbilityId) -> Option<&AbilityInfo> {
        self.abilities.get(&id)
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResourceError;
    use tempfile::NamedTempFile;

    const ABILITIES: &str = r#"[
        { "id": 1, "name": "Strike", "use_action": "attack" },
        { "id": 7, "name": "Heal" }
    ]"#;

    #[test]
    fn test_parse_abilities() {
        let db = AbilityDb::from_json(ABILITIES).unwrap();
        assert_eq!(db.len(), 2);
        assert_eq!(db.get(AbilityId::new(1)).unwrap().name, "Strike");
        assert_eq!(db.get(AbilityId::new(7)).unwrap().use_action, "attack");
        assert!(db.get(AbilityId::new(2)).is_none());
    }

    #[test]
    fn test_load_from_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), ABILITIES).unwrap();
        let db = AbilityDb::load_from_file(file.path()).unwrap();
        assert!(!db.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        let result = AbilityDb::from_json("{ not json");
        assert!(matches!(result, Err(ResourceError::AbilityFormat(_))));
    }
}
