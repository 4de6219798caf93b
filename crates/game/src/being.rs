//! # Beings
//!
//! Characters, NPCs and monsters share position, facing, action and speed;
//! everything else lives in the [`BeingKind`] payload.

use mana_core::{BeingId, ItemId, Position};
use mana_protocol::{BeingAction, BeingDirection, Gender, Looks};
use std::collections::BTreeMap;

/// Walk speed used until the server says otherwise, in pixels per second
pub const DEFAULT_WALK_SPEED: f32 = 150.0;

/// Appearance of a player character
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterLooks {
    pub hair_style: u8,
    pub hair_color: u8,
    /// Equipment slot -> item id
    pub equipment: BTreeMap<u8, ItemId>,
}

impl From<Looks> for CharacterLooks {
    fn from(looks: Looks) -> Self {
        Self {
            hair_style: looks.hair_style,
            hair_color: looks.hair_color,
            equipment: looks.equipment,
        }
    }
}

/// Variant-specific data of a being
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeingKind {
    Character { name: String, looks: CharacterLooks },
    Npc { sprite: u16, name: String },
    Monster { species: u16, name: String },
}

/// Any simulated entity the server told us about
#[derive(Debug, Clone, PartialEq)]
pub struct Being {
    pub id: BeingId,
    /// Where the being is drawn (predicted)
    pub position: Position,
    /// Last position reported by the server
    pub server_position: Position,
    pub direction: BeingDirection,
    pub action: BeingAction,
    /// Pixels per second
    pub walk_speed: f32,
    pub gender: Gender,
    pub kind: BeingKind,
}

impl Being {
    /// Create a standing being at `position`
    pub fn new(id: BeingId, kind: BeingKind, position: Position) -> Self {
        Self {
            id,
            position,
            server_position: position,
            direction: BeingDirection::default(),
            action: BeingAction::Stand,
            walk_speed: DEFAULT_WALK_SPEED,
            gender: Gender::default(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            BeingKind::Character { name, .. }
            | BeingKind::Npc { name, .. }
            | BeingKind::Monster { name, .. } => name,
        }
    }

    #[inline]
    pub fn is_character(&self) -> bool {
        matches!(self.kind, BeingKind::Character { .. })
    }

    #[inline]
    pub fn is_npc(&self) -> bool {
        matches!(self.kind, BeingKind::Npc { .. })
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.action == BeingAction::Dead
    }

    /// Turn toward a point
    ///
    /// # Returns
    /// `true` if the facing direction changed. Looking at one's own position
    /// leaves the direction alone.
    pub fn look_at(&mut self, point: Position) -> bool {
        match BeingDirection::towards(self.position, point) {
            Some(direction) if direction != self.direction => {
                self.direction = direction;
                true
            }
            _ => false,
        }
    }

    /// Replace hair and equipment; only characters have looks
    ///
    /// # Returns
    /// `false` if this being is not a character
    pub fn apply_looks(&mut self, new_looks: CharacterLooks) -> bool {
        match &mut self.kind {
            BeingKind::Character { looks, .. } => {
                *looks = new_looks;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npc() -> Being {
        Being::new(
            BeingId::new(1),
            BeingKind::Npc { sprite: 4, name: "Guard".into() },
            Position::new(100.0, 100.0),
        )
    }

    #[test]
    fn test_new_being_stands_at_server_position() {
        let being = npc();
        assert_eq!(being.position, being.server_position);
        assert_eq!(being.action, BeingAction::Stand);
        assert_eq!(being.walk_speed, DEFAULT_WALK_SPEED);
        assert_eq!(being.name(), "Guard");
        assert!(being.is_npc());
    }

    #[test]
    fn test_look_at_reports_change() {
        let mut being = npc();
        assert!(being.look_at(Position::new(150.0, 110.0)));
        assert_eq!(being.direction, BeingDirection::Right);
        assert!(!being.look_at(Position::new(180.0, 100.0)));
        assert!(!being.look_at(being.position));
    }

    #[test]
    fn test_looks_only_apply_to_characters() {
        let mut being = npc();
        assert!(!being.apply_looks(CharacterLooks::default()));

        let mut character = Being::new(
            BeingId::new(2),
            BeingKind::Character { name: "Alice".into(), looks: CharacterLooks::default() },
            Position::default(),
        );
        let looks = CharacterLooks { hair_style: 3, ..Default::default() };
        assert!(character.apply_looks(looks.clone()));
        assert_eq!(character.kind, BeingKind::Character { name: "Alice".into(), looks });
    }
}
