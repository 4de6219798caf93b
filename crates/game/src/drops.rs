//! Items lying on the ground

use mana_core::{ItemId, Position};

/// A dropped item at a pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DroppedItem {
    pub item: ItemId,
    pub x: i32,
    pub y: i32,
}

impl DroppedItem {
    pub fn position(&self) -> Position {
        Position::new(self.x as f32, self.y as f32)
    }
}

/// Drops on the current map, in arrival order
#[derive(Debug, Default)]
pub struct DropList {
    drops: Vec<DroppedItem>,
}

impl DropList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: ItemId, x: i32, y: i32) {
        self.drops.push(DroppedItem { item, x, y });
    }

    /// Remove the drop lying at `(x, y)`
    ///
    /// # Returns
    /// `false` if nothing lay there
    pub fn remove_at(&mut self, x: i32, y: i32) -> bool {
        match self.drops.iter().position(|d| d.x == x && d.y == y) {
            Some(index) => {
                self.drops.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drops strictly closer than `radius` to `pos`
    pub fn in_range(&self, pos: Position, radius: f32) -> impl Iterator<Item = &DroppedItem> {
        let radius_sq = radius * radius;
        self.drops
            .iter()
            .filter(move |d| (d.position() - pos).length_squared() < radius_sq)
    }

    pub fn clear(&mut self) {
        self.drops.clear();
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DroppedItem> {
        self.drops.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove_by_position() {
        let mut drops = DropList::new();
        drops.add(ItemId::new(5), 10, 20);
        drops.add(ItemId::new(6), 30, 40);
        assert!(drops.remove_at(10, 20));
        assert!(!drops.remove_at(10, 20));
        assert_eq!(drops.len(), 1);
    }

    #[test]
    fn test_in_range() {
        let mut drops = DropList::new();
        drops.add(ItemId::new(1), 100, 100);
        drops.add(ItemId::new(2), 140, 100);
        drops.add(ItemId::new(3), 148, 100);

        let near: Vec<_> = drops
            .in_range(Position::new(100.0, 100.0), 48.0)
            .map(|d| d.item)
            .collect();
        assert_eq!(near, vec![ItemId::new(1), ItemId::new(2)]);
    }
}
