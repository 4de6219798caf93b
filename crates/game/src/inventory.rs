//! Inventory mirror

use mana_core::ItemId;
use mana_protocol::{InventoryFullEntry, InventoryPatchEntry};
use std::collections::BTreeMap;

/// Equipment slot value meaning "not equipped"
pub const UNEQUIPPED: u16 = 0;

/// One occupied inventory slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventorySlot {
    pub slot: u16,
    pub item: ItemId,
    pub amount: u16,
    pub equip_slot: u16,
}

impl InventorySlot {
    #[inline]
    pub fn is_equipped(&self) -> bool {
        self.equip_slot != UNEQUIPPED
    }
}

/// Occupied slots, keyed by slot index
#[derive(Debug, Default)]
pub struct Inventory {
    slots: BTreeMap<u16, InventorySlot>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every slot with the given list
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = InventoryFullEntry>) {
        self.slots = entries
            .into_iter()
            .filter(|entry| !entry.item.is_none())
            .map(|entry| {
                (
                    entry.slot,
                    InventorySlot {
                        slot: entry.slot,
                        item: entry.item,
                        amount: entry.amount,
                        equip_slot: entry.equip_slot,
                    },
                )
            })
            .collect();
    }

    /// Set or, for item 0, clear one slot
    ///
    /// Patching a slot that holds the same item keeps its equipment slot.
    pub fn patch(&mut self, entry: InventoryPatchEntry) {
        if entry.item.is_none() {
            self.slots.remove(&entry.slot);
            return;
        }
        let equip_slot = self
            .slots
            .get(&entry.slot)
            .filter(|existing| existing.item == entry.item)
            .map(|existing| existing.equip_slot)
            .unwrap_or(UNEQUIPPED);
        self.slots.insert(
            entry.slot,
            InventorySlot {
                slot: entry.slot,
                item: entry.item,
                amount: entry.amount,
                equip_slot,
            },
        );
    }

    /// Associate a slot with an equipment slot
    ///
    /// # Returns
    /// `false` if the inventory slot is empty
    pub fn equip(&mut self, slot: u16, equip_slot: u16) -> bool {
        match self.slots.get_mut(&slot) {
            Some(entry) => {
                entry.equip_slot = equip_slot;
                true
            }
            None => false,
        }
    }

    /// Clear a slot's equipment association
    pub fn unequip(&mut self, slot: u16) -> bool {
        self.equip(slot, UNEQUIPPED)
    }

    #[inline]
    pub fn get(&self, slot: u16) -> Option<&InventorySlot> {
        self.slots.get(&slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventorySlot> {
        self.slots.values()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(slot: u16, item: u16, amount: u16, equip_slot: u16) -> InventoryFullEntry {
        InventoryFullEntry { slot, item: ItemId::new(item), amount, equip_slot }
    }

    #[test]
    fn test_full_resync_replaces() {
        let mut inventory = Inventory::new();
        inventory.patch(InventoryPatchEntry { slot: 9, item: ItemId::new(1), amount: 1 });
        inventory.replace_all(vec![full(0, 501, 3, 0), full(1, 1201, 1, 2)]);

        assert_eq!(inventory.len(), 2);
        assert!(inventory.get(9).is_none());
        assert!(inventory.get(1).unwrap().is_equipped());
    }

    #[test]
    fn test_patch_sets_and_clears() {
        let mut inventory = Inventory::new();
        inventory.patch(InventoryPatchEntry { slot: 2, item: ItemId::new(7), amount: 4 });
        assert_eq!(inventory.get(2).unwrap().amount, 4);

        inventory.patch(InventoryPatchEntry { slot: 2, item: ItemId::NONE, amount: 0 });
        assert!(inventory.get(2).is_none());
    }

    #[test]
    fn test_equip_keeps_amount() {
        let mut inventory = Inventory::new();
        inventory.replace_all(vec![full(3, 1201, 2, 0)]);

        assert!(inventory.equip(3, 5));
        let slot = inventory.get(3).unwrap();
        assert_eq!((slot.amount, slot.equip_slot), (2, 5));

        assert!(inventory.unequip(3));
        assert!(!inventory.get(3).unwrap().is_equipped());
        assert!(!inventory.equip(40, 1));
    }

    #[test]
    fn test_amount_patch_keeps_equipment() {
        let mut inventory = Inventory::new();
        inventory.replace_all(vec![full(3, 1201, 1, 4)]);
        inventory.patch(InventoryPatchEntry { slot: 3, item: ItemId::new(1201), amount: 2 });
        assert_eq!(inventory.get(3).unwrap().equip_slot, 4);
    }
}
