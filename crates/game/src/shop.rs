//! # Shop Session
//!
//! Buy or sell listing opened by an NPC. A session only exists inside an NPC
//! interaction and ends with it.

use crate::error::{InteractionError, InteractionResult};
use mana_core::ItemId;
use mana_protocol::ShopItemEntry;

/// What the open listing trades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShopMode {
    #[default]
    None,
    /// The player buys from the shop
    Buying,
    /// The player sells to the shop
    Selling,
}

/// One line of the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradedItem {
    pub item: ItemId,
    pub amount: u16,
    pub cost: u16,
}

impl From<ShopItemEntry> for TradedItem {
    fn from(entry: ShopItemEntry) -> Self {
        Self {
            item: entry.item,
            amount: entry.amount,
            cost: entry.cost,
        }
    }
}

#[derive(Debug, Default)]
pub struct ShopSession {
    mode: ShopMode,
    items: Vec<TradedItem>,
}

impl ShopSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the listing
    pub fn open(&mut self, mode: ShopMode, items: Vec<TradedItem>) {
        self.mode = mode;
        self.items = items;
    }

    pub fn close(&mut self) {
        self.mode = ShopMode::None;
        self.items.clear();
    }

    #[inline]
    pub fn mode(&self) -> ShopMode {
        self.mode
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.mode != ShopMode::None
    }

    pub fn items(&self) -> &[TradedItem] {
        &self.items
    }

    /// Check that a trade may be requested right now
    pub fn ensure_open(&self) -> InteractionResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(InteractionError::ShopClosed)
        }
    }

    /// Book a confirmed trade against the listing
    ///
    /// # Returns
    /// `false` if no line of the listing trades `item`
    pub fn apply_trade(&mut self, item: ItemId, amount: u16) -> bool {
        let Some(index) = self.items.iter().position(|line| line.item == item) else {
            return false;
        };
        let remaining = self.items[index].amount.saturating_sub(amount);
        if remaining == 0 {
            self.items.remove(index);
        } else {
            self.items[index].amount = remaining;
        }
        true
    }
}
