//! # Mana Game Client Core
//!
//! The local mirror of the world and everything that keeps it in sync with
//! the server.
//!
//! ## Modules
//!
//! - `client` - [`GameClient`], the entry point driven by messages and ticks
//! - `dispatch` - Message id to handler routing
//! - `handlers` - One handler per inbound message
//! - `session` - Authentication, map changes, disconnect and reset
//! - `commands` - Requests made on behalf of the player
//! - `directory` - Live beings and the local player reference
//! - `being` - Characters, NPCs and monsters
//! - `movement` - Remote interpolation and collision-clamped player movement
//! - `npc` - NPC dialogue state machine
//! - `shop` - Buy/sell listings
//! - `inventory`, `attributes`, `abilities`, `quests`, `drops` - Server-owned collections
//! - `events` - Change notifications for the display layer
//! - `error` - Errors for refused player requests

pub mod abilities;
pub mod attributes;
pub mod being;
pub mod client;
pub mod commands;
pub mod directory;
pub mod dispatch;
pub mod drops;
pub mod error;
pub mod events;
mod handlers;
pub mod inventory;
pub mod movement;
pub mod npc;
pub mod quests;
pub mod session;
pub mod shop;

// Re-export commonly used types
pub use abilities::{AbilityList, GlobalCooldown, SERVER_TICK};
pub use attributes::{AttributeValue, Attributes, MOVE_SPEED_ATTRIBUTE};
pub use being::{Being, BeingKind, CharacterLooks};
pub use client::{GameClient, Outgoing};
pub use directory::EntityDirectory;
pub use dispatch::{HandlerFunction, HandlerRegistry};
pub use drops::{DropList, DroppedItem};
pub use error::{InteractionError, InteractionResult};
pub use events::{EventReceiver, EventSink, GameEvent};
pub use inventory::{Inventory, InventorySlot};
pub use npc::{NpcInteraction, NpcState, NumberRequest};
pub use quests::{Quest, QuestLog};
pub use session::Session;
pub use shop::{ShopMode, ShopSession, TradedItem};
