//! # Protocol Dispatcher
//!
//! Maps every known inbound message id to exactly one handler.
//!
//! Handlers are plain function pointers taking the client and the message
//! cursor, so dispatch is a single `HashMap` lookup with no boxing. The
//! registry built by [`HandlerRegistry::with_default_handlers`] covers the
//! whole of [`ServerMessage::ALL`]; the reserved invalid marker and unknown
//! ids never reach it.

use crate::client::GameClient;
use crate::handlers;
use mana_core::Result;
use mana_protocol::{MessageIn, ServerMessage};
use std::collections::HashMap;

/// Handler for one inbound message type
pub type HandlerFunction = fn(&mut GameClient, &mut MessageIn) -> Result<()>;

/// Registry of inbound message handlers
pub struct HandlerRegistry {
    /// Map from message type to handler function
    handlers: HashMap<ServerMessage, HandlerFunction>,
}

impl HandlerRegistry {
    /// Create an empty registry
    #[inline]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry with a handler for every message in [`ServerMessage::ALL`]
    pub fn with_default_handlers() -> Self {
        use ServerMessage as M;

        let mut registry = Self::new();
        registry.register(M::ConnectResponse, handlers::handle_connect_response);
        registry.register(M::DisconnectResponse, handlers::handle_disconnect_response);
        registry.register(M::PlayerMapChange, handlers::handle_map_change);

        registry.register(M::Inventory, handlers::handle_inventory);
        registry.register(M::InventoryFull, handlers::handle_inventory_full);
        registry.register(M::Equip, handlers::handle_equip);
        registry.register(M::Unequip, handlers::handle_unequip);

        registry.register(M::PlayerAttributeChange, handlers::handle_attribute_change);
        registry.register(M::AttributePointsStatus, handlers::handle_attribute_points);

        registry.register(M::BeingEnter, handlers::handle_being_enter);
        registry.register(M::BeingLeave, handlers::handle_being_leave);
        registry.register(M::ItemAppear, handlers::handle_item_appear);
        registry.register(M::BeingLooksChange, handlers::handle_looks_change);
        registry.register(M::BeingActionChange, handlers::handle_action_change);
        registry.register(M::BeingDirChange, handlers::handle_direction_change);
        registry.register(M::BeingsMove, handlers::handle_beings_move);
        registry.register(M::Items, handlers::handle_items);

        registry.register(M::BeingAbilityOnPoint, handlers::handle_ability_on_point);
        registry.register(M::BeingAbilityOnBeing, handlers::handle_ability_on_being);
        registry.register(M::BeingAbilityOnDirection, handlers::handle_ability_on_direction);
        registry.register(M::AbilityStatus, handlers::handle_ability_status);
        registry.register(M::AbilityRemoved, handlers::handle_ability_removed);
        registry.register(M::AbilityCooldown, handlers::handle_ability_cooldown);

        registry.register(M::Say, handlers::handle_say);

        registry.register(M::NpcChoice, handlers::handle_npc_choice);
        registry.register(M::NpcMessage, handlers::handle_npc_message);
        registry.register(M::NpcBuy, handlers::handle_npc_buy);
        registry.register(M::NpcSell, handlers::handle_npc_sell);
        registry.register(M::NpcBuySellResponse, handlers::handle_buy_sell_response);
        registry.register(M::NpcClose, handlers::handle_npc_close);
        registry.register(M::NpcNumber, handlers::handle_npc_number);

        registry.register(M::BeingsDamage, handlers::handle_beings_damage);
        registry.register(M::QuestlogStatus, handlers::handle_questlog_status);

        registry
    }

    /// Register a handler, replacing any previous one for the same message
    pub fn register(&mut self, message: ServerMessage, handler: HandlerFunction) {
        if self.handlers.insert(message, handler).is_some() {
            tracing::debug!("Replaced handler for {:?}", message);
        }
    }

    /// Handler for a message type
    #[inline]
    pub fn get(&self, message: ServerMessage) -> Option<HandlerFunction> {
        self.handlers.get(&message).copied()
    }

    pub fn has_handler(&self, message: ServerMessage) -> bool {
        self.handlers.contains_key(&message)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Whether every known message has a handler
    pub fn is_total(&self) -> bool {
        ServerMessage::ALL.iter().all(|m| self.has_handler(*m))
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
