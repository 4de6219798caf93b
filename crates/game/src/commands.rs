//! # Player Commands
//!
//! Requests the display layer makes on behalf of the player. Each one either
//! queues a message for the server or refuses with an error; none waits for
//! an answer.

use crate::client::GameClient;
use crate::error::{InteractionError, InteractionResult};
use crate::events::GameEvent;
use mana_core::{AbilityId, AttributeId, BeingId, ItemId, Position, Result, Vector2};
use mana_protocol::{
    build_buy_sell, build_direction_change, build_equip, build_lower_attribute, build_npc_number,
    build_npc_select, build_npc_talk, build_npc_talk_next, build_pickup, build_raise_attribute,
    build_respawn, build_say, build_unequip, build_use_ability_on_direction,
    build_use_ability_on_point, build_walk,
};

impl GameClient {
    //=== Player ===//

    /// Name of the character to bind as local player on its next appearance
    pub fn set_player_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.player_name == name {
            return;
        }
        self.player_name = name.clone();
        self.emit(GameEvent::PlayerNameChanged(name));
    }

    /// Direction the player wants to walk in; the null vector stops
    pub fn set_player_walk_direction(&mut self, direction: Vector2) {
        if self.walk_direction == direction {
            return;
        }
        self.walk_direction = direction;
        self.emit(GameEvent::PlayerWalkDirectionChanged(direction));
    }

    /// Report a new player position
    ///
    /// Nothing is sent while the client-wide cooldown runs.
    pub fn walk_to(&mut self, x: i32, y: i32) -> Result<()> {
        if self.cooldown.is_active(self.clock) {
            tracing::trace!("Walk to ({}, {}) suppressed by cooldown", x, y);
            return Ok(());
        }
        self.send_result(build_walk(x, y))
    }

    /// Turn the player toward a point, telling the server if the facing changed
    pub fn look_at(&mut self, x: i32, y: i32) -> Result<()> {
        let Some(player) = self.directory.player_mut() else {
            return Ok(());
        };
        if !player.look_at(Position::new(x as f32, y as f32)) {
            return Ok(());
        }
        let direction = player.direction;
        self.send_result(build_direction_change(direction))
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        self.send_result(build_say(text))
    }

    pub fn respawn(&mut self) {
        self.send(build_respawn());
    }

    //=== Inventory ===//

    pub fn equip(&mut self, slot: u16) -> Result<()> {
        self.send_result(build_equip(slot))
    }

    pub fn unequip(&mut self, slot: u16) -> Result<()> {
        self.send_result(build_unequip(slot))
    }

    /// Ask for the drop at a position
    pub fn pickup(&mut self, x: i32, y: i32) -> Result<()> {
        self.send_result(build_pickup(x, y))
    }

    //=== Attributes ===//

    pub fn raise_attribute(&mut self, id: AttributeId) -> Result<()> {
        self.send_result(build_raise_attribute(id))
    }

    pub fn lower_attribute(&mut self, id: AttributeId) -> Result<()> {
        self.send_result(build_lower_attribute(id))
    }

    /// Apply a batch of point changes
    ///
    /// Lowering frees points, so every lowering is sent before any raising.
    /// Each unit of a delta is one request.
    pub fn modify_attributes(&mut self, changes: &[(AttributeId, i32)]) -> Result<()> {
        for &(id, delta) in changes.iter().filter(|(_, delta)| *delta < 0) {
            for _ in 0..delta.unsigned_abs() {
                self.lower_attribute(id)?;
            }
        }
        for &(id, delta) in changes.iter().filter(|(_, delta)| *delta > 0) {
            for _ in 0..delta {
                self.raise_attribute(id)?;
            }
        }
        Ok(())
    }

    //=== NPC & Shop ===//

    /// Start a dialogue with an NPC
    ///
    /// # Errors
    /// - [`InteractionError::UnknownBeing`] if no such being is on the map
    /// - [`InteractionError::NotAnNpc`] if the being is not an NPC
    /// - [`InteractionError::WrongState`] if a dialogue is already running
    pub fn talk_to_npc(&mut self, npc: BeingId) -> InteractionResult<()> {
        let being = self
            .directory
            .get(npc)
            .ok_or(InteractionError::UnknownBeing(npc))?;
        if !being.is_npc() {
            return Err(InteractionError::NotAnNpc(npc));
        }
        let msg = build_npc_talk(npc)?;
        self.npc.request_talk(npc)?;
        self.send(msg);
        Ok(())
    }

    /// Acknowledge the current NPC message
    pub fn next_npc_message(&mut self) -> InteractionResult<()> {
        let target = self.npc.acknowledge()?;
        self.send(build_npc_talk_next(target)?);
        Ok(())
    }

    /// Pick one of the offered choices; `choice` is zero-based
    pub fn choose_npc_option(&mut self, choice: usize) -> InteractionResult<()> {
        let target = self.npc.choose(choice)?;
        self.send(build_npc_select(target, choice)?);
        Ok(())
    }

    /// Answer a number request
    pub fn send_npc_number(&mut self, number: i32) -> InteractionResult<()> {
        let target = self.npc.submit_number(number)?;
        self.send(build_npc_number(target, number)?);
        Ok(())
    }

    /// Buy or sell, depending on the open listing
    pub fn buy_sell(&mut self, item: ItemId, amount: u16) -> InteractionResult<()> {
        self.npc.trade_target()?;
        self.send(build_buy_sell(item, amount)?);
        Ok(())
    }

    //=== Abilities ===//

    pub fn use_ability_on_point(&mut self, ability: AbilityId, x: i32, y: i32) -> InteractionResult<()> {
        self.ensure_ability_ready()?;
        self.send(build_use_ability_on_point(ability, x, y)?);
        Ok(())
    }

    /// Use an ability in the direction the player faces
    pub fn use_ability_on_direction(&mut self, ability: AbilityId) -> InteractionResult<()> {
        self.ensure_ability_ready()?;
        let direction = self
            .directory
            .player()
            .map(|player| player.direction)
            .ok_or(InteractionError::NoPlayer)?;
        self.send(build_use_ability_on_direction(ability, direction)?);
        Ok(())
    }

    fn ensure_ability_ready(&self) -> InteractionResult<()> {
        if self.cooldown.is_active(self.clock) {
            return Err(InteractionError::CooldownActive);
        }
        Ok(())
    }
}
