//! # Message Builder
//!
//! Builder functions for every client-to-server message. Each returns a
//! finished [`MessageOut`] or the codec's range error; nothing is truncated to
//! fit a field.
//!
//! ## Usage
//!
//! ```rust
//! use mana_protocol::packet_builder::*;
//!
//! let msg = build_walk(320, 96).unwrap();
//! assert_eq!(msg.payload_len(), 4);
//! ```

use crate::codecs::MessageOut;
use crate::enums::{BeingDirection, TOKEN_LENGTH};
use crate::packets::ClientMessage;
use mana_core::{AbilityId, AttributeId, BeingId, ItemId, Result};

#[inline]
fn message(id: ClientMessage) -> MessageOut {
    MessageOut::new(id.as_u16())
}

/// Build a Connect message
///
/// # Packet Format
/// ```text
/// {0x0150}{B*32 token}
/// ```
///
/// # Arguments
/// * `token` - Credential handed out by the account server, at most 32 bytes
pub fn build_connect(token: &str) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::Connect);
    msg.write_fixed_string(token, TOKEN_LENGTH)?;
    Ok(msg)
}

/// Build a Disconnect message
///
/// # Arguments
/// * `reconnect` - Ask the server to hand the client back to the account server
pub fn build_disconnect(reconnect: bool) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::Disconnect);
    msg.write_i8(i8::from(reconnect))?;
    Ok(msg)
}

/// Build a Walk message: `{W x}{W y}` in pixels
pub fn build_walk(x: i32, y: i32) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::Walk);
    msg.write_i16(x)?;
    msg.write_i16(y)?;
    Ok(msg)
}

/// Build a DirectionChange message
pub fn build_direction_change(direction: BeingDirection) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::DirectionChange);
    msg.write_i8(direction.as_u8())?;
    Ok(msg)
}

/// Build a Say message
pub fn build_say(text: &str) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::Say);
    msg.write_string(text)?;
    Ok(msg)
}

/// Build a Respawn message (no payload)
pub fn build_respawn() -> MessageOut {
    message(ClientMessage::Respawn)
}

/// Build an NpcTalk message
pub fn build_npc_talk(npc: BeingId) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::NpcTalk);
    msg.write_u16(npc.get())?;
    Ok(msg)
}

/// Build an NpcTalkNext message
pub fn build_npc_talk_next(npc: BeingId) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::NpcTalkNext);
    msg.write_u16(npc.get())?;
    Ok(msg)
}

/// Build an NpcSelect message
///
/// # Packet Format
/// ```text
/// {0x02B4}{W npc}{B choice + 1}
/// ```
///
/// # Arguments
/// * `choice` - Zero-based index into the offered choices
pub fn build_npc_select(npc: BeingId, choice: usize) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::NpcSelect);
    msg.write_u16(npc.get())?;
    let wire_choice = i64::try_from(choice).unwrap_or(i64::MAX).saturating_add(1);
    msg.write_u8(wire_choice)?;
    Ok(msg)
}

/// Build an NpcNumber message: `{W npc}{D number}`
pub fn build_npc_number(npc: BeingId, number: i32) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::NpcNumber);
    msg.write_u16(npc.get())?;
    msg.write_i32(number)?;
    Ok(msg)
}

/// Build an NpcBuySell message: `{W item}{W amount}`
pub fn build_buy_sell(item: ItemId, amount: u16) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::NpcBuySell);
    msg.write_u16(item.get())?;
    msg.write_u16(amount)?;
    Ok(msg)
}

/// Build an Equip message
pub fn build_equip(slot: u16) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::Equip);
    msg.write_u16(slot)?;
    Ok(msg)
}

/// Build an Unequip message
pub fn build_unequip(slot: u16) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::Unequip);
    msg.write_u16(slot)?;
    Ok(msg)
}

/// Build a Pickup message for the drop lying at `(x, y)`
pub fn build_pickup(x: i32, y: i32) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::Pickup);
    msg.write_i16(x)?;
    msg.write_i16(y)?;
    Ok(msg)
}

/// Build a RaiseAttribute message
pub fn build_raise_attribute(attribute: AttributeId) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::RaiseAttribute);
    msg.write_u16(attribute.get())?;
    Ok(msg)
}

/// Build a LowerAttribute message
pub fn build_lower_attribute(attribute: AttributeId) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::LowerAttribute);
    msg.write_u16(attribute.get())?;
    Ok(msg)
}

/// Build a UseAbilityOnPoint message: `{B ability}{W x}{W y}`
pub fn build_use_ability_on_point(ability: AbilityId, x: i32, y: i32) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::UseAbilityOnPoint);
    msg.write_u8(ability.get())?;
    msg.write_i16(x)?;
    msg.write_i16(y)?;
    Ok(msg)
}

/// Build a UseAbilityOnDirection message: `{B ability}{B direction}`
pub fn build_use_ability_on_direction(
    ability: AbilityId,
    direction: BeingDirection,
) -> Result<MessageOut> {
    let mut msg = message(ClientMessage::UseAbilityOnDirection);
    msg.write_u8(ability.get())?;
    msg.write_i8(direction.as_u8())?;
    Ok(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::MessageIn;
    use mana_core::ManaError;

    #[test]
    fn test_connect_token_is_fixed_width() {
        let msg = build_connect("secret").unwrap();
        assert_eq!(msg.id(), 0x0150);
        assert_eq!(msg.payload_len(), 32);
        let mut input = MessageIn::from_frame(msg.into_bytes()).unwrap();
        assert_eq!(input.read_fixed_string(32).unwrap(), "secret");
    }

    #[test]
    fn test_connect_rejects_long_token() {
        let token = "t".repeat(40);
        assert!(matches!(build_connect(&token), Err(ManaError::FieldOutOfRange { .. })));
    }

    #[test]
    fn test_walk_layout() {
        let msg = build_walk(320, -1).unwrap();
        assert_eq!(msg.as_bytes(), &[0x02, 0x60, 0x01, 0x40, 0xff, 0xff]);
    }

    #[test]
    fn test_walk_out_of_range() {
        assert!(build_walk(40_000, 0).is_err());
    }

    #[test]
    fn test_npc_select_is_one_based() {
        let msg = build_npc_select(BeingId::new(3), 0).unwrap();
        assert_eq!(msg.as_bytes(), &[0x02, 0xB4, 0x00, 0x03, 0x01]);
        assert!(build_npc_select(BeingId::new(3), 255).is_err());
    }

    #[test]
    fn test_disconnect_reconnect_flag() {
        let msg = build_disconnect(true).unwrap();
        assert_eq!(msg.as_bytes(), &[0x01, 0x52, 0x01]);
    }

    #[test]
    fn test_use_ability_on_direction() {
        let msg = build_use_ability_on_direction(AbilityId::new(2), BeingDirection::Left).unwrap();
        assert_eq!(msg.as_bytes(), &[0x02, 0x92, 0x02, 0x04]);
    }

    #[test]
    fn test_respawn_has_no_payload() {
        assert_eq!(build_respawn().payload_len(), 0);
    }
}
