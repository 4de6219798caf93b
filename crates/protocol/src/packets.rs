//! # Message Identifier Catalog
//!
//! Every frame starts with a 16-bit message id. Ids are grouped by subsystem:
//!
//! - `0x01xx` - session, map and inventory
//! - `0x02xx` - beings, movement, abilities, chat and NPCs
//! - `0x03xx` - combat
//! - `0x08xx` - quest log
//!
//! `0x7FFF` is a reserved marker the server echoes back when it received a
//! message it could not parse. It is recognised but never handled.

/// Reserved "invalid message" marker
pub const INVALID_MESSAGE_ID: u16 = 0x7FFF;

/// Messages sent from the client to the game server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ClientMessage {
    /// `{B*32 token}`
    Connect = 0x0150,
    /// `{B reconnect to account server}`
    Disconnect = 0x0152,
    /// `{W x}{W y}`
    Pickup = 0x0110,
    /// `{W inventory slot}`
    Equip = 0x0112,
    /// `{W inventory slot}`
    Unequip = 0x0113,
    /// `{W attribute}`
    RaiseAttribute = 0x0160,
    /// `{W attribute}`
    LowerAttribute = 0x0170,
    Respawn = 0x0180,
    /// `{W x}{W y}`
    Walk = 0x0260,
    /// `{B direction}`
    DirectionChange = 0x0272,
    /// `{B ability}{W x}{W y}`
    UseAbilityOnPoint = 0x0290,
    /// `{B ability}{B direction}`
    UseAbilityOnDirection = 0x0292,
    /// `{S text}`
    Say = 0x02A0,
    /// `{W npc}`
    NpcTalk = 0x02B2,
    /// `{W npc}`
    NpcTalkNext = 0x02B3,
    /// `{W npc}{B choice + 1}`
    NpcSelect = 0x02B4,
    /// `{W npc}{D number}`
    NpcNumber = 0x02B5,
    /// `{W item}{W amount}`
    NpcBuySell = 0x02B6,
}

impl ClientMessage {
    #[inline]
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Messages sent from the game server to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ServerMessage {
    //=== Session & Map ===//

    /// `{S map}{W x}{W y}`
    PlayerMapChange = 0x0100,
    /// `{B error}`
    ConnectResponse = 0x0151,
    /// `{B error}{B*32 token}`
    DisconnectResponse = 0x0153,

    //=== Inventory ===//

    /// `{W slot}{W item}[{W amount} if item != 0]*`
    Inventory = 0x0120,
    /// `{W count}{W slot}{W item}{W amount}{W equip slot}*`
    InventoryFull = 0x0121,
    /// `{W inventory slot}{W equipment slot}`
    Equip = 0x0122,
    /// `{W inventory slot}`
    Unequip = 0x0123,

    //=== Attributes ===//

    /// `{W attribute}{D base / 256}{D modified / 256}*`
    PlayerAttributeChange = 0x0130,
    /// `{W attribute points}{W correction points}`
    AttributePointsStatus = 0x0140,

    //=== Beings ===//

    /// `{B type}{W id}{B action}{W x}{W y}{B dir}{B gender}{type specific}`
    BeingEnter = 0x0200,
    /// `{W id}`
    BeingLeave = 0x0201,
    /// `{W item}{W x}{W y}`
    ItemAppear = 0x0202,
    /// `{W id}{B hair style}{B hair color}[{B count}{B slot}{W item}*]`
    BeingLooksChange = 0x0210,
    /// `{W id}{B action}`
    BeingActionChange = 0x0271,
    /// `{W id}{B direction}`
    BeingDirChange = 0x0273,
    /// `{W id}{B flags}[{W px}{W py}][{W x}{W y}{B speed}]*`
    BeingsMove = 0x0280,
    /// `{W item}{W x}{W y}*`, item 0 removes the drop
    Items = 0x0281,

    //=== Abilities ===//

    /// `{W id}{B ability}{W x}{W y}`
    BeingAbilityOnPoint = 0x0294,
    /// `{W id}{B ability}{W target}`
    BeingAbilityOnBeing = 0x0295,
    /// `{W id}{B ability}{B direction}`
    BeingAbilityOnDirection = 0x0296,
    /// `{B ability}{D remaining ticks}*`
    AbilityStatus = 0x0298,
    /// `{B ability}`
    AbilityRemoved = 0x0299,
    /// `{W ticks}`
    AbilityCooldown = 0x029A,

    //=== Chat ===//

    /// `{W id, 0 = server}{S text}`
    Say = 0x02A1,

    //=== NPC ===//

    /// `{W npc}{S choice}*`
    NpcChoice = 0x02B0,
    /// `{W npc}{S text}`
    NpcMessage = 0x02B1,
    /// `{W npc}{W item}{W amount}{W cost}*`
    NpcBuy = 0x02B7,
    /// `{W npc}{W item}{W amount}{W cost}*`
    NpcSell = 0x02B8,
    /// `{B error}{W item}{W amount}`
    NpcBuySellResponse = 0x02B9,
    /// `{W npc}`
    NpcClose = 0x02BA,
    /// `{W npc}{D min}{D max}{D default}`
    NpcNumber = 0x02BB,

    //=== Combat ===//

    /// `{W id}{W amount}*`
    BeingsDamage = 0x0310,

    //=== Quests ===//

    /// `{W id}{B flags}[{B state}][{S title}][{S description}]*`
    QuestlogStatus = 0x0800,
}

impl ServerMessage {
    /// Every inbound message the client understands
    pub const ALL: [ServerMessage; 33] = [
        ServerMessage::PlayerMapChange,
        ServerMessage::ConnectResponse,
        ServerMessage::DisconnectResponse,
        ServerMessage::Inventory,
        ServerMessage::InventoryFull,
        ServerMessage::Equip,
        ServerMessage::Unequip,
        ServerMessage::PlayerAttributeChange,
        ServerMessage::AttributePointsStatus,
        ServerMessage::BeingEnter,
        ServerMessage::BeingLeave,
        ServerMessage::ItemAppear,
        ServerMessage::BeingLooksChange,
        ServerMessage::BeingActionChange,
        ServerMessage::BeingDirChange,
        ServerMessage::BeingsMove,
        ServerMessage::Items,
        ServerMessage::BeingAbilityOnPoint,
        ServerMessage::BeingAbilityOnBeing,
        ServerMessage::BeingAbilityOnDirection,
        ServerMessage::AbilityStatus,
        ServerMessage::AbilityRemoved,
        ServerMessage::AbilityCooldown,
        ServerMessage::Say,
        ServerMessage::NpcChoice,
        ServerMessage::NpcMessage,
        ServerMessage::NpcBuy,
        ServerMessage::NpcSell,
        ServerMessage::NpcBuySellResponse,
        ServerMessage::NpcClose,
        ServerMessage::NpcNumber,
        ServerMessage::BeingsDamage,
        ServerMessage::QuestlogStatus,
    ];

    /// Convert a raw id to a known inbound message
    ///
    /// # Returns
    /// - `Some(ServerMessage)` if the id is a known inbound message
    /// - `None` for unknown ids and for [`INVALID_MESSAGE_ID`]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0100 => Some(ServerMessage::PlayerMapChange),
            0x0151 => Some(ServerMessage::ConnectResponse),
            0x0153 => Some(ServerMessage::DisconnectResponse),
            0x0120 => Some(ServerMessage::Inventory),
            0x0121 => Some(ServerMessage::InventoryFull),
            0x0122 => Some(ServerMessage::Equip),
            0x0123 => Some(ServerMessage::Unequip),
            0x0130 => Some(ServerMessage::PlayerAttributeChange),
            0x0140 => Some(ServerMessage::AttributePointsStatus),
            0x0200 => Some(ServerMessage::BeingEnter),
            0x0201 => Some(ServerMessage::BeingLeave),
            0x0202 => Some(ServerMessage::ItemAppear),
            0x0210 => Some(ServerMessage::BeingLooksChange),
            0x0271 => Some(ServerMessage::BeingActionChange),
            0x0273 => Some(ServerMessage::BeingDirChange),
            0x0280 => Some(ServerMessage::BeingsMove),
            0x0281 => Some(ServerMessage::Items),
            0x0294 => Some(ServerMessage::BeingAbilityOnPoint),
            0x0295 => Some(ServerMessage::BeingAbilityOnBeing),
            0x0296 => Some(ServerMessage::BeingAbilityOnDirection),
            0x0298 => Some(ServerMessage::AbilityStatus),
            0x0299 => Some(ServerMessage::AbilityRemoved),
            0x029A => Some(ServerMessage::AbilityCooldown),
            0x02A1 => Some(ServerMessage::Say),
            0x02B0 => Some(ServerMessage::NpcChoice),
            0x02B1 => Some(ServerMessage::NpcMessage),
            0x02B7 => Some(ServerMessage::NpcBuy),
            0x02B8 => Some(ServerMessage::NpcSell),
            0x02B9 => Some(ServerMessage::NpcBuySellResponse),
            0x02BA => Some(ServerMessage::NpcClose),
            0x02BB => Some(ServerMessage::NpcNumber),
            0x0310 => Some(ServerMessage::BeingsDamage),
            0x0800 => Some(ServerMessage::QuestlogStatus),
            _ => None,
        }
    }

    #[inline]
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Classification of a raw inbound id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundId {
    /// A message with a handler
    Known(ServerMessage),
    /// The reserved invalid marker
    Invalid,
    /// Anything else
    Unknown(u16),
}

impl InboundId {
    pub fn classify(raw: u16) -> Self {
        if raw == INVALID_MESSAGE_ID {
            return InboundId::Invalid;
        }
        match ServerMessage::from_u16(raw) {
            Some(message) => InboundId::Known(message),
            None => InboundId::Unknown(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_ids_roundtrip() {
        for message in ServerMessage::ALL {
            assert_eq!(ServerMessage::from_u16(message.as_u16()), Some(message));
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(InboundId::classify(0x7FFF), InboundId::Invalid);
        assert_eq!(InboundId::classify(0x0201), InboundId::Known(ServerMessage::BeingLeave));
        assert_eq!(InboundId::classify(0x0fff), InboundId::Unknown(0x0fff));
    }

    #[test]
    fn test_client_and_server_ids_do_not_collide_with_marker() {
        assert_ne!(ClientMessage::Walk.as_u16(), INVALID_MESSAGE_ID);
        assert!(ServerMessage::from_u16(INVALID_MESSAGE_ID).is_none());
    }
}
