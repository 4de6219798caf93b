//! # Inbound Message Records
//!
//! Typed views of the server messages whose payload has more structure than a
//! couple of scalar fields. Each record reads itself from a [`MessageIn`] and
//! fails with the codec's error if the payload is short.
//!
//! Repeated records (`...*` in the catalog) are read until the payload is
//! exhausted; see [`read_repeated`].

use crate::codecs::MessageIn;
use crate::enums::{
    BeingAction, BeingDirection, EntityType, Gender, QuestState, MOVING_DESTINATION,
    MOVING_POSITION, QUESTLOG_UPDATE_DESCRIPTION, QUESTLOG_UPDATE_STATE, QUESTLOG_UPDATE_TITLE,
};
use mana_core::{AbilityId, AttributeId, BeingId, Fixed256, ItemId, QuestId, Result};
use std::collections::BTreeMap;

/// Read records until the payload is exhausted
///
/// # Arguments
/// * `msg` - Message positioned at the first record
/// * `read` - Reader for one record
pub fn read_repeated<T>(
    msg: &mut MessageIn,
    mut read: impl FnMut(&mut MessageIn) -> Result<T>,
) -> Result<Vec<T>> {
    let mut records = Vec::new();
    while msg.has_unread() {
        records.push(read(msg)?);
    }
    Ok(records)
}

/// Hair and equipment appearance of a character
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Looks {
    pub hair_style: u8,
    pub hair_color: u8,
    /// Equipment slot -> item id; only present slots are listed
    pub equipment: BTreeMap<u8, ItemId>,
}

impl Looks {
    /// `{B hair style}{B hair color}[{B count}{B slot}{W item}*]`
    ///
    /// The equipment list is optional; a payload that ends after the hair
    /// fields means "no equipment changes".
    pub fn read(msg: &mut MessageIn) -> Result<Self> {
        let hair_style = msg.read_u8()?;
        let hair_color = msg.read_u8()?;
        let count = if msg.has_unread() { msg.read_u8()? } else { 0 };
        let mut equipment = BTreeMap::new();
        for _ in 0..count {
            let slot = msg.read_u8()?;
            let item = ItemId::new(msg.read_u16()?);
            equipment.insert(slot, item);
        }
        Ok(Self {
            hair_style,
            hair_color,
            equipment,
        })
    }
}

/// Variant-specific part of a BeingEnter message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeingDetails {
    Character { name: String, looks: Looks },
    Npc { sprite: u16, name: String },
    Monster { species: u16, name: String },
    /// Items and effects are not beings the client tracks
    Unsupported(EntityType),
    /// Type tag outside the known range
    Unknown(u8),
}

/// BeingEnter: `{B type}{W id}{B action}{W x}{W y}{B dir}{B gender}{type specific}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeingEnter {
    pub id: BeingId,
    pub action: BeingAction,
    pub x: i16,
    pub y: i16,
    pub direction: BeingDirection,
    pub gender: Gender,
    pub details: BeingDetails,
}

impl BeingEnter {
    pub fn read(msg: &mut MessageIn) -> Result<Self> {
        let type_tag = msg.read_u8()?;
        let id = BeingId::new(msg.read_u16()?);
        let action = BeingAction::from_u8(msg.read_u8()?);
        let x = msg.read_i16()?;
        let y = msg.read_i16()?;
        let direction = BeingDirection::from_u8(msg.read_u8()?);
        let gender = Gender::from_u8(msg.read_u8()?);

        let details = match EntityType::from_u8(type_tag) {
            Some(EntityType::Character) => {
                let name = msg.read_string()?;
                let looks = Looks::read(msg)?;
                BeingDetails::Character { name, looks }
            }
            Some(EntityType::Npc) => {
                let sprite = msg.read_u16()?;
                let name = msg.read_string()?;
                BeingDetails::Npc { sprite, name }
            }
            Some(EntityType::Monster) => {
                let species = msg.read_u16()?;
                let name = msg.read_string()?;
                BeingDetails::Monster { species, name }
            }
            Some(other) => BeingDetails::Unsupported(other),
            None => BeingDetails::Unknown(type_tag),
        };

        Ok(Self {
            id,
            action,
            x,
            y,
            direction,
            gender,
            details,
        })
    }
}

/// Destination part of a BeingsMove record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveDestination {
    pub x: i16,
    pub y: i16,
    /// Tiles per second times ten
    pub speed: u8,
}

impl MoveDestination {
    /// Speed in tiles per second
    pub fn tiles_per_second(&self) -> f32 {
        self.speed as f32 / 10.0
    }
}

/// One record of BeingsMove: `{W id}{B flags}[{W px}{W py}][{W x}{W y}{B speed}]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveEntry {
    pub id: BeingId,
    /// Previous position; the client has no use for it but it must be consumed
    pub previous: Option<(i16, i16)>,
    pub destination: Option<MoveDestination>,
}

impl MoveEntry {
    pub fn read(msg: &mut MessageIn) -> Result<Self> {
        let id = BeingId::new(msg.read_u16()?);
        let flags = msg.read_u8()?;

        let previous = if flags & MOVING_POSITION != 0 {
            Some((msg.read_i16()?, msg.read_i16()?))
        } else {
            None
        };

        let destination = if flags & MOVING_DESTINATION != 0 {
            Some(MoveDestination {
                x: msg.read_i16()?,
                y: msg.read_i16()?,
                speed: msg.read_u8()?,
            })
        } else {
            None
        };

        Ok(Self {
            id,
            previous,
            destination,
        })
    }
}

/// One record of an Inventory patch: `{W slot}{W item}[{W amount} if item != 0]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryPatchEntry {
    pub slot: u16,
    pub item: ItemId,
    pub amount: u16,
}

impl InventoryPatchEntry {
    pub fn read(msg: &mut MessageIn) -> Result<Self> {
        let slot = msg.read_u16()?;
        let item = ItemId::new(msg.read_u16()?);
        let amount = if item.is_none() { 0 } else { msg.read_u16()? };
        Ok(Self { slot, item, amount })
    }
}

/// One record of InventoryFull: `{W slot}{W item}{W amount}{W equip slot}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryFullEntry {
    pub slot: u16,
    pub item: ItemId,
    pub amount: u16,
    pub equip_slot: u16,
}

impl InventoryFullEntry {
    pub fn read(msg: &mut MessageIn) -> Result<Self> {
        Ok(Self {
            slot: msg.read_u16()?,
            item: ItemId::new(msg.read_u16()?),
            amount: msg.read_u16()?,
            equip_slot: msg.read_u16()?,
        })
    }

    /// Read the counted list that makes up an InventoryFull payload
    pub fn read_all(msg: &mut MessageIn) -> Result<Vec<Self>> {
        let count = msg.read_u16()?;
        (0..count).map(|_| Self::read(msg)).collect()
    }
}

/// One record of PlayerAttributeChange: `{W id}{D base}{D modified}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeEntry {
    pub id: AttributeId,
    pub base: Fixed256,
    pub modified: Fixed256,
}

impl AttributeEntry {
    pub fn read(msg: &mut MessageIn) -> Result<Self> {
        Ok(Self {
            id: AttributeId::new(msg.read_u16()?),
            base: Fixed256::from_raw(msg.read_i32()?),
            modified: Fixed256::from_raw(msg.read_i32()?),
        })
    }
}

/// One record of NpcBuy/NpcSell: `{W item}{W amount}{W cost}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopItemEntry {
    pub item: ItemId,
    pub amount: u16,
    pub cost: u16,
}

impl ShopItemEntry {
    pub fn read(msg: &mut MessageIn) -> Result<Self> {
        Ok(Self {
            item: ItemId::new(msg.read_u16()?),
            amount: msg.read_u16()?,
            cost: msg.read_u16()?,
        })
    }
}

/// One record of AbilityStatus: `{B ability}{D remaining ticks}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityStatusEntry {
    pub id: AbilityId,
    pub remaining_ticks: u32,
}

impl AbilityStatusEntry {
    pub fn read(msg: &mut MessageIn) -> Result<Self> {
        let id = AbilityId::new(msg.read_u8()?);
        // Negative tick counts make no sense; treat them as "ready"
        let remaining_ticks = msg.read_i32()?.max(0) as u32;
        Ok(Self { id, remaining_ticks })
    }
}

/// One record of QuestlogStatus: `{W id}{B flags}[{B state}][{S title}][{S description}]`
///
/// Fields not named by the flags are `None` and must be left untouched by
/// whoever applies the update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestlogEntry {
    pub id: QuestId,
    pub state: Option<QuestState>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl QuestlogEntry {
    pub fn read(msg: &mut MessageIn) -> Result<Self> {
        let id = QuestId::new(msg.read_u16()?);
        let flags = msg.read_u8()?;

        let state = if flags & QUESTLOG_UPDATE_STATE != 0 {
            Some(QuestState::from_u8(msg.read_u8()?))
        } else {
            None
        };
        let title = if flags & QUESTLOG_UPDATE_TITLE != 0 {
            Some(msg.read_string()?)
        } else {
            None
        };
        let description = if flags & QUESTLOG_UPDATE_DESCRIPTION != 0 {
            Some(msg.read_string()?)
        } else {
            None
        };

        Ok(Self {
            id,
            state,
            title,
            description,
        })
    }
}
