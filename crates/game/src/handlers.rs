//! # Message Handlers
//!
//! One function per inbound message type, registered in
//! [`HandlerRegistry`](crate::dispatch::HandlerRegistry). A handler reads the
//! whole payload before it touches any state, so a truncated message never
//! leaves a half-applied update behind.
//!
//! References to beings or abilities the client does not know about are
//! warned and skipped; they do not fail the message.

use crate::abilities::ticks_to_duration;
use crate::attributes::{tps_to_pixels, MOVE_SPEED_ATTRIBUTE};
use crate::being::{Being, BeingKind, CharacterLooks};
use crate::client::GameClient;
use crate::events::GameEvent;
use crate::npc::NumberRequest;
use crate::shop::{ShopMode, TradedItem};
use mana_core::{AbilityId, BeingId, ItemId, MapName, Position, Result};
use mana_protocol::{
    read_repeated, AbilityStatusEntry, AttributeEntry, BeingAction, BeingDetails, BeingDirection,
    BeingEnter, ErrorCode, InventoryFullEntry, InventoryPatchEntry, Looks, MessageIn, MoveEntry,
    QuestlogEntry, ShopItemEntry, TOKEN_LENGTH,
};

//=== Session & Map ===//

pub(crate) fn handle_connect_response(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let code = ErrorCode::from_u8(msg.read_u8()?);
    client.on_connect_response(code);
    Ok(())
}

pub(crate) fn handle_disconnect_response(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let code = ErrorCode::from_u8(msg.read_u8()?);
    if code != ErrorCode::Ok {
        tracing::warn!("Disconnect refused with code {}", code.as_u8());
        return Ok(());
    }
    let token = msg.read_fixed_string(TOKEN_LENGTH)?;
    client.on_disconnect_accepted(token);
    Ok(())
}

pub(crate) fn handle_map_change(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let name = msg.read_string()?;
    let x = msg.read_i16()?;
    let y = msg.read_i16()?;
    client.change_map(MapName::from(name), x.into(), y.into());
    Ok(())
}

//=== Inventory ===//

pub(crate) fn handle_inventory(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let patches = read_repeated(msg, InventoryPatchEntry::read)?;
    for patch in patches {
        client.inventory.patch(patch);
    }
    client.emit(GameEvent::InventoryChanged);
    Ok(())
}

pub(crate) fn handle_inventory_full(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let entries = InventoryFullEntry::read_all(msg)?;
    client.inventory.replace_all(entries);
    client.emit(GameEvent::InventoryChanged);
    Ok(())
}

pub(crate) fn handle_equip(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let slot = msg.read_u16()?;
    let equip_slot = msg.read_u16()?;
    if !client.inventory.equip(slot, equip_slot) {
        tracing::warn!("Equip for empty inventory slot {}", slot);
        return Ok(());
    }
    client.emit(GameEvent::InventoryChanged);
    Ok(())
}

pub(crate) fn handle_unequip(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let slot = msg.read_u16()?;
    if !client.inventory.unequip(slot) {
        tracing::warn!("Unequip for empty inventory slot {}", slot);
        return Ok(());
    }
    client.emit(GameEvent::InventoryChanged);
    Ok(())
}

//=== Attributes ===//

pub(crate) fn handle_attribute_change(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let entries = read_repeated(msg, AttributeEntry::read)?;
    for entry in entries {
        client.attributes.set(entry.id, entry.base, entry.modified);
        if entry.id == MOVE_SPEED_ATTRIBUTE {
            client.restore_walk_speed();
        }
        client.emit(GameEvent::AttributeChanged(entry.id));
    }
    Ok(())
}

pub(crate) fn handle_attribute_points(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let attribute = msg.read_u16()?;
    let correction = msg.read_u16()?;
    let (attribute_changed, correction_changed) = client.attributes.set_points(attribute, correction);
    if attribute_changed {
        client.emit(GameEvent::AttributePointsChanged(attribute));
    }
    if correction_changed {
        client.emit(GameEvent::CorrectionPointsChanged(correction));
    }
    Ok(())
}

//=== Beings ===//

pub(crate) fn handle_being_enter(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let enter = BeingEnter::read(msg)?;

    let kind = match enter.details {
        BeingDetails::Character { name, looks } => BeingKind::Character {
            name,
            looks: CharacterLooks::from(looks),
        },
        BeingDetails::Npc { sprite, name } => BeingKind::Npc { sprite, name },
        BeingDetails::Monster { species, name } => BeingKind::Monster { species, name },
        BeingDetails::Unsupported(kind) => {
            tracing::debug!("Ignoring {:?} entering as being {}", kind, enter.id);
            return Ok(());
        }
        BeingDetails::Unknown(tag) => {
            tracing::warn!("Being {} has unknown type {}", enter.id, tag);
            return Ok(());
        }
    };

    let mut being = Being::new(
        enter.id,
        kind,
        Position::new(enter.x.into(), enter.y.into()),
    );
    being.action = enter.action;
    being.direction = enter.direction;
    being.gender = enter.gender;

    let is_player = being.is_character() && being.name() == client.player_name;
    let was_player = client.directory.player_id() == Some(enter.id);
    client.directory.insert(being);
    client.emit(GameEvent::BeingAdded(enter.id));

    if is_player {
        client.bind_player(enter.id);
    } else if was_player {
        tracing::warn!("Being {} replaced the local player", enter.id);
        client.emit(GameEvent::PlayerChanged(None));
    }
    Ok(())
}

pub(crate) fn handle_being_leave(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let id = BeingId::new(msg.read_u16()?);
    let was_player = client.directory.player_id() == Some(id);
    if client.directory.remove(id).is_none() {
        tracing::warn!("Unknown being {} left", id);
        return Ok(());
    }
    if was_player {
        client.emit(GameEvent::PlayerChanged(None));
    }
    client.emit(GameEvent::BeingRemoved(id));
    Ok(())
}

pub(crate) fn handle_item_appear(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let item = ItemId::new(msg.read_u16()?);
    let x = msg.read_i16()?;
    let y = msg.read_i16()?;
    client.drops.add(item, x.into(), y.into());
    client.emit(GameEvent::DropsChanged);
    Ok(())
}

pub(crate) fn handle_looks_change(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let id = BeingId::new(msg.read_u16()?);
    let looks = Looks::read(msg)?;

    let Some(being) = client.directory.get_mut(id) else {
        tracing::warn!("Looks change for unknown being {}", id);
        return Ok(());
    };
    if !being.apply_looks(CharacterLooks::from(looks)) {
        tracing::warn!("Looks change for being {} which is not a character", id);
        return Ok(());
    }
    client.emit(GameEvent::BeingLooksChanged(id));
    Ok(())
}

pub(crate) fn handle_action_change(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let id = BeingId::new(msg.read_u16()?);
    let action = BeingAction::from_u8(msg.read_u8()?);

    let Some(being) = client.directory.get_mut(id) else {
        tracing::warn!("Action change for unknown being {}", id);
        return Ok(());
    };
    // The reconciler stops walking beings itself once they arrive
    if action == BeingAction::Stand && being.action == BeingAction::Walk {
        return Ok(());
    }
    being.action = action;

    if action == BeingAction::Dead && client.directory.player_id() == Some(id) {
        tracing::info!("Local player died");
        client.emit(GameEvent::PlayerDied);
    }
    Ok(())
}

pub(crate) fn handle_direction_change(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let id = BeingId::new(msg.read_u16()?);
    let direction = BeingDirection::from_u8(msg.read_u8()?);
    match client.directory.get_mut(id) {
        Some(being) => being.direction = direction,
        None => tracing::warn!("Direction change for unknown being {}", id),
    }
    Ok(())
}

pub(crate) fn handle_beings_move(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let moves = read_repeated(msg, MoveEntry::read)?;
    for entry in moves {
        let Some(being) = client.directory.get_mut(entry.id) else {
            tracing::warn!("Move for unknown being {}", entry.id);
            continue;
        };
        let Some(destination) = entry.destination else {
            continue;
        };
        if destination.speed != 0 {
            being.walk_speed = tps_to_pixels(destination.tiles_per_second().into());
        }
        being.server_position = Position::new(destination.x.into(), destination.y.into());
    }
    Ok(())
}

pub(crate) fn handle_items(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let items = read_repeated(msg, |m| {
        Ok((ItemId::new(m.read_u16()?), m.read_i16()?, m.read_i16()?))
    })?;
    for (item, x, y) in items {
        if item.is_none() {
            client.drops.remove_at(x.into(), y.into());
        } else {
            client.drops.add(item, x.into(), y.into());
        }
    }
    client.emit(GameEvent::DropsChanged);
    Ok(())
}

//=== Abilities ===//

/// What a being aimed an ability at
enum AbilityAim {
    Point(Position),
    Being(BeingId),
    Direction(BeingDirection),
}

/// How the user of an ability turns
enum Facing {
    Toward(Position),
    Direction(BeingDirection),
}

fn apply_ability_use(client: &mut GameClient, id: BeingId, ability: AbilityId, aim: AbilityAim) {
    let facing = match aim {
        AbilityAim::Point(point) => Facing::Toward(point),
        AbilityAim::Direction(direction) => Facing::Direction(direction),
        AbilityAim::Being(target_id) => match client.directory.get(target_id) {
            Some(target) => Facing::Toward(target.position),
            None => {
                tracing::warn!("Being {} used ability {:?} on unknown being {}", id, ability, target_id);
                return;
            }
        },
    };

    let Some(info) = client.ability_db.get(ability) else {
        tracing::warn!("Being {} used unknown ability {:?}", id, ability);
        return;
    };
    let action = BeingAction::from_name(&info.use_action).unwrap_or_else(|| {
        tracing::warn!("Ability {:?} has unknown use action '{}'", ability, info.use_action);
        BeingAction::Attack
    });

    let Some(being) = client.directory.get_mut(id) else {
        tracing::warn!("Unknown being {} used ability {:?}", id, ability);
        return;
    };
    if being.is_dead() {
        return;
    }
    match facing {
        Facing::Toward(point) => {
            being.look_at(point);
        }
        Facing::Direction(direction) => being.direction = direction,
    }
    being.action = action;
    client.emit(GameEvent::AbilityUsed { being: id, ability });
}

pub(crate) fn handle_ability_on_point(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let id = BeingId::new(msg.read_u16()?);
    let ability = AbilityId::new(msg.read_u8()?);
    let x = msg.read_i16()?;
    let y = msg.read_i16()?;
    let point = Position::new(x.into(), y.into());
    apply_ability_use(client, id, ability, AbilityAim::Point(point));
    Ok(())
}

pub(crate) fn handle_ability_on_being(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let id = BeingId::new(msg.read_u16()?);
    let ability = AbilityId::new(msg.read_u8()?);
    let target = BeingId::new(msg.read_u16()?);
    apply_ability_use(client, id, ability, AbilityAim::Being(target));
    Ok(())
}

pub(crate) fn handle_ability_on_direction(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let id = BeingId::new(msg.read_u16()?);
    let ability = AbilityId::new(msg.read_u8()?);
    let direction = BeingDirection::from_u8(msg.read_u8()?);
    apply_ability_use(client, id, ability, AbilityAim::Direction(direction));
    Ok(())
}

pub(crate) fn handle_ability_status(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let entries = read_repeated(msg, AbilityStatusEntry::read)?;
    for entry in entries {
        client.abilities.set(entry.id, ticks_to_duration(entry.remaining_ticks));
    }
    client.emit(GameEvent::AbilitiesChanged);
    Ok(())
}

pub(crate) fn handle_ability_removed(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let id = AbilityId::new(msg.read_u8()?);
    if client.abilities.remove(id) {
        client.emit(GameEvent::AbilitiesChanged);
    } else {
        tracing::warn!("Removal of unknown ability {:?}", id);
    }
    Ok(())
}

pub(crate) fn handle_ability_cooldown(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let ticks = msg.read_i16()?.max(0) as u32;
    client.cooldown.start(client.clock, ticks_to_duration(ticks));
    client.emit(GameEvent::AbilityCooldownChanged);
    Ok(())
}

//=== Chat ===//

pub(crate) fn handle_say(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let id = msg.read_u16()?;
    let text = msg.read_string()?;

    let being = if id == 0 {
        None
    } else {
        let id = BeingId::new(id);
        if !client.directory.contains(id) {
            tracing::warn!("Chat from unknown being {}", id);
            return Ok(());
        }
        Some(id)
    };
    client.emit(GameEvent::ChatMessage { being, text });
    Ok(())
}

//=== NPC ===//

/// Run a server-driven NPC transition and announce what it changed
fn npc_transition(client: &mut GameClient, apply: impl FnOnce(&mut crate::npc::NpcInteraction)) {
    let previous_state = client.npc.state();
    let previous_target = client.npc.target();

    apply(&mut client.npc);

    if client.npc.target() != previous_target {
        client.emit(GameEvent::NpcChanged(client.npc.target()));
    }
    if client.npc.state() != previous_state {
        client.emit(GameEvent::NpcStateChanged(client.npc.state()));
    }
}

pub(crate) fn handle_npc_choice(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let npc = BeingId::new(msg.read_u16()?);
    let choices = read_repeated(msg, MessageIn::read_string)?;
    npc_transition(client, |n| n.on_choices(npc, choices.clone()));
    client.emit(GameEvent::NpcChoicesChanged(choices));
    Ok(())
}

pub(crate) fn handle_npc_message(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let npc = BeingId::new(msg.read_u16()?);
    let text = msg.read_string()?;
    npc_transition(client, |n| n.on_message(npc, text.clone()));
    client.emit(GameEvent::NpcMessageChanged(text));
    Ok(())
}

pub(crate) fn handle_npc_number(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let npc = BeingId::new(msg.read_u16()?);
    let request = NumberRequest {
        min: msg.read_i32()?,
        max: msg.read_i32()?,
        default: msg.read_i32()?,
    };
    npc_transition(client, |n| n.on_number_request(npc, request));
    Ok(())
}

pub(crate) fn handle_npc_close(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let npc = BeingId::new(msg.read_u16()?);
    if !client.npc.involves(npc) {
        tracing::debug!("Close from NPC {} we are not talking to", npc);
    }
    let shop_was_open = client.npc.shop().is_open();
    npc_transition(client, |n| n.close());
    if shop_was_open {
        client.emit(GameEvent::ShopItemsChanged);
    }
    Ok(())
}

fn open_shop(client: &mut GameClient, msg: &mut MessageIn, mode: ShopMode) -> Result<()> {
    let npc = BeingId::new(msg.read_u16()?);
    let items: Vec<TradedItem> = read_repeated(msg, ShopItemEntry::read)?
        .into_iter()
        .map(TradedItem::from)
        .collect();

    let mut accepted = false;
    npc_transition(client, |n| accepted = n.on_shop(npc));
    if !accepted {
        tracing::warn!("Shop listing from NPC {} we are not talking to", npc);
        return Ok(());
    }
    tracing::debug!("NPC {} opened a {:?} shop with {} items", npc, mode, items.len());
    client.npc.shop_mut().open(mode, items);
    client.emit(GameEvent::ShopOpened(mode));
    client.emit(GameEvent::ShopItemsChanged);
    Ok(())
}

pub(crate) fn handle_npc_buy(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    open_shop(client, msg, ShopMode::Buying)
}

pub(crate) fn handle_npc_sell(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    open_shop(client, msg, ShopMode::Selling)
}

pub(crate) fn handle_buy_sell_response(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let code = ErrorCode::from_u8(msg.read_u8()?);
    if code != ErrorCode::Ok {
        tracing::debug!("Trade refused with code {}", code.as_u8());
        return Ok(());
    }
    let item = ItemId::new(msg.read_u16()?);
    let amount = msg.read_u16()?;
    if client.npc.shop_mut().apply_trade(item, amount) {
        client.emit(GameEvent::ShopItemsChanged);
    } else {
        tracing::debug!("Trade of item {:?} not in the listing", item);
    }
    Ok(())
}

//=== Combat & Quests ===//

pub(crate) fn handle_beings_damage(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let hits = read_repeated(msg, |m| Ok((BeingId::new(m.read_u16()?), m.read_u16()?)))?;
    for (being, amount) in hits {
        if client.directory.contains(being) {
            client.emit(GameEvent::BeingDamaged { being, amount });
        } else {
            tracing::warn!("Damage for unknown being {}", being);
        }
    }
    Ok(())
}

pub(crate) fn handle_questlog_status(client: &mut GameClient, msg: &mut MessageIn) -> Result<()> {
    let updates = read_repeated(msg, QuestlogEntry::read)?;
    for update in updates {
        let id = client.quests.apply(update).id;
        client.emit(GameEvent::QuestChanged(id));
    }
    Ok(())
}
