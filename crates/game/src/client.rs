//! # Game Client
//!
//! [`GameClient`] owns the local mirror of the world and is driven from one
//! logical thread by two inputs:
//!
//! - [`GameClient::handle_message`] for every inbound message, in arrival order
//! - [`GameClient::update`] for every tick of the external clock
//!
//! Neither blocks or performs I/O. Requests for the server pile up in an
//! outgoing queue that the transport drains with [`GameClient::take_outgoing`];
//! state changes are announced through the [`EventSink`].

use crate::abilities::{AbilityList, GlobalCooldown};
use crate::attributes::Attributes;
use crate::being::Being;
use crate::directory::EntityDirectory;
use crate::dispatch::HandlerRegistry;
use crate::drops::DropList;
use crate::events::{EventSink, GameEvent};
use crate::inventory::Inventory;
use crate::movement::{player_step, reconcile_remotes, PICKUP_INTERVAL, PICKUP_RADIUS};
use crate::npc::NpcInteraction;
use crate::quests::QuestLog;
use crate::session::Session;
use crate::shop::ShopSession;
use bytes::Bytes;
use mana_core::{ManaError, MapName, Result, Vector2};
use mana_protocol::{build_pickup, BeingAction, InboundId, MessageIn, MessageOut};
use mana_resources::{AbilityDb, MapCache, MapHandle};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Something for the transport to do
#[derive(Debug)]
pub enum Outgoing {
    /// Send a message to the server
    Message(MessageOut),
    /// Close the connection
    Close,
}

pub struct GameClient {
    pub(crate) player_name: String,
    pub(crate) session: Session,
    pub(crate) directory: EntityDirectory,
    pub(crate) drops: DropList,
    pub(crate) npc: NpcInteraction,
    pub(crate) inventory: Inventory,
    pub(crate) attributes: Attributes,
    pub(crate) abilities: AbilityList,
    pub(crate) cooldown: GlobalCooldown,
    pub(crate) quests: QuestLog,
    pub(crate) walk_direction: Vector2,
    /// Monotonic session time, advanced by ticks
    pub(crate) clock: Duration,
    pub(crate) last_pickup: Option<Duration>,
    pub(crate) maps: Arc<MapCache>,
    pub(crate) ability_db: Arc<AbilityDb>,
    pub(crate) events: EventSink,
    outbox: VecDeque<Outgoing>,
    registry: Arc<HandlerRegistry>,
}

impl GameClient {
    /// Create a client
    ///
    /// # Arguments
    /// * `player_name` - Name of the character this client plays
    /// * `maps` - Shared map cache
    /// * `ability_db` - Ability definitions
    /// * `events` - Where state changes are announced
    pub fn new(
        player_name: impl Into<String>,
        maps: Arc<MapCache>,
        ability_db: Arc<AbilityDb>,
        events: EventSink,
    ) -> Self {
        Self {
            player_name: player_name.into(),
            session: Session::default(),
            directory: EntityDirectory::new(),
            drops: DropList::new(),
            npc: NpcInteraction::new(),
            inventory: Inventory::new(),
            attributes: Attributes::new(),
            abilities: AbilityList::new(),
            cooldown: GlobalCooldown::default(),
            quests: QuestLog::new(),
            walk_direction: Vector2::ZERO,
            clock: Duration::ZERO,
            last_pickup: None,
            maps,
            ability_db,
            events,
            outbox: VecDeque::new(),
            registry: Arc::new(HandlerRegistry::with_default_handlers()),
        }
    }

    //=== Inbound ===//

    /// Split a transport frame and handle it
    pub fn handle_frame(&mut self, frame: Bytes) -> Result<()> {
        let msg = MessageIn::from_frame(frame)?;
        self.handle_message(msg)
    }

    /// Route one message to its handler
    ///
    /// # Errors
    /// Whatever the handler fails with. Errors for which
    /// [`ManaError::is_fatal`] holds mean the session must end.
    pub fn handle_message(&mut self, mut msg: MessageIn) -> Result<()> {
        match InboundId::classify(msg.id()) {
            InboundId::Invalid => {
                tracing::warn!("Server flagged one of our messages as invalid");
                Ok(())
            }
            InboundId::Unknown(id) => {
                tracing::debug!("Unknown message 0x{:04x} ({} bytes) dropped", id, msg.unread_len());
                Ok(())
            }
            InboundId::Known(message) => {
                let handler = self.registry.get(message).ok_or_else(|| {
                    ManaError::Protocol(format!("No handler registered for {:?}", message))
                })?;
                tracing::trace!("Handling {:?}", message);
                handler(self, &mut msg)?;
                if msg.has_unread() {
                    tracing::debug!("{:?}: {} trailing bytes ignored", message, msg.unread_len());
                }
                Ok(())
            }
        }
    }

    //=== Tick ===//

    /// Advance time by `dt`
    ///
    /// Moves remote beings toward their server positions, counts ability
    /// timers down and moves the local player.
    pub fn update(&mut self, dt: Duration) {
        self.clock += dt;
        self.abilities.advance(dt);

        let seconds = dt.as_secs_f32();
        reconcile_remotes(&mut self.directory, seconds);
        self.update_player(seconds);
    }

    fn update_player(&mut self, seconds: f32) {
        let Some(player) = self.directory.player() else {
            return;
        };
        if player.is_dead() || self.cooldown.is_active(self.clock) || self.session.map.is_none() {
            return;
        }
        let pos = player.position;
        let step = player.walk_speed * seconds;

        self.pickup_drops_in_range(pos);

        let direction = self.walk_direction;
        if direction.is_null() || step == 0.0 {
            self.stop_player();
            return;
        }

        let Some(map) = self.session.map.as_ref() else {
            return;
        };
        let next = player_step(pos, direction, step, &**map);

        let Some(player) = self.directory.player_mut() else {
            return;
        };
        if next == pos {
            // Blocked, but still face where the player wants to go
            player.look_at(pos + direction);
            if player.action == BeingAction::Walk {
                player.action = BeingAction::Stand;
            }
            return;
        }

        player.look_at(next);
        player.position = next;
        player.action = BeingAction::Walk;

        if let Err(e) = self.walk_to(next.x.round() as i32, next.y.round() as i32) {
            tracing::warn!("Could not report player position: {}", e);
        }
    }

    fn stop_player(&mut self) {
        if let Some(player) = self.directory.player_mut() {
            if player.action == BeingAction::Walk {
                player.action = BeingAction::Stand;
            }
        }
    }

    /// Ask for every drop in reach, at most once per pickup interval
    fn pickup_drops_in_range(&mut self, pos: mana_core::Position) {
        let in_range: Vec<(i32, i32)> = self
            .drops
            .in_range(pos, PICKUP_RADIUS)
            .map(|drop| (drop.x, drop.y))
            .collect();
        if in_range.is_empty() {
            return;
        }
        let due = self
            .last_pickup
            .map_or(true, |last| self.clock.saturating_sub(last) >= PICKUP_INTERVAL);
        if !due {
            return;
        }

        for (x, y) in in_range {
            if let Err(e) = self.send_result(build_pickup(x, y)) {
                tracing::warn!("Could not request pickup at ({}, {}): {}", x, y, e);
            }
        }
        self.last_pickup = Some(self.clock);
    }

    //=== Outgoing ===//

    /// Queue a message for the server
    pub fn send(&mut self, msg: MessageOut) {
        tracing::trace!("Queueing message 0x{:04x}", msg.id());
        self.outbox.push_back(Outgoing::Message(msg));
    }

    /// Queue a built message, passing on a build failure
    pub(crate) fn send_result(&mut self, msg: Result<MessageOut>) -> Result<()> {
        self.send(msg?);
        Ok(())
    }

    /// Ask the transport to close the connection
    pub fn request_close(&mut self) {
        self.outbox.push_back(Outgoing::Close);
    }

    /// Drain everything queued for the transport, oldest first
    pub fn take_outgoing(&mut self) -> Vec<Outgoing> {
        self.outbox.drain(..).collect()
    }

    pub fn has_outgoing(&self) -> bool {
        !self.outbox.is_empty()
    }

    #[inline]
    pub(crate) fn emit(&self, event: GameEvent) {
        self.events.emit(event);
    }

    //=== Accessors ===//

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.session.authenticated
    }

    /// Reconnect token handed out by the last disconnect
    pub fn token(&self) -> &str {
        &self.session.token
    }

    pub fn current_map(&self) -> &MapName {
        &self.session.map_name
    }

    /// Spawn coordinates sent with the last map change
    pub fn spawn(&self) -> (i32, i32) {
        self.session.spawn
    }

    pub fn map(&self) -> Option<&MapHandle> {
        self.session.map.as_ref()
    }

    pub fn beings(&self) -> &EntityDirectory {
        &self.directory
    }

    pub fn player(&self) -> Option<&Being> {
        self.directory.player()
    }

    pub fn walk_direction(&self) -> Vector2 {
        self.walk_direction
    }

    pub fn drops(&self) -> &DropList {
        &self.drops
    }

    pub fn npc(&self) -> &NpcInteraction {
        &self.npc
    }

    pub fn shop(&self) -> &ShopSession {
        self.npc.shop()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn abilities(&self) -> &AbilityList {
        &self.abilities
    }

    pub fn quests(&self) -> &QuestLog {
        &self.quests
    }

    /// Time left on the client-wide ability cooldown
    pub fn cooldown_remaining(&self) -> Duration {
        self.cooldown.remaining(self.clock)
    }

    /// Session time accumulated from ticks
    pub fn session_time(&self) -> Duration {
        self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::being::{BeingKind, CharacterLooks};
    use crate::events::EventReceiver;
    use mana_core::{BeingId, ItemId, Position};
    use mana_protocol::{ClientMessage, ServerMessage};
    use mana_resources::{CollisionLayer, MapLoader, MapResource};

    struct OpenFields;

    impl MapLoader for OpenFields {
        fn load(&self, name: &str) -> mana_resources::Result<MapResource> {
            Ok(MapResource::new(name, CollisionLayer::open(20, 20)))
        }
    }

    fn client() -> (GameClient, EventReceiver) {
        let (sink, receiver) = EventSink::channel();
        let maps = Arc::new(MapCache::new(OpenFields));
        let client = GameClient::new("Hero", maps, Arc::new(AbilityDb::default()), sink);
        (client, receiver)
    }

    fn with_player(client: &mut GameClient, x: f32, y: f32) {
        client.session.map = Some(client.maps.acquire("field").unwrap());
        let being = Being::new(
            BeingId::new(1),
            BeingKind::Character { name: "Hero".into(), looks: CharacterLooks::default() },
            Position::new(x, y),
        );
        client.directory.insert(being);
        client.directory.set_player(BeingId::new(1));
    }

    fn sent_ids(client: &mut GameClient) -> Vec<u16> {
        client
            .take_outgoing()
            .into_iter()
            .filter_map(|out| match out {
                Outgoing::Message(msg) => Some(msg.id()),
                Outgoing::Close => None,
            })
            .collect()
    }

    #[test]
    fn test_unknown_and_invalid_ids_are_dropped() {
        let (mut client, mut events) = client();
        client.handle_message(MessageIn::new(0x0fff, vec![1, 2, 3])).unwrap();
        client.handle_message(MessageIn::new(0x7fff, Vec::new())).unwrap();
        assert!(!client.has_outgoing());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_truncated_message_is_fatal() {
        let (mut client, _events) = client();
        let msg = MessageIn::new(ServerMessage::BeingLeave.as_u16(), vec![0x00]);
        let err = client.handle_message(msg).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_player_walk_is_reported() {
        let (mut client, _events) = client();
        with_player(&mut client, 100.0, 100.0);
        client.walk_direction = Vector2::new(1.0, 0.0);

        client.update(Duration::from_millis(100));
        let player = client.player().unwrap();
        assert_eq!(player.position, Position::new(115.0, 100.0));
        assert_eq!(player.action, BeingAction::Walk);
        assert_eq!(sent_ids(&mut client), vec![ClientMessage::Walk.as_u16()]);
    }

    #[test]
    fn test_no_input_stops_player() {
        let (mut client, _events) = client();
        with_player(&mut client, 100.0, 100.0);
        client.directory.player_mut().unwrap().action = BeingAction::Walk;

        client.update(Duration::from_millis(16));
        assert_eq!(client.player().unwrap().action, BeingAction::Stand);
        assert!(!client.has_outgoing());
    }

    #[test]
    fn test_pickup_is_rate_limited() {
        let (mut client, _events) = client();
        with_player(&mut client, 100.0, 100.0);
        client.drops.add(ItemId::new(4), 110, 100);
        client.drops.add(ItemId::new(5), 90, 100);

        client.update(Duration::from_millis(100));
        let pickup = ClientMessage::Pickup.as_u16();
        assert_eq!(sent_ids(&mut client), vec![pickup, pickup]);

        for _ in 0..9 {
            client.update(Duration::from_millis(100));
        }
        assert!(sent_ids(&mut client).is_empty());

        client.update(Duration::from_millis(100));
        assert_eq!(sent_ids(&mut client), vec![pickup, pickup]);
    }

    #[test]
    fn test_cooldown_freezes_player() {
        let (mut client, _events) = client();
        with_player(&mut client, 100.0, 100.0);
        client.walk_direction = Vector2::new(0.0, 1.0);
        client.cooldown.start(client.clock, Duration::from_secs(1));

        client.update(Duration::from_millis(500));
        assert_eq!(client.player().unwrap().position, Position::new(100.0, 100.0));
        assert!(!client.has_outgoing());
    }
}
