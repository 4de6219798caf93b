//! # Session Lifecycle
//!
//! Authentication, map transitions, disconnects and the full reset that
//! follows losing the session.

use crate::client::GameClient;
use crate::events::GameEvent;
use crate::npc::NpcState;
use mana_core::{BeingId, MapName, Result, Vector2};
use mana_protocol::{build_connect, build_disconnect, ErrorCode};
use mana_resources::MapHandle;

/// Per-connection session state
#[derive(Debug, Default)]
pub struct Session {
    pub authenticated: bool,
    /// Credential used to (re)connect
    pub token: String,
    pub map_name: MapName,
    pub spawn: (i32, i32),
    /// The one map reference this session holds
    pub map: Option<MapHandle>,
}

impl GameClient {
    /// Send the credential token
    pub fn authenticate(&mut self, token: &str) -> Result<()> {
        self.session.token = token.to_string();
        self.send_result(build_connect(token))?;
        tracing::debug!("Sent connect request");
        Ok(())
    }

    /// Ask the server to hand us back to the account server
    pub fn leave(&mut self) -> Result<()> {
        self.send_result(build_disconnect(true))
    }

    /// Outcome of a connect request
    pub(crate) fn on_connect_response(&mut self, code: ErrorCode) {
        match code {
            ErrorCode::Ok => {
                tracing::info!("Authenticated with game server");
                self.session.authenticated = true;
                self.emit(GameEvent::Authenticated);
            }
            ErrorCode::ServerFull => {
                tracing::warn!("Connection refused: server full");
                self.emit(GameEvent::AuthenticationFailed {
                    reason: "The server is full".to_string(),
                });
                self.request_close();
            }
            ErrorCode::AdministrativeLogoff => {
                tracing::warn!("Kicked by the server");
                self.emit(GameEvent::Kicked);
            }
            ErrorCode::Other(code) => {
                tracing::warn!("Connection refused with code {}", code);
                self.emit(GameEvent::AuthenticationFailed {
                    reason: format!("Unknown error ({})", code),
                });
            }
        }
    }

    /// The server accepted our disconnect and issued a reconnect token
    pub(crate) fn on_disconnect_accepted(&mut self, token: String) {
        tracing::info!("Disconnected from game server");
        self.session.token = token;
        self.emit(GameEvent::TokenChanged);
        self.reset();
        self.request_close();
    }

    /// The transport went away
    pub fn on_disconnected(&mut self) {
        tracing::info!("Connection to game server lost");
        self.reset();
        self.emit(GameEvent::Disconnected);
    }

    /// Move to another map
    ///
    /// The previous map is released before the next one is acquired. If the
    /// new map cannot be loaded the client runs without collision data and
    /// does not move the local player.
    pub(crate) fn change_map(&mut self, name: MapName, x: i32, y: i32) {
        tracing::info!("Changing map to {} ({}, {})", name.get(), x, y);

        self.session.map = None;
        match self.maps.acquire(name.get()) {
            Ok(handle) => self.session.map = Some(handle),
            Err(e) => tracing::warn!("Could not load map {}: {}", name.get(), e),
        }

        self.session.map_name = name.clone();
        self.session.spawn = (x, y);
        self.clear_map_state();
        self.emit(GameEvent::MapChanged { name, x, y });
    }

    /// Bind the local player if a newly entered character carries our name
    pub(crate) fn bind_player(&mut self, id: BeingId) {
        if !self.directory.set_player(id) {
            return;
        }
        tracing::debug!("Local player is being {}", id);
        self.restore_walk_speed();
        self.emit(GameEvent::PlayerChanged(Some(id)));
    }

    /// Apply the movement speed attribute to the local player
    pub(crate) fn restore_walk_speed(&mut self) {
        let Some(speed) = self.attributes.walk_speed() else {
            return;
        };
        if let Some(player) = self.directory.player_mut() {
            player.walk_speed = speed;
        }
    }

    /// Forget everything tied to the current map
    fn clear_map_state(&mut self) {
        let had_player = self.directory.player_id().is_some();
        self.directory.clear();
        if had_player {
            self.emit(GameEvent::PlayerChanged(None));
        }
        self.emit(GameEvent::BeingsCleared);

        self.drops.clear();
        self.last_pickup = None;
        self.emit(GameEvent::DropsChanged);
    }

    /// Return to the state of a fresh, unauthenticated client
    ///
    /// The reconnect token and player name survive.
    pub fn reset(&mut self) {
        self.session.authenticated = false;

        if self.npc.state() != NpcState::Inactive || self.npc.requested().is_some() {
            self.npc.close();
            self.emit(GameEvent::NpcStateChanged(NpcState::Inactive));
            self.emit(GameEvent::NpcChanged(None));
        } else {
            self.npc.close();
        }

        self.set_player_walk_direction(Vector2::ZERO);

        if self.session.map.is_some() || !self.session.map_name.is_empty() {
            self.session.map = None;
            self.session.map_name = MapName::default();
            self.session.spawn = (0, 0);
            self.emit(GameEvent::MapChanged {
                name: MapName::default(),
                x: 0,
                y: 0,
            });
        }
        self.clear_map_state();

        let (attribute_changed, correction_changed) = self.attributes.set_points(0, 0);
        if attribute_changed {
            self.emit(GameEvent::AttributePointsChanged(0));
        }
        if correction_changed {
            self.emit(GameEvent::CorrectionPointsChanged(0));
        }
        self.attributes.clear();

        self.abilities.clear();
        self.cooldown.clear();
        self.emit(GameEvent::AbilitiesChanged);

        self.inventory.clear();
        self.emit(GameEvent::InventoryChanged);

        self.quests.clear();
        self.emit(GameEvent::QuestsCleared);
    }
}
