//! # Game Events
//!
//! Everything the display layer needs to know about is announced as a
//! [`GameEvent`] on an unbounded channel. Events describe what changed; the
//! current value is read back from the [`GameClient`](crate::GameClient).

use crate::npc::NpcState;
use crate::shop::ShopMode;
use mana_core::{AbilityId, AttributeId, BeingId, MapName, QuestId, Vector2};
use tokio::sync::mpsc;

/// State change notification
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    //=== Session ===//
    Authenticated,
    AuthenticationFailed { reason: String },
    Kicked,
    TokenChanged,
    Disconnected,
    MapChanged { name: MapName, x: i32, y: i32 },

    //=== Player ===//
    PlayerNameChanged(String),
    PlayerChanged(Option<BeingId>),
    PlayerWalkDirectionChanged(Vector2),
    PlayerDied,

    //=== Beings ===//
    BeingAdded(BeingId),
    BeingRemoved(BeingId),
    BeingsCleared,
    BeingLooksChanged(BeingId),
    AbilityUsed { being: BeingId, ability: AbilityId },
    ChatMessage { being: Option<BeingId>, text: String },
    BeingDamaged { being: BeingId, amount: u16 },

    //=== Models ===//
    DropsChanged,
    InventoryChanged,
    AttributeChanged(AttributeId),
    AttributePointsChanged(u16),
    CorrectionPointsChanged(u16),
    AbilitiesChanged,
    AbilityCooldownChanged,
    QuestChanged(QuestId),
    QuestsCleared,

    //=== NPC & Shop ===//
    NpcChanged(Option<BeingId>),
    NpcStateChanged(NpcState),
    NpcMessageChanged(String),
    NpcChoicesChanged(Vec<String>),
    ShopOpened(ShopMode),
    ShopItemsChanged,
}

/// Receiving end handed to the display layer
pub type EventReceiver = mpsc::UnboundedReceiver<GameEvent>;

/// Sending end owned by the client
#[derive(Debug, Clone)]
pub struct EventSink {
    sender: mpsc::UnboundedSender<GameEvent>,
}

impl EventSink {
    pub fn new(sender: mpsc::UnboundedSender<GameEvent>) -> Self {
        Self { sender }
    }

    /// Create a connected sink/receiver pair
    pub fn channel() -> (Self, EventReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }

    /// Emit an event; a closed receiver is not an error for the client
    #[inline]
    pub fn emit(&self, event: GameEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("Event receiver closed, event dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_after_receiver_dropped() {
        let (sink, receiver) = EventSink::channel();
        drop(receiver);
        sink.emit(GameEvent::Authenticated);
    }

    #[test]
    fn test_events_arrive_in_order() {
        let (sink, mut receiver) = EventSink::channel();
        sink.emit(GameEvent::Authenticated);
        sink.emit(GameEvent::BeingAdded(BeingId::new(3)));
        assert_eq!(receiver.try_recv().unwrap(), GameEvent::Authenticated);
        assert_eq!(receiver.try_recv().unwrap(), GameEvent::BeingAdded(BeingId::new(3)));
        assert!(receiver.try_recv().is_err());
    }
}
