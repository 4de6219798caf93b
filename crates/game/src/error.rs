//! Error types for player-initiated requests

use crate::npc::NpcState;
use mana_core::{BeingId, ManaError};

/// A request the client refused to send
///
/// Every variant except [`InteractionError::Encode`] is a precondition the
/// caller violated; nothing has been sent when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum InteractionError {
    #[error("NPC interaction is {actual:?}, expected {expected:?}")]
    WrongState { expected: NpcState, actual: NpcState },

    #[error("No NPC is being talked to")]
    NoTarget,

    #[error("Being {0} is not an NPC")]
    NotAnNpc(BeingId),

    #[error("Unknown being {0}")]
    UnknownBeing(BeingId),

    #[error("Choice {choice} out of range ({available} offered)")]
    ChoiceOutOfRange { choice: usize, available: usize },

    #[error("Number {number} outside {min}..={max}")]
    NumberOutOfRange { number: i32, min: i32, max: i32 },

    #[error("No shop is open")]
    ShopClosed,

    #[error("Ability cooldown is active")]
    CooldownActive,

    #[error("No local player")]
    NoPlayer,

    #[error("Failed to encode request: {0}")]
    Encode(#[from] ManaError),
}

impl From<InteractionError> for ManaError {
    fn from(err: InteractionError) -> Self {
        match err {
            InteractionError::Encode(inner) => inner,
            other => ManaError::Interaction(other.to_string()),
        }
    }
}

pub type InteractionResult<T> = std::result::Result<T, InteractionError>;
