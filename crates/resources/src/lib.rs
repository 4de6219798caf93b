//! # Mana Resources
//!
//! Externally loaded data the game client consumes but does not own:
//!
//! - Map collision grids, shared through a keyed [`MapCache`] that hands out
//!   scope-bound [`MapHandle`]s and frees a map when its last handle is dropped
//! - The [`CollisionProvider`] seam used by client-side movement prediction
//! - The ability database ([`AbilityDb`])

pub mod error;
pub mod collision;
pub mod map;
pub mod cache;
pub mod abilities;

pub use error::{ResourceError, Result};
pub use collision::{CollisionLayer, CollisionProvider, BLOCKED_TILE};
pub use map::{MapLoader, MapResource, TextMapLoader};
pub use cache::{MapCache, MapHandle};
pub use abilities::{AbilityDb, AbilityInfo};
