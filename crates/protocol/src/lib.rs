//! # Mana Protocol Library
//!
//! Binary message protocol spoken between the game client and the game server.
//!
//! ## Architecture
//!
//! ### 1. Codecs Layer ([`codecs`])
//! Cursor-based reading and range-checked writing of big-endian integers,
//! length-prefixed strings and fixed-width zero-padded strings.
//!
//! ### 2. Message Ids ([`packets`])
//! The client-to-server and server-to-client id catalogs, plus the reserved
//! invalid marker.
//!
//! ### 3. Wire Enums ([`enums`])
//! Error codes, entity type tags, actions, directions and flag bits.
//!
//! ### 4. Inbound Records ([`packet_types`])
//! Typed views of structured server payloads.
//!
//! ### 5. Outbound Builders ([`packet_builder`])
//! One function per client-to-server message.
//!
//! ## Usage Example
//!
//! ```rust
//! use mana_protocol::{build_say, MessageIn, ClientMessage};
//!
//! let frame = build_say("hello").unwrap().into_bytes();
//! let mut msg = MessageIn::from_frame(frame).unwrap();
//! assert_eq!(msg.id(), ClientMessage::Say.as_u16());
//! assert_eq!(msg.read_string().unwrap(), "hello");
//! ```

pub mod codecs;
pub mod enums;
pub mod packets;
pub mod packet_types;
pub mod packet_builder;

// Re-export commonly used items
pub use codecs::*;
pub use enums::*;
pub use packets::*;
pub use packet_types::*;
pub use packet_builder::*;
