//! # Mana Client Networking
//!
//! Tokio transport for a [`mana_game::GameClient`].
//!
//! ## Modules
//!
//! - [`connection`] - Length-prefixed framing over TCP
//! - [`session`] - Connect, authenticate and drive the client until the session ends

pub mod connection;
pub mod session;

pub use connection::{frame_codec, Connection};
pub use session::{connect_and_run, run_session, SessionEnd};
