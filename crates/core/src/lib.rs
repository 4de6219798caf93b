//! Mana Core - Fundamental types and utilities

mod error;
mod fixed;
mod types;
mod positions;

pub use error::*;
pub use fixed::*;
pub use types::*;
pub use positions::*;
