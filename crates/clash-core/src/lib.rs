//! Clash Core - Shared vocabulary for the fight simulation
//!
//! This crate provides the types every other clash crate speaks:
//! - `Action` and `Intent` - the fixed action vocabulary and one tick's
//!   snapshot of which actions a player is pressing
//! - `Tick`, `Sequence` and `RoundTimer` - simulation time
//! - `GameRng` - deterministic randomness for AI opponents
//! - `HostInput` - the narrow capability local input buffers poll
//!
//! Nothing here knows about networking or fighters; `clash-netcode` and
//! `clash-sim` build on top of it.

mod action;
mod error;
mod input;
mod rng;
pub mod time;

pub use action::{Action, Intent};
pub use error::{Error, Result};
pub use input::{HostInput, KeyboardState};
pub use rng::GameRng;
pub use time::{RoundTimer, Sequence, Tick};
