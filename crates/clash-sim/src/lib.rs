//! Clash Sim - Two-fighter match simulation
//!
//! This crate drives a fighting-game match one physics tick at a time:
//!
//! - **Input buffers**: one per fighter, local device, AI, network sender
//!   or network receiver, all polled through the same contract
//! - **Match setup**: a game mode decides which buffer each fighter gets
//! - **Simulation**: movement, punches and knockouts in deterministic
//!   roster order, reported to host-owned scene nodes and health bars
//! - **Configuration**: RON match files with bindings and tuning
//!
//! # Architecture
//!
//! ```text
//!   MatchConfig ──▶ MatchSetup::build ──▶ BufferPair
//!                                            │
//!                                            ▼
//!  transport ──network_update()──▶ FighterSimulation ──update(dt)──▶ SceneNode
//!                                    │  fighter 0 │                   HealthDisplay
//!                                    │  fighter 1 │
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use clash_core::KeyboardState;
//! use clash_sim::{Fighter, FighterSimulation, GameMode, MatchConfig, MatchSetup};
//!
//! let config = MatchConfig::for_mode(GameMode::LocalAi);
//! let keys = Arc::new(KeyboardState::new());
//! let (p1, p2) = MatchSetup::build(&config, keys.clone(), None)?.into_buffers();
//!
//! let mut sim = FighterSimulation::new(config.tuning.clone());
//! sim.add_fighter(Fighter::headless(p1, &config.tuning))?;
//! sim.add_fighter(Fighter::headless(p2, &config.tuning))?;
//! sim.start()?;
//!
//! keys.press("p1_move_right");
//! sim.update(1.0 / 60.0)?;
//! assert!(sim.fighters()[0].state().x > 250.0);
//! # Ok::<(), clash_sim::Error>(())
//! ```

mod ai;
mod buffer;
mod config;
mod error;
mod fighter;
mod mode;
mod setup;
mod simulation;

pub use ai::{AiController, Decision, FighterView, Observation};
pub use buffer::{InputBuffer, LocalInput, LocalSource, NetworkSender};
pub use config::{ActionBindings, AiConfig, FighterTuning, MatchConfig, NetworkConfig};
pub use error::{Error, Result};
pub use fighter::{Aabb, ColliderShape, Fighter, FighterState, HealthDisplay, Headless, SceneNode};
pub use mode::{roles_for, BufferRole, GameMode};
pub use setup::{BufferPair, MatchSetup};
pub use simulation::{Dispatch, FighterId, FighterSimulation, Phase, SimEvent};
