//! RON configuration for a match
//!
//! Every field has a default, so an empty `()` file is a valid local-vs-AI
//! match with the stock key bindings:
//!
//! ```ron
//! (
//!     mode: "ONLINE_PVP_HOST",
//!     player_one: { MoveLeft: "p1_move_left", MoveRight: "p1_move_right",
//!                   Crouch: "p1_crouch", Jump: "p1_jump", LightPunch: "p1_light_punch" },
//!     network: (queue_capacity: 180, overflow: DropOldest),
//!     ai: (seed: 7),
//!     round_seconds: 60.0,
//! )
//! ```

use crate::mode::{roles_for, GameMode};
use crate::{Error, Result};
use clash_core::{Action, RoundTimer};
use clash_netcode::{OverflowPolicy, DEFAULT_CAPACITY};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Map from action to the host input-action name that triggers it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionBindings(IndexMap<Action, String>);

impl ActionBindings {
    /// Bindings with no actions bound
    pub fn empty() -> Self {
        Self(IndexMap::new())
    }

    /// Bind every action to `<prefix>_<action name>`, e.g. `p1_move_left`
    pub fn prefixed(prefix: &str) -> Self {
        Self(
            Action::ALL
                .into_iter()
                .map(|action| (action, format!("{prefix}_{}", action.name())))
                .collect(),
        )
    }

    /// Bind `action` to a host action name, replacing any previous binding
    #[must_use]
    pub fn bind(mut self, action: Action, name: impl Into<String>) -> Self {
        self.0.insert(action, name.into());
        self
    }

    /// Host action name bound to `action`
    pub fn get(&self, action: Action) -> Option<&str> {
        self.0.get(&action).map(String::as_str)
    }

    /// Actions without a usable binding
    pub fn missing(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|a| self.get(*a).map_or(true, |name| name.trim().is_empty()))
            .collect()
    }
}

/// Movement and combat numbers
///
/// Distances are in stage units with `y = floor_y` at ground level and `y`
/// growing upwards; speeds are per second, durations in ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FighterTuning {
    pub walk_speed: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    pub floor_y: f32,
    pub stage_min_x: f32,
    pub stage_max_x: f32,
    /// How far a punch reaches past the front of the collider
    pub punch_reach: f32,
    pub punch_damage: f32,
    pub punch_active_ticks: u32,
    /// Ticks from the start of one punch until the next may start
    pub punch_cooldown_ticks: u32,
    pub max_health: f32,
    /// Spawn x for each roster slot; extra fighters spawn mid-stage
    pub spawn_x: Vec<f32>,
    pub collider_half_width: f32,
    pub collider_half_height: f32,
}

impl Default for FighterTuning {
    fn default() -> Self {
        Self {
            walk_speed: 180.0,
            jump_velocity: 420.0,
            gravity: 1200.0,
            floor_y: 0.0,
            stage_min_x: 0.0,
            stage_max_x: 800.0,
            punch_reach: 60.0,
            punch_damage: 10.0,
            punch_active_ticks: 6,
            punch_cooldown_ticks: 18,
            max_health: 100.0,
            spawn_x: vec![250.0, 550.0],
            collider_half_width: 24.0,
            collider_half_height: 48.0,
        }
    }
}

impl FighterTuning {
    /// Spawn position for roster slot `index`
    pub fn spawn_for(&self, index: usize) -> f32 {
        self.spawn_x
            .get(index)
            .copied()
            .unwrap_or((self.stage_min_x + self.stage_max_x) / 2.0)
    }

    fn validate(&self) -> Result<()> {
        let numbers = [
            ("walk_speed", self.walk_speed),
            ("jump_velocity", self.jump_velocity),
            ("gravity", self.gravity),
            ("floor_y", self.floor_y),
            ("stage_min_x", self.stage_min_x),
            ("stage_max_x", self.stage_max_x),
            ("punch_reach", self.punch_reach),
            ("punch_damage", self.punch_damage),
            ("max_health", self.max_health),
            ("collider_half_width", self.collider_half_width),
            ("collider_half_height", self.collider_half_height),
        ];
        if let Some((name, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::config(format!("tuning.{name} must be a finite number")));
        }
        if self.spawn_x.iter().any(|x| !x.is_finite()) {
            return Err(Error::config("tuning.spawn_x must hold finite numbers"));
        }
        if self.stage_max_x <= self.stage_min_x {
            return Err(Error::config("stage_max_x must be greater than stage_min_x"));
        }
        if self.max_health <= 0.0 {
            return Err(Error::config("max_health must be positive"));
        }
        if self.collider_half_width <= 0.0 || self.collider_half_height <= 0.0 {
            return Err(Error::config("collider extents must be positive"));
        }
        if self.punch_active_ticks == 0 {
            return Err(Error::config("punch_active_ticks must be at least 1"));
        }
        Ok(())
    }
}

/// Receiver-side network settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Maximum pending remote intents
    pub queue_capacity: usize,
    /// Behaviour once `queue_capacity` is reached
    pub overflow: OverflowPolicy,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_CAPACITY,
            overflow: OverflowPolicy::DropOldest,
        }
    }
}

/// AI opponent settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub seed: u64,
    /// Distance at which the AI stops approaching and starts punching
    pub engage_distance: f32,
    /// Per-tick probability of punching while engaged
    pub punch_chance: f32,
    /// Per-tick probability of jumping
    pub jump_chance: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            engage_distance: 100.0,
            punch_chance: 0.15,
            jump_chance: 0.01,
        }
    }
}

/// Root match configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Mode name, parsed at setup (`"LOCAL_AI"`, `"ONLINE_PVP_HOST"`, ...)
    pub mode: String,
    pub player_one: ActionBindings,
    pub player_two: ActionBindings,
    pub tuning: FighterTuning,
    pub network: NetworkConfig,
    pub ai: AiConfig,
    pub round_seconds: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::LocalAi.name().to_string(),
            player_one: ActionBindings::prefixed("p1"),
            player_two: ActionBindings::prefixed("p2"),
            tuning: FighterTuning::default(),
            network: NetworkConfig::default(),
            ai: AiConfig::default(),
            round_seconds: 99.0,
        }
    }
}

impl MatchConfig {
    /// Default configuration for `mode`
    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            mode: mode.name().to_string(),
            ..Self::default()
        }
    }

    /// Parse a configuration from RON text
    pub fn from_ron_str(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Load a configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Parsed game mode
    pub fn game_mode(&self) -> Result<GameMode> {
        self.mode.parse()
    }

    /// Bindings for the locally controlled buffer of each roster slot
    ///
    /// Online, the single local player always plays on the player-one keys,
    /// whichever roster slot their fighter occupies.
    pub fn bindings_for(&self, mode: GameMode, slot: usize) -> &ActionBindings {
        if mode.is_online() || slot == 0 {
            &self.player_one
        } else {
            &self.player_two
        }
    }

    /// Check everything a match needs before it is set up
    pub fn validate(&self) -> Result<GameMode> {
        let mode = self.game_mode()?;
        let (p1, p2) = roles_for(mode);
        for (slot, role) in [p1, p2].into_iter().enumerate() {
            if !role.reads_host_input() {
                continue;
            }
            let missing = self.bindings_for(mode, slot).missing();
            if !missing.is_empty() {
                let names: Vec<_> = missing.iter().map(|a| a.name()).collect();
                return Err(Error::config(format!(
                    "player {} has no binding for: {}",
                    slot + 1,
                    names.join(", ")
                )));
            }
        }
        if self.network.queue_capacity == 0 {
            return Err(Error::config("network.queue_capacity must be at least 1"));
        }
        RoundTimer::new(self.round_seconds)
            .map_err(|e| Error::config(format!("round_seconds: {e}")))?;
        self.tuning.validate()?;
        Ok(mode)
    }
}
