//! Action vocabulary and per-tick intent snapshots
//!
//! The set of actions is fixed and its order is part of the wire format:
//! every encoded intent carries one flag per action, in `Action::ALL` order.
//! New actions may only be appended.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A player action recognized by the fight simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    /// Walk towards the left edge of the stage
    MoveLeft,
    /// Walk towards the right edge of the stage
    MoveRight,
    /// Hold a crouch
    Crouch,
    /// Start a jump (edge-triggered)
    Jump,
    /// Throw a light punch (edge-triggered)
    LightPunch,
}

impl Action {
    /// Number of recognized actions
    pub const COUNT: usize = 5;

    /// All actions in wire order
    pub const ALL: [Action; Action::COUNT] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Crouch,
        Action::Jump,
        Action::LightPunch,
    ];

    /// Position of this action in the wire-order flag vector
    pub fn index(self) -> usize {
        match self {
            Action::MoveLeft => 0,
            Action::MoveRight => 1,
            Action::Crouch => 2,
            Action::Jump => 3,
            Action::LightPunch => 4,
        }
    }

    /// Canonical snake-case name (`"move_left"`, ...)
    pub fn name(self) -> &'static str {
        match self {
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::Crouch => "crouch",
            Action::Jump => "jump",
            Action::LightPunch => "light_punch",
        }
    }

    /// Whether the action is read on the press edge rather than held
    ///
    /// Jumps and punches fire once per press; movement and crouch follow
    /// the held state of the button.
    pub fn is_edge_triggered(self) -> bool {
        matches!(self, Action::Jump | Action::LightPunch)
    }

    fn bit(self) -> u8 {
        1 << self.index()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One tick's worth of player intent
///
/// A compact, immutable set of pressed actions. Builders return new values
/// instead of mutating, so a snapshot handed to the simulation never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Intent {
    bits: u8,
}

impl Intent {
    /// Nothing pressed
    pub const NONE: Intent = Intent { bits: 0 };

    /// Build an intent from a list of pressed actions
    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        actions.into_iter().fold(Self::NONE, Intent::with)
    }

    /// Return a copy with `action` pressed
    #[must_use]
    pub fn with(self, action: Action) -> Self {
        Self {
            bits: self.bits | action.bit(),
        }
    }

    /// Return a copy with `action` pressed or released
    #[must_use]
    pub fn with_state(self, action: Action, pressed: bool) -> Self {
        if pressed {
            self.with(action)
        } else {
            Self {
                bits: self.bits & !action.bit(),
            }
        }
    }

    /// Return a copy with only the held (level-triggered) actions
    ///
    /// A press edge belongs to a single tick; repeating an intent on a later
    /// tick must not repeat its jumps and punches.
    #[must_use]
    pub fn held_only(self) -> Self {
        Action::ALL
            .into_iter()
            .filter(|a| a.is_edge_triggered())
            .fold(self, |intent, action| intent.with_state(action, false))
    }

    /// Check whether an action is pressed
    pub fn is_pressed(&self, action: Action) -> bool {
        self.bits & action.bit() != 0
    }

    /// Iterate pressed actions in wire order
    pub fn pressed(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(|a| self.is_pressed(*a))
    }

    /// Check if no action is pressed
    pub fn is_idle(&self) -> bool {
        self.bits == 0
    }

    /// Horizontal direction requested: -1, 0 or 1
    ///
    /// Pressing both directions cancels out.
    pub fn horizontal(&self) -> i8 {
        let left = self.is_pressed(Action::MoveLeft) as i8;
        let right = self.is_pressed(Action::MoveRight) as i8;
        right - left
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_idle() {
            return f.write_str("{}");
        }
        let names: Vec<_> = self.pressed().map(Action::name).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
