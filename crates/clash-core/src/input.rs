//! Host input capability
//!
//! The simulation never talks to devices directly. A host engine exposes
//! named input actions (`"p1_jump"`, ...) through [`HostInput`]; local input
//! buffers hold a shared handle to it and query by name once per tick.

use parking_lot::Mutex;
use std::collections::HashSet;

/// Query interface onto the host's input system
///
/// Unknown action names must report "not pressed" rather than fail.
pub trait HostInput: Send + Sync {
    /// Is the named action currently held down
    fn is_action_pressed(&self, name: &str) -> bool;

    /// Did the named action go down during the current frame
    fn is_action_just_pressed(&self, name: &str) -> bool;
}

#[derive(Debug, Default)]
struct KeyState {
    held: HashSet<String>,
    just_pressed: HashSet<String>,
}

/// In-memory [`HostInput`] driven by explicit press/release calls
///
/// Used by headless hosts, replays and tests. Interior mutability lets the
/// host keep feeding key events while buffers hold shared references.
#[derive(Debug, Default)]
pub struct KeyboardState {
    keys: Mutex<KeyState>,
}

impl KeyboardState {
    /// Create a keyboard with nothing pressed
    pub fn new() -> Self {
        Self::default()
    }

    /// Press an action; it counts as just-pressed until [`end_frame`](Self::end_frame)
    pub fn press(&self, name: &str) {
        let mut keys = self.keys.lock();
        if keys.held.insert(name.to_string()) {
            keys.just_pressed.insert(name.to_string());
        }
    }

    /// Release an action
    pub fn release(&self, name: &str) {
        let mut keys = self.keys.lock();
        keys.held.remove(name);
        keys.just_pressed.remove(name);
    }

    /// Close the current frame, clearing press edges
    pub fn end_frame(&self) {
        self.keys.lock().just_pressed.clear();
    }

    /// Release everything
    pub fn clear(&self) {
        let mut keys = self.keys.lock();
        keys.held.clear();
        keys.just_pressed.clear();
    }
}

impl HostInput for KeyboardState {
    fn is_action_pressed(&self, name: &str) -> bool {
        self.keys.lock().held.contains(name)
    }

    fn is_action_just_pressed(&self, name: &str) -> bool {
        self.keys.lock().just_pressed.contains(name)
    }
}
