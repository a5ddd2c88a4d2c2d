//! Fighters and the host capabilities they report to
//!
//! A [`Fighter`] pairs simulation-owned state with three things the host
//! owns: a scene node to move and animate, the collider extents read from
//! the host's collider, and a health bar widget. The simulation only ever
//! writes to the node and health bar; it never reads rendering state back.

use crate::ai::FighterView;
use crate::buffer::InputBuffer;
use crate::config::FighterTuning;
use crate::mode::BufferRole;
use clash_core::{Action, Intent};
use std::fmt;
use std::sync::Arc;

/// Host scene node a fighter drives
pub trait SceneNode: Send {
    /// Place the node; `y` grows upwards from the floor
    fn set_position(&mut self, x: f32, y: f32);

    /// Switch to the named animation
    fn play(&mut self, animation: &str);
}

/// Host health bar widget
///
/// Shared with the scene that lays it out, hence `&self`.
pub trait HealthDisplay: Send + Sync {
    /// Show `percentage` in `[0, 100]`
    fn set_health_percentage(&self, percentage: f32);
}

/// No-op node and health bar for headless hosts
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl SceneNode for Headless {
    fn set_position(&mut self, _x: f32, _y: f32) {}

    fn play(&mut self, _animation: &str) {}
}

impl HealthDisplay for Headless {
    fn set_health_percentage(&self, _percentage: f32) {}
}

/// Axis-aligned hurtbox extents, anchored at the fighter's feet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderShape {
    pub half_width: f32,
    /// Half the standing height
    pub half_height: f32,
}

impl ColliderShape {
    /// Extents from tuning defaults
    pub fn from_tuning(tuning: &FighterTuning) -> Self {
        Self {
            half_width: tuning.collider_half_width,
            half_height: tuning.collider_half_height,
        }
    }
}

/// An axis-aligned box in stage coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Aabb {
    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

/// Movement and combat state the simulation advances every tick
#[derive(Debug, Clone, PartialEq)]
pub struct FighterState {
    pub x: f32,
    pub y: f32,
    pub velocity_y: f32,
    /// -1.0 facing left, 1.0 facing right
    pub facing: f32,
    pub grounded: bool,
    pub crouching: bool,
    pub walking: bool,
    pub health: f32,
    /// Remaining active ticks of the current punch
    pub attack_ticks: u32,
    /// Ticks until another punch may start
    pub cooldown_ticks: u32,
    /// Whether the current punch already connected
    pub punch_landed: bool,
    pub last_intent: Intent,
    pub animation: &'static str,
}

impl FighterState {
    /// Fresh state standing at `x`
    pub fn spawn(x: f32, tuning: &FighterTuning) -> Self {
        Self {
            x,
            y: tuning.floor_y,
            velocity_y: 0.0,
            facing: 1.0,
            grounded: true,
            crouching: false,
            walking: false,
            health: tuning.max_health,
            attack_ticks: 0,
            cooldown_ticks: 0,
            punch_landed: false,
            last_intent: Intent::NONE,
            animation: "idle",
        }
    }

    /// Whether a punch hitbox is out
    pub fn is_punching(&self) -> bool {
        self.attack_ticks > 0
    }

    /// Whether the fighter has no health left
    pub fn is_knocked_out(&self) -> bool {
        self.health <= 0.0
    }

    /// Apply one tick of intent
    ///
    /// Returns true when a new punch started.
    pub(crate) fn step(&mut self, intent: Intent, delta_time: f32, tuning: &FighterTuning) -> bool {
        self.last_intent = intent;
        self.attack_ticks = self.attack_ticks.saturating_sub(1);
        self.cooldown_ticks = self.cooldown_ticks.saturating_sub(1);

        self.crouching = self.grounded && intent.is_pressed(Action::Crouch);

        let direction = if self.crouching { 0 } else { intent.horizontal() };
        self.walking = direction != 0;
        // Not `clamp`: tuning built by hand may carry inverted or NaN bounds
        self.x = (self.x + direction as f32 * tuning.walk_speed * delta_time)
            .max(tuning.stage_min_x)
            .min(tuning.stage_max_x);

        if self.grounded && !self.crouching && intent.is_pressed(Action::Jump) {
            self.velocity_y = tuning.jump_velocity;
            self.grounded = false;
        }
        if !self.grounded {
            self.velocity_y -= tuning.gravity * delta_time;
            self.y += self.velocity_y * delta_time;
            if self.y <= tuning.floor_y && self.velocity_y <= 0.0 {
                self.y = tuning.floor_y;
                self.velocity_y = 0.0;
                self.grounded = true;
            }
        }

        let can_punch = self.cooldown_ticks == 0 && self.attack_ticks == 0 && !self.crouching;
        if intent.is_pressed(Action::LightPunch) && can_punch {
            self.attack_ticks = tuning.punch_active_ticks;
            self.cooldown_ticks = tuning.punch_cooldown_ticks.max(tuning.punch_active_ticks);
            self.punch_landed = false;
            return true;
        }
        false
    }

    pub(crate) fn current_animation(&self) -> &'static str {
        if self.is_punching() {
            "light_punch"
        } else if !self.grounded {
            "jump"
        } else if self.crouching {
            "crouch"
        } else if self.walking {
            "walk"
        } else {
            "idle"
        }
    }

    pub(crate) fn view(&self) -> FighterView {
        FighterView {
            x: self.x,
            y: self.y,
            health: self.health,
            facing: self.facing,
            grounded: self.grounded,
            crouching: self.crouching,
            punching: self.is_punching(),
            last_intent: self.last_intent,
        }
    }
}

/// A fighter in the roster
pub struct Fighter {
    pub(crate) node: Box<dyn SceneNode>,
    pub(crate) collider: ColliderShape,
    pub(crate) input: InputBuffer,
    pub(crate) health_bar: Arc<dyn HealthDisplay>,
    pub(crate) state: FighterState,
}

impl Fighter {
    /// Pair host handles with an input buffer
    ///
    /// The buffer is fixed for the life of the fighter. State is reset to
    /// the roster slot's spawn point when the fighter joins a simulation.
    pub fn new(
        node: Box<dyn SceneNode>,
        collider: ColliderShape,
        input: InputBuffer,
        health_bar: Arc<dyn HealthDisplay>,
    ) -> Self {
        Self {
            node,
            collider,
            input,
            health_bar,
            state: FighterState::spawn(0.0, &FighterTuning::default()),
        }
    }

    /// Fighter with no host attached
    pub fn headless(input: InputBuffer, tuning: &FighterTuning) -> Self {
        Self::new(
            Box::new(Headless),
            ColliderShape::from_tuning(tuning),
            input,
            Arc::new(Headless),
        )
    }

    /// Current simulation state
    pub fn state(&self) -> &FighterState {
        &self.state
    }

    /// Collider extents
    pub fn collider(&self) -> ColliderShape {
        self.collider
    }

    /// The fighter's input buffer
    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    /// Which kind of input buffer drives this fighter
    pub fn role(&self) -> BufferRole {
        self.input.role()
    }

    /// Box the fighter can be hit in
    pub fn hurtbox(&self) -> Aabb {
        let height = if self.state.crouching {
            self.collider.half_height
        } else {
            self.collider.half_height * 2.0
        };
        Aabb {
            min_x: self.state.x - self.collider.half_width,
            max_x: self.state.x + self.collider.half_width,
            min_y: self.state.y,
            max_y: self.state.y + height,
        }
    }

    /// Box the current punch can hit, if one is out
    ///
    /// Sits at chest height, above a crouching opponent's hurtbox.
    pub fn hitbox(&self, tuning: &FighterTuning) -> Option<Aabb> {
        if !self.state.is_punching() {
            return None;
        }
        let front = self.state.x + self.state.facing * self.collider.half_width;
        let tip = front + self.state.facing * tuning.punch_reach;
        let standing = self.collider.half_height * 2.0;
        Some(Aabb {
            min_x: front.min(tip),
            max_x: front.max(tip),
            min_y: self.state.y + standing * 0.5,
            max_y: self.state.y + standing * 0.8,
        })
    }

    pub(crate) fn report_to_node(&mut self) {
        self.node.set_position(self.state.x, self.state.y);
        let animation = self.state.current_animation();
        if animation != self.state.animation {
            self.state.animation = animation;
            self.node.play(animation);
        }
    }

    pub(crate) fn report_health(&self, max_health: f32) {
        let percentage = (self.state.health / max_health * 100.0).clamp(0.0, 100.0);
        self.health_bar.set_health_percentage(percentage);
    }
}

impl fmt::Debug for Fighter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fighter")
            .field("role", &self.role())
            .field("collider", &self.collider)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> FighterTuning {
        FighterTuning::default()
    }

    #[test]
    fn test_walk_and_clamp() {
        let tuning = tuning();
        let mut state = FighterState::spawn(10.0, &tuning);
        state.step(Intent::NONE.with(Action::MoveLeft), 1.0, &tuning);
        assert_eq!(state.x, tuning.stage_min_x);
        assert!(state.walking);

        state.step(Intent::NONE.with(Action::MoveRight), 0.5, &tuning);
        assert_eq!(state.x, tuning.walk_speed * 0.5);
    }

    #[test]
    fn test_bad_stage_bounds_do_not_panic() {
        let inverted = FighterTuning {
            stage_min_x: 800.0,
            stage_max_x: 0.0,
            ..tuning()
        };
        let mut state = FighterState::spawn(400.0, &inverted);
        state.step(Intent::NONE.with(Action::MoveRight), 0.1, &inverted);
        assert_eq!(state.x, 0.0);

        let unbounded = FighterTuning {
            stage_min_x: f32::NAN,
            ..tuning()
        };
        let mut state = FighterState::spawn(400.0, &unbounded);
        state.step(Intent::NONE.with(Action::MoveLeft), 0.1, &unbounded);
        assert_eq!(state.x, 382.0);
    }

    #[test]
    fn test_crouch_blocks_walking_and_jumping() {
        let tuning = tuning();
        let mut state = FighterState::spawn(100.0, &tuning);
        let intent = Intent::from_actions([Action::Crouch, Action::MoveRight, Action::Jump]);
        state.step(intent, 0.1, &tuning);
        assert!(state.crouching);
        assert_eq!(state.x, 100.0);
        assert!(state.grounded);
    }

    #[test]
    fn test_jump_arc_lands() {
        let tuning = tuning();
        let mut state = FighterState::spawn(100.0, &tuning);
        state.step(Intent::NONE.with(Action::Jump), 1.0 / 60.0, &tuning);
        assert!(!state.grounded);
        assert!(state.y > tuning.floor_y);

        for _ in 0..120 {
            state.step(Intent::NONE, 1.0 / 60.0, &tuning);
        }
        assert!(state.grounded);
        assert_eq!(state.y, tuning.floor_y);
    }

    #[test]
    fn test_punch_cooldown() {
        let tuning = tuning();
        let mut state = FighterState::spawn(100.0, &tuning);
        let punch = Intent::NONE.with(Action::LightPunch);
        assert!(state.step(punch, 0.0, &tuning));
        assert!(state.is_punching());
        assert!(!state.step(punch, 0.0, &tuning));

        for _ in 0..tuning.punch_cooldown_ticks {
            state.step(Intent::NONE, 0.0, &tuning);
        }
        assert!(!state.is_punching());
        assert!(state.step(punch, 0.0, &tuning));
    }

    #[test]
    fn test_crouch_ducks_under_punch() {
        let tuning = tuning();
        let keys = std::sync::Arc::new(clash_core::KeyboardState::new());
        let input = || {
            InputBuffer::local(crate::config::ActionBindings::prefixed("p1"), keys.clone())
        };
        let mut attacker = Fighter::headless(input(), &tuning);
        let mut defender = Fighter::headless(input(), &tuning);
        attacker.state = FighterState::spawn(100.0, &tuning);
        defender.state = FighterState::spawn(150.0, &tuning);

        attacker.state.step(Intent::NONE.with(Action::LightPunch), 0.0, &tuning);
        let hitbox = attacker.hitbox(&tuning).unwrap();
        assert!(hitbox.overlaps(&defender.hurtbox()));

        defender.state.step(Intent::NONE.with(Action::Crouch), 0.0, &tuning);
        assert!(!hitbox.overlaps(&defender.hurtbox()));
    }

    #[test]
    fn test_animation_priority() {
        let tuning = tuning();
        let mut state = FighterState::spawn(100.0, &tuning);
        assert_eq!(state.current_animation(), "idle");
        state.step(Intent::NONE.with(Action::MoveRight), 0.1, &tuning);
        assert_eq!(state.current_animation(), "walk");
        state.step(Intent::NONE.with(Action::Crouch), 0.1, &tuning);
        assert_eq!(state.current_animation(), "crouch");
        state.step(Intent::NONE.with(Action::LightPunch), 0.1, &tuning);
        assert_eq!(state.current_animation(), "light_punch");
    }
}
