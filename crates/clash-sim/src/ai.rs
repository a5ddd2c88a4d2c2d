//! Scripted AI opponent
//!
//! An [`AiController`] binds every action to a decision function and
//! evaluates them in wire order against an [`Observation`] of the match.
//! All randomness comes from a seeded [`GameRng`], so two controllers with
//! the same seed fed the same observations produce the same intents.

use crate::config::AiConfig;
use clash_core::{Action, GameRng, Intent, Tick};
use indexmap::IndexMap;
use std::fmt;

/// What one fighter can see of itself or an opponent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FighterView {
    pub x: f32,
    pub y: f32,
    pub health: f32,
    /// -1.0 facing left, 1.0 facing right
    pub facing: f32,
    pub grounded: bool,
    pub crouching: bool,
    pub punching: bool,
    /// Intent the fighter acted on last tick
    pub last_intent: Intent,
}

/// Simulation state exposed to input buffers when they are polled
///
/// Only AI buffers read it; device and network buffers ignore it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub tick: Tick,
    pub me: FighterView,
    /// First other fighter in roster order, if any
    pub opponent: Option<FighterView>,
}

impl Observation {
    /// Horizontal distance to the opponent
    pub fn distance(&self) -> Option<f32> {
        self.opponent.map(|o| (o.x - self.me.x).abs())
    }

    /// -1 if the opponent is to the left, 1 if to the right, 0 if level or absent
    pub fn opponent_side(&self) -> i8 {
        match self.opponent {
            Some(o) if o.x < self.me.x => -1,
            Some(o) if o.x > self.me.x => 1,
            _ => 0,
        }
    }
}

/// Decides whether one action is pressed this tick
pub type Decision = Box<dyn Fn(&Observation, &AiConfig, &mut GameRng) -> bool + Send>;

/// Input source driven by decision functions instead of a device
pub struct AiController {
    config: AiConfig,
    rng: GameRng,
    decisions: IndexMap<Action, Decision>,
}

impl AiController {
    /// Controller with the stock heuristics, seeded from `config.seed`
    pub fn new(config: AiConfig) -> Self {
        let mut decisions: IndexMap<Action, Decision> = IndexMap::new();
        decisions.insert(Action::MoveLeft, decision(|obs, cfg, _| approach(obs, cfg) < 0));
        decisions.insert(Action::MoveRight, decision(|obs, cfg, _| approach(obs, cfg) > 0));
        decisions.insert(Action::Crouch, decision(duck_incoming_punch));
        decisions.insert(Action::Jump, decision(|_, cfg, rng| rng.chance(cfg.jump_chance)));
        decisions.insert(Action::LightPunch, decision(punch_when_engaged));
        Self {
            rng: GameRng::new(config.seed),
            config,
            decisions,
        }
    }

    /// Controller that never presses anything until decisions are added
    pub fn idle(config: AiConfig) -> Self {
        Self {
            rng: GameRng::new(config.seed),
            config,
            decisions: IndexMap::new(),
        }
    }

    /// Replace the decision function for `action`
    #[must_use]
    pub fn with_decision(
        mut self,
        action: Action,
        decision: impl Fn(&Observation, &AiConfig, &mut GameRng) -> bool + Send + 'static,
    ) -> Self {
        self.decisions.insert(action, Box::new(decision));
        self
    }

    /// Produce this tick's intent
    ///
    /// Decisions run in `Action::ALL` order regardless of insertion order,
    /// so the RNG stream is consumed identically on every run.
    pub fn decide(&mut self, observation: &Observation) -> Intent {
        let mut intent = Intent::NONE;
        for action in Action::ALL {
            if let Some(decision) = self.decisions.get(&action) {
                let pressed = decision(observation, &self.config, &mut self.rng);
                intent = intent.with_state(action, pressed);
            }
        }
        intent
    }

    /// Settings the decisions read
    pub fn config(&self) -> &AiConfig {
        &self.config
    }
}

impl fmt::Debug for AiController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiController")
            .field("config", &self.config)
            .field("rng", &self.rng)
            .field("decisions", &self.decisions.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn decision(
    f: impl Fn(&Observation, &AiConfig, &mut GameRng) -> bool + Send + 'static,
) -> Decision {
    Box::new(f)
}

/// Direction to walk to close the distance, 0 once engaged
fn approach(obs: &Observation, cfg: &AiConfig) -> i8 {
    match obs.distance() {
        Some(d) if d > cfg.engage_distance => obs.opponent_side(),
        _ => 0,
    }
}

fn duck_incoming_punch(obs: &Observation, cfg: &AiConfig, _rng: &mut GameRng) -> bool {
    let in_range = obs.distance().is_some_and(|d| d <= cfg.engage_distance);
    in_range && obs.opponent.is_some_and(|o| o.punching) && obs.me.grounded
}

fn punch_when_engaged(obs: &Observation, cfg: &AiConfig, rng: &mut GameRng) -> bool {
    match obs.distance() {
        Some(d) if d <= cfg.engage_distance => rng.chance(cfg.punch_chance),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(x: f32) -> FighterView {
        FighterView {
            x,
            y: 0.0,
            health: 100.0,
            facing: 1.0,
            grounded: true,
            crouching: false,
            punching: false,
            last_intent: Intent::NONE,
        }
    }

    fn observe(me: f32, opponent: Option<FighterView>) -> Observation {
        Observation {
            tick: 0,
            me: view(me),
            opponent,
        }
    }

    #[test]
    fn test_walks_towards_distant_opponent() {
        let mut ai = AiController::new(AiConfig {
            jump_chance: 0.0,
            ..AiConfig::default()
        });
        let intent = ai.decide(&observe(100.0, Some(view(600.0))));
        assert!(intent.is_pressed(Action::MoveRight));
        assert!(!intent.is_pressed(Action::MoveLeft));

        let intent = ai.decide(&observe(600.0, Some(view(100.0))));
        assert!(intent.is_pressed(Action::MoveLeft));
    }

    #[test]
    fn test_punches_when_engaged() {
        let mut ai = AiController::new(AiConfig {
            punch_chance: 1.0,
            jump_chance: 0.0,
            ..AiConfig::default()
        });
        let intent = ai.decide(&observe(300.0, Some(view(350.0))));
        assert!(intent.is_pressed(Action::LightPunch));
        assert_eq!(intent.horizontal(), 0);
    }

    #[test]
    fn test_ducks_incoming_punch() {
        let mut ai = AiController::new(AiConfig::default());
        let attacker = FighterView {
            punching: true,
            ..view(350.0)
        };
        let intent = ai.decide(&observe(300.0, Some(attacker)));
        assert!(intent.is_pressed(Action::Crouch));
    }

    #[test]
    fn test_no_opponent_stands_still() {
        let mut ai = AiController::new(AiConfig {
            jump_chance: 0.0,
            ..AiConfig::default()
        });
        assert_eq!(ai.decide(&observe(300.0, None)), Intent::NONE);
    }

    #[test]
    fn test_same_seed_same_intents() {
        let config = AiConfig {
            punch_chance: 0.5,
            jump_chance: 0.3,
            ..AiConfig::default()
        };
        let mut a = AiController::new(config.clone());
        let mut b = AiController::new(config);
        for tick in 0..200u64 {
            let obs = Observation {
                tick,
                ..observe(300.0 + tick as f32, Some(view(360.0)))
            };
            assert_eq!(a.decide(&obs), b.decide(&obs));
        }
    }

    #[test]
    fn test_custom_decision() {
        let mut ai = AiController::idle(AiConfig::default())
            .with_decision(Action::Jump, |obs, _, _| obs.tick % 2 == 0);
        let mut obs = observe(0.0, None);
        assert_eq!(ai.decide(&obs), Intent::NONE.with(Action::Jump));
        obs.tick = 1;
        assert_eq!(ai.decide(&obs), Intent::NONE);
    }
}
