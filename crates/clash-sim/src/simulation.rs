//! FighterSimulation - per-tick driver for a match
//!
//! ```text
//!   add_fighter()        start()          finish() / knockout
//!  ┌───────┐ ───────▶ ┌────────┐ ───────▶ ┌──────────┐
//!  │ Setup │          │ Active │          │ Finished │
//!  └───────┘          └────────┘          └──────────┘
//!      update(): rejected   runs    rejected
//!  network_update(): routed routed  ignored
//! ```
//!
//! Each `update` runs four passes over the roster, always in roster order:
//!
//! 1. poll the fighter's input buffer and apply the intent
//! 2. turn to face the opponent and report position/animation to the node
//! 3. resolve punches (attacker 0 before attacker 1)
//! 4. push health to the health bars
//!
//! Roster order makes simultaneous hits deterministic: when both fighters
//! would knock each other out on the same tick, the earlier slot's punch
//! lands first and the knocked-out fighter's punch is cancelled.

use crate::ai::Observation;
use crate::config::FighterTuning;
use crate::fighter::{Fighter, FighterState};
use crate::{Error, Result};
use clash_core::{Intent, Sequence, Tick};
use clash_netcode::SharedReceiver;
use tracing::{debug, info, warn};

/// Index of a fighter in the roster
pub type FighterId = usize;

/// Match lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Fighters are being added
    Setup,
    /// Ticks are running
    Active,
    /// The match is over
    Finished,
}

/// Something observable that happened during the match
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    /// A fighter's input buffer was polled
    Polled {
        tick: Tick,
        fighter: FighterId,
        intent: Intent,
    },
    Moved {
        tick: Tick,
        fighter: FighterId,
        x: f32,
        y: f32,
    },
    PunchStarted {
        tick: Tick,
        fighter: FighterId,
    },
    Hit {
        tick: Tick,
        attacker: FighterId,
        defender: FighterId,
        damage: f32,
        remaining: f32,
    },
    KnockedOut {
        tick: Tick,
        fighter: FighterId,
    },
}

/// Outcome of routing a network message
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Queued for a later tick under this sequence number
    Queued(Sequence),
    /// Malformed, stale, out of order or over capacity; the receiver holds
    /// its last state
    Discarded(clash_netcode::Error),
    /// No fighter in this match receives network input
    Unroutable,
    /// The match is over
    Ignored,
}

/// Owns the roster and advances it one physics tick at a time
#[derive(Debug)]
pub struct FighterSimulation {
    phase: Phase,
    tick: Tick,
    fighters: Vec<Fighter>,
    tuning: FighterTuning,
    events: Vec<SimEvent>,
}

impl FighterSimulation {
    /// Empty simulation in `Setup`
    pub fn new(tuning: FighterTuning) -> Self {
        Self {
            phase: Phase::Setup,
            tick: 0,
            fighters: Vec::new(),
            tuning,
            events: Vec::new(),
        }
    }

    /// Append a fighter to the roster and place it at its spawn point
    ///
    /// Only valid during `Setup`.
    pub fn add_fighter(&mut self, mut fighter: Fighter) -> Result<FighterId> {
        if self.phase != Phase::Setup {
            return Err(Error::InvalidPhase {
                operation: "add_fighter",
                phase: self.phase,
            });
        }
        let id = self.fighters.len();
        fighter.state = FighterState::spawn(self.tuning.spawn_for(id), &self.tuning);
        fighter.report_to_node();
        fighter.report_health(self.tuning.max_health);
        debug!(fighter = id, role = ?fighter.role(), "fighter added");
        self.fighters.push(fighter);
        Ok(id)
    }

    /// Begin ticking
    pub fn start(&mut self) -> Result<()> {
        if self.phase != Phase::Setup {
            return Err(Error::InvalidPhase {
                operation: "start",
                phase: self.phase,
            });
        }
        if self.fighters.len() != 2 {
            warn!(fighters = self.fighters.len(), "starting match without exactly two fighters");
        }
        for id in 0..self.fighters.len() {
            self.face_opponent(id);
        }
        self.transition(Phase::Active);
        Ok(())
    }

    /// End the match; later updates are rejected and network input ignored
    pub fn finish(&mut self) -> Result<()> {
        if self.phase != Phase::Active {
            return Err(Error::InvalidPhase {
                operation: "finish",
                phase: self.phase,
            });
        }
        self.transition(Phase::Finished);
        Ok(())
    }

    /// Advance one physics tick
    ///
    /// Only valid while `Active`. Once running, nothing inside the tick can
    /// fail: input buffers degrade to hold-last-state instead.
    pub fn update(&mut self, delta_time: f32) -> Result<()> {
        if self.phase != Phase::Active {
            return Err(Error::InvalidPhase {
                operation: "update",
                phase: self.phase,
            });
        }
        let dt = if delta_time.is_finite() && delta_time > 0.0 {
            delta_time
        } else {
            0.0
        };
        let tick = self.tick;

        for id in 0..self.fighters.len() {
            let observation = self.observe(id);
            let fighter = &mut self.fighters[id];
            let intent = fighter.input.poll(&observation);
            self.events.push(SimEvent::Polled {
                tick,
                fighter: id,
                intent,
            });

            let before = (fighter.state.x, fighter.state.y);
            let punched = fighter.state.step(intent, dt, &self.tuning);
            if before != (fighter.state.x, fighter.state.y) {
                self.events.push(SimEvent::Moved {
                    tick,
                    fighter: id,
                    x: fighter.state.x,
                    y: fighter.state.y,
                });
            }
            if punched {
                self.events.push(SimEvent::PunchStarted { tick, fighter: id });
            }
        }

        for id in 0..self.fighters.len() {
            self.face_opponent(id);
            self.fighters[id].report_to_node();
        }

        let knocked_out = self.resolve_hits(tick);

        for fighter in &self.fighters {
            fighter.report_health(self.tuning.max_health);
        }

        self.tick += 1;
        if knocked_out {
            self.transition(Phase::Finished);
        }
        Ok(())
    }

    /// Route an inbound transport message to the receiving input buffer
    ///
    /// Safe to call in any phase; a no-op once the match is finished or when
    /// no fighter receives network input.
    pub fn network_update(&mut self, message: &str) -> Dispatch {
        if self.phase == Phase::Finished {
            return Dispatch::Ignored;
        }
        let Some(receiver) = self.receiver() else {
            debug!(error = %Error::UnroutableMessage, "dropping network message");
            return Dispatch::Unroutable;
        };
        match receiver.enqueue(message) {
            Ok(sequence) => Dispatch::Queued(sequence),
            Err(e) => Dispatch::Discarded(e),
        }
    }

    /// Handle to the first network receiver in the roster
    ///
    /// Hand a clone to a transport callback running on another thread.
    pub fn receiver(&self) -> Option<SharedReceiver> {
        self.fighters
            .iter()
            .find_map(|f| f.input.as_receiver())
            .cloned()
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of completed ticks
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Roster, in resolution order
    pub fn fighters(&self) -> &[Fighter] {
        &self.fighters
    }

    /// Movement and combat numbers in use
    pub fn tuning(&self) -> &FighterTuning {
        &self.tuning
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Take all recorded events; hosts should call this every tick
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    fn observe(&self, id: FighterId) -> Observation {
        Observation {
            tick: self.tick,
            me: self.fighters[id].state.view(),
            opponent: self.opponent_of(id).map(|o| self.fighters[o].state.view()),
        }
    }

    fn opponent_of(&self, id: FighterId) -> Option<FighterId> {
        (0..self.fighters.len()).find(|other| *other != id)
    }

    fn face_opponent(&mut self, id: FighterId) {
        let Some(opponent) = self.opponent_of(id) else {
            return;
        };
        let opponent_x = self.fighters[opponent].state.x;
        let state = &mut self.fighters[id].state;
        if opponent_x < state.x {
            state.facing = -1.0;
        } else if opponent_x > state.x {
            state.facing = 1.0;
        }
    }

    /// Returns true if anyone was knocked out
    fn resolve_hits(&mut self, tick: Tick) -> bool {
        let mut knocked_out = false;
        for attacker in 0..self.fighters.len() {
            if self.fighters[attacker].state.is_knocked_out()
                || self.fighters[attacker].state.punch_landed
            {
                continue;
            }
            let Some(hitbox) = self.fighters[attacker].hitbox(&self.tuning) else {
                continue;
            };
            for defender in 0..self.fighters.len() {
                if defender == attacker || self.fighters[defender].state.is_knocked_out() {
                    continue;
                }
                if !hitbox.overlaps(&self.fighters[defender].hurtbox()) {
                    continue;
                }

                let damage = self.tuning.punch_damage;
                let target = &mut self.fighters[defender].state;
                target.health = (target.health - damage).max(0.0);
                let remaining = target.health;
                self.fighters[attacker].state.punch_landed = true;
                self.events.push(SimEvent::Hit {
                    tick,
                    attacker,
                    defender,
                    damage,
                    remaining,
                });
                debug!(tick, attacker, defender, remaining, "hit");

                if remaining <= 0.0 {
                    knocked_out = true;
                    self.events.push(SimEvent::KnockedOut {
                        tick,
                        fighter: defender,
                    });
                    info!(tick, fighter = defender, "knocked out");
                }
                // One punch connects with one fighter
                break;
            }
        }
        knocked_out
    }

    fn transition(&mut self, to: Phase) {
        let from = self.phase;
        self.phase = to;
        self.events.push(SimEvent::PhaseChanged { from, to });
        info!(?from, ?to, tick = self.tick, "match phase changed");
    }
}
