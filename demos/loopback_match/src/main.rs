//! Loopback Match Demo
//!
//! Runs a host and a client simulation in one process, connected by an
//! in-memory transport. Each side scripts its own keyboard; the other side
//! only ever sees those inputs through the network receiver.
//!
//! Set `RUST_LOG=debug` to watch every queued and applied intent.

use clash_core::{KeyboardState, RoundTimer, Tick};
use clash_netcode::{LoopbackTransport, Transport};
use clash_sim::{
    ColliderShape, Dispatch, Fighter, FighterSimulation, GameMode, Headless, HealthDisplay,
    MatchConfig, MatchSetup, Phase, SimEvent,
};
use std::sync::Arc;
use tracing::{debug, info};

const TICKS: Tick = 600;
const DT: f32 = 1.0 / 60.0;

/// Health bar that writes to the log instead of a screen
struct LoggedHealthBar {
    label: &'static str,
}

impl HealthDisplay for LoggedHealthBar {
    fn set_health_percentage(&self, percentage: f32) {
        debug!(bar = self.label, percentage, "health bar");
    }
}

/// One peer: its simulation, its keyboard and its end of the connection
struct Peer {
    name: &'static str,
    sim: FighterSimulation,
    keys: Arc<KeyboardState>,
    link: LoopbackTransport,
}

impl Peer {
    fn new(name: &'static str, mode: GameMode, link: LoopbackTransport) -> clash_sim::Result<Self> {
        let config = MatchConfig::for_mode(mode);
        let keys = Arc::new(KeyboardState::new());
        let transport: Arc<dyn Transport> = Arc::new(link.clone());
        let (p1, p2) = MatchSetup::build(&config, keys.clone(), Some(transport))?.into_buffers();

        let tuning = config.tuning.clone();
        let mut sim = FighterSimulation::new(tuning.clone());
        for (input, label) in [(p1, "p1"), (p2, "p2")] {
            sim.add_fighter(Fighter::new(
                Box::new(Headless),
                ColliderShape::from_tuning(&tuning),
                input,
                Arc::new(LoggedHealthBar { label }),
            ))?;
        }
        Ok(Self {
            name,
            sim,
            keys,
            link,
        })
    }

    /// Feed everything the peer sent since the last tick into the simulation
    fn receive(&mut self) {
        let sim = &mut self.sim;
        let name = self.name;
        self.link.pump(|message| {
            if let Dispatch::Discarded(e) = sim.network_update(message) {
                info!(peer = name, %e, "discarded");
            }
        });
    }

    fn step(&mut self) -> clash_sim::Result<()> {
        self.receive();
        if self.sim.phase() == Phase::Active {
            self.sim.update(DT)?;
        }
        self.keys.end_frame();
        for event in self.sim.drain_events() {
            match event {
                SimEvent::Hit {
                    attacker,
                    defender,
                    remaining,
                    ..
                } => println!("[{}] fighter {attacker} hits fighter {defender} ({remaining} left)", self.name),
                SimEvent::KnockedOut { tick, fighter } => {
                    println!("[{}] fighter {fighter} knocked out at tick {tick}", self.name)
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Host walks in and punches; client crouches on a timer
fn script(tick: Tick, host: &KeyboardState, client: &KeyboardState) {
    if tick < 60 {
        host.press("p1_move_right");
    } else {
        host.release("p1_move_right");
        if tick % 20 == 0 {
            host.press("p1_light_punch");
        } else {
            host.release("p1_light_punch");
        }
    }

    if (tick / 45) % 3 == 2 {
        client.press("p1_crouch");
    } else {
        client.release("p1_crouch");
    }
}

fn main() -> clash_sim::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== Clash Loopback Match ===\n");

    let (host_link, client_link) = LoopbackTransport::pair();
    let mut host = Peer::new("host", GameMode::OnlinePvpHost, host_link)?;
    let mut client = Peer::new("client", GameMode::OnlinePvpClient, client_link)?;
    let mut timer = RoundTimer::new(MatchConfig::default().round_seconds)?;

    host.sim.start()?;
    client.sim.start()?;

    for tick in 0..TICKS {
        script(tick, &host.keys, &client.keys);
        host.step()?;
        client.step()?;
        timer.tick(DT);

        if host.sim.phase() == Phase::Finished || timer.is_expired() {
            break;
        }
    }
    // Let the client apply whatever the host sent last
    client.step()?;

    println!("\nTime left: {}s", timer.display_seconds());
    for peer in [&host, &client] {
        let fighters = peer.sim.fighters();
        println!(
            "[{}] tick {}: p1 at {:.1} with {} hp, p2 at {:.1} with {} hp",
            peer.name,
            peer.sim.tick(),
            fighters[0].state().x,
            fighters[0].state().health,
            fighters[1].state().x,
            fighters[1].state().health,
        );
    }
    if let Some(receiver) = host.sim.receiver() {
        println!("host receiver: {:?}", receiver.stats());
    }
    if let Some(receiver) = client.sim.receiver() {
        println!("client receiver: {:?}", receiver.stats());
    }

    Ok(())
}
