//! Input buffer family
//!
//! One poll contract, four behaviours. Every fighter owns exactly one
//! [`InputBuffer`] for the whole match, and the simulation calls
//! [`InputBuffer::poll`] on it exactly once per tick.
//!
//! | Variant           | Source of the intent                         | Side effect        |
//! |-------------------|----------------------------------------------|--------------------|
//! | `Local`           | host input system, by bound action name      | none               |
//! | `Ai`              | decision functions over an `Observation`     | advances its RNG   |
//! | `NetworkSender`   | a wrapped local or AI source                 | transmits the intent |
//! | `NetworkReceiver` | intents queued by the transport callback     | drains the queue   |

use crate::ai::{AiController, Observation};
use crate::config::ActionBindings;
use crate::mode::BufferRole;
use clash_core::{Action, HostInput, Intent};
use clash_netcode::{IntentSender, SharedReceiver, Transport};
use std::fmt;
use std::sync::Arc;

/// Polls named actions from the host input system
#[derive(Clone)]
pub struct LocalInput {
    bindings: ActionBindings,
    host: Arc<dyn HostInput>,
}

impl LocalInput {
    /// Read `bindings` from `host` every poll
    pub fn new(bindings: ActionBindings, host: Arc<dyn HostInput>) -> Self {
        Self { bindings, host }
    }

    /// Sample the host input system
    ///
    /// Unbound actions read as released.
    pub fn poll(&self) -> Intent {
        Action::ALL.into_iter().fold(Intent::NONE, |intent, action| {
            let pressed = match self.bindings.get(action) {
                Some(name) if action.is_edge_triggered() => self.host.is_action_just_pressed(name),
                Some(name) => self.host.is_action_pressed(name),
                None => false,
            };
            intent.with_state(action, pressed)
        })
    }

    /// Action names this buffer reads
    pub fn bindings(&self) -> &ActionBindings {
        &self.bindings
    }
}

impl fmt::Debug for LocalInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalInput")
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

/// Intent source a network sender can wrap
#[derive(Debug)]
pub enum LocalSource {
    /// A player on this machine
    Device(LocalInput),
    /// An AI playing on behalf of this machine
    Ai(AiController),
}

impl LocalSource {
    fn poll(&mut self, observation: &Observation) -> Intent {
        match self {
            LocalSource::Device(input) => input.poll(),
            LocalSource::Ai(ai) => ai.decide(observation),
        }
    }
}

/// Polls a local source and transmits each result to the peer
#[derive(Debug)]
pub struct NetworkSender {
    source: LocalSource,
    sender: IntentSender,
}

impl NetworkSender {
    /// Wrap `source`, sending through `transport`
    pub fn new(source: LocalSource, transport: Arc<dyn Transport>) -> Self {
        Self {
            source,
            sender: IntentSender::new(transport),
        }
    }

    /// The outbound sequencing state
    pub fn sender(&self) -> &IntentSender {
        &self.sender
    }

    fn poll(&mut self, observation: &Observation) -> Intent {
        let intent = self.source.poll(observation);
        // The local fighter acts on its own input now, without a round trip
        self.sender.transmit(intent);
        intent
    }
}

/// Per-fighter source of intents
#[derive(Debug)]
pub enum InputBuffer {
    /// Host input system
    Local(LocalInput),
    /// AI opponent
    Ai(AiController),
    /// Local source mirrored to the peer
    NetworkSender(NetworkSender),
    /// Intents received from the peer
    NetworkReceiver(SharedReceiver),
}

impl InputBuffer {
    /// Local device buffer
    pub fn local(bindings: ActionBindings, host: Arc<dyn HostInput>) -> Self {
        InputBuffer::Local(LocalInput::new(bindings, host))
    }

    /// Network sender around a local device buffer
    pub fn device_sender(
        bindings: ActionBindings,
        host: Arc<dyn HostInput>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let source = LocalSource::Device(LocalInput::new(bindings, host));
        InputBuffer::NetworkSender(NetworkSender::new(source, transport))
    }

    /// Produce this tick's intent
    ///
    /// Never fails: network trouble degrades to hold-last-state on the
    /// receiving side and to a logged send failure on the sending side.
    pub fn poll(&mut self, observation: &Observation) -> Intent {
        match self {
            InputBuffer::Local(input) => input.poll(),
            InputBuffer::Ai(ai) => ai.decide(observation),
            InputBuffer::NetworkSender(sender) => sender.poll(observation),
            InputBuffer::NetworkReceiver(receiver) => match receiver.poll_fresh() {
                (intent, true) => intent,
                // The peer pressed once; holding must not press again
                (held, false) => held.held_only(),
            },
        }
    }

    /// Which variant this is
    pub fn role(&self) -> BufferRole {
        match self {
            InputBuffer::Local(_) => BufferRole::Local,
            InputBuffer::Ai(_) => BufferRole::Ai,
            InputBuffer::NetworkSender(_) => BufferRole::NetworkSender,
            InputBuffer::NetworkReceiver(_) => BufferRole::NetworkReceiver,
        }
    }

    /// Receiving queue, for network receiver buffers
    pub fn as_receiver(&self) -> Option<&SharedReceiver> {
        match self {
            InputBuffer::NetworkReceiver(receiver) => Some(receiver),
            _ => None,
        }
    }

    /// Sending state, for network sender buffers
    pub fn as_sender(&self) -> Option<&NetworkSender> {
        match self {
            InputBuffer::NetworkSender(sender) => Some(sender),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FighterView;
    use crate::config::AiConfig;
    use clash_core::KeyboardState;
    use clash_netcode::{wire, LoopbackTransport, ReceiverQueue};

    fn observation() -> Observation {
        let me = FighterView {
            x: 0.0,
            y: 0.0,
            health: 100.0,
            facing: 1.0,
            grounded: true,
            crouching: false,
            punching: false,
            last_intent: Intent::NONE,
        };
        Observation {
            tick: 0,
            me,
            opponent: None,
        }
    }

    #[test]
    fn test_local_reads_levels_and_edges() {
        let keys = Arc::new(KeyboardState::new());
        let mut buffer = InputBuffer::local(ActionBindings::prefixed("p1"), keys.clone());

        keys.press("p1_move_right");
        keys.press("p1_jump");
        let intent = buffer.poll(&observation());
        assert!(intent.is_pressed(Action::MoveRight));
        assert!(intent.is_pressed(Action::Jump));

        // Held jump is not a new press; held movement still is movement
        keys.end_frame();
        let intent = buffer.poll(&observation());
        assert!(intent.is_pressed(Action::MoveRight));
        assert!(!intent.is_pressed(Action::Jump));
    }

    #[test]
    fn test_local_ignores_other_players_keys() {
        let keys = Arc::new(KeyboardState::new());
        let mut buffer = InputBuffer::local(ActionBindings::prefixed("p1"), keys.clone());
        keys.press("p2_light_punch");
        assert_eq!(buffer.poll(&observation()), Intent::NONE);
    }

    #[test]
    fn test_unbound_action_reads_released() {
        let keys = Arc::new(KeyboardState::new());
        let bindings = ActionBindings::empty().bind(Action::Crouch, "down");
        let mut buffer = InputBuffer::local(bindings, keys.clone());
        keys.press("down");
        keys.press("p1_jump");
        assert_eq!(buffer.poll(&observation()), Intent::NONE.with(Action::Crouch));
    }

    #[test]
    fn test_sender_returns_raw_poll_and_transmits_in_order() {
        let keys = Arc::new(KeyboardState::new());
        let (host, client) = LoopbackTransport::pair();
        let raw = LocalInput::new(ActionBindings::prefixed("p1"), keys.clone());
        let mut buffer =
            InputBuffer::device_sender(ActionBindings::prefixed("p1"), keys.clone(), Arc::new(host));

        let mut local_results = Vec::new();
        for tick in 0..10 {
            keys.clear();
            if tick % 3 == 0 {
                keys.press("p1_light_punch");
            }
            if tick % 2 == 0 {
                keys.press("p1_move_left");
            }
            let expected = raw.poll();
            let polled = buffer.poll(&observation());
            assert_eq!(polled, expected);
            local_results.push(polled);
        }

        let sent = client.drain();
        assert_eq!(sent.len(), 10);
        for (i, message) in sent.iter().enumerate() {
            let decoded = wire::decode(message).unwrap();
            assert_eq!(decoded.sequence, i as u64);
            assert_eq!(decoded.intent, local_results[i]);
        }
        assert_eq!(buffer.as_sender().unwrap().sender().next_sequence(), 10);
    }

    #[test]
    fn test_ai_sender_transmits_decisions() {
        let (host, client) = LoopbackTransport::pair();
        let ai = AiController::idle(AiConfig::default())
            .with_decision(Action::Crouch, |_, _, _| true);
        let mut buffer = InputBuffer::NetworkSender(NetworkSender::new(
            LocalSource::Ai(ai),
            Arc::new(host),
        ));
        let intent = buffer.poll(&observation());
        assert_eq!(intent, Intent::NONE.with(Action::Crouch));
        assert_eq!(client.drain(), vec!["0;00100".to_string()]);
    }

    #[test]
    fn test_receiver_polls_queue() {
        let receiver = SharedReceiver::new(ReceiverQueue::new(8));
        let mut buffer = InputBuffer::NetworkReceiver(receiver.clone());
        assert_eq!(buffer.role(), BufferRole::NetworkReceiver);

        receiver.enqueue("0;00101").unwrap();
        let crouch_punch = Intent::from_actions([Action::Crouch, Action::LightPunch]);
        assert_eq!(buffer.poll(&observation()), crouch_punch);
        // Nothing new: hold the crouch, but not the punch press
        for _ in 0..10 {
            assert_eq!(buffer.poll(&observation()), Intent::NONE.with(Action::Crouch));
        }

        receiver.enqueue("1;00001").unwrap();
        assert_eq!(buffer.poll(&observation()), Intent::NONE.with(Action::LightPunch));
        assert_eq!(buffer.poll(&observation()), Intent::NONE);
    }

    #[test]
    fn test_roles() {
        let keys: Arc<dyn HostInput> = Arc::new(KeyboardState::new());
        let (host, _client) = LoopbackTransport::pair();
        assert_eq!(
            InputBuffer::local(ActionBindings::prefixed("p1"), keys.clone()).role(),
            BufferRole::Local
        );
        assert_eq!(
            InputBuffer::Ai(AiController::new(AiConfig::default())).role(),
            BufferRole::Ai
        );
        assert_eq!(
            InputBuffer::device_sender(ActionBindings::prefixed("p1"), keys, Arc::new(host)).role(),
            BufferRole::NetworkSender
        );
    }
}
