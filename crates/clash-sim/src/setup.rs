//! Mode-driven assignment of input buffers

use crate::ai::AiController;
use crate::buffer::InputBuffer;
use crate::config::MatchConfig;
use crate::mode::{roles_for, BufferRole, GameMode};
use crate::{Error, Result};
use clash_core::HostInput;
use clash_netcode::{ReceiverQueue, SharedReceiver, Transport};
use std::sync::Arc;
use tracing::info;

/// The two input buffers a mode assigns, in roster order
#[derive(Debug)]
pub struct BufferPair {
    pub mode: GameMode,
    pub player_one: InputBuffer,
    pub player_two: InputBuffer,
    /// Queue the transport callback should feed, online modes only
    pub receiver: Option<SharedReceiver>,
}

impl BufferPair {
    /// Buffers for (player one, player two)
    pub fn into_buffers(self) -> (InputBuffer, InputBuffer) {
        (self.player_one, self.player_two)
    }
}

/// Builds the buffer pair for a configured mode
pub struct MatchSetup;

impl MatchSetup {
    /// Validate `config` and assign both fighters' input buffers
    ///
    /// Fails before creating anything if the mode is unknown, bindings are
    /// missing, or an online mode has no transport.
    pub fn build(
        config: &MatchConfig,
        host: Arc<dyn HostInput>,
        transport: Option<Arc<dyn Transport>>,
    ) -> Result<BufferPair> {
        let mode = config.validate()?;
        if mode.is_online() && transport.is_none() {
            return Err(Error::config(format!("{mode} requires a transport")));
        }

        let (p1, p2) = roles_for(mode);
        let mut receiver = None;
        let mut assign = |slot: usize, role: BufferRole| -> Result<InputBuffer> {
            let bindings = config.bindings_for(mode, slot).clone();
            Ok(match role {
                BufferRole::Local => InputBuffer::local(bindings, host.clone()),
                BufferRole::Ai => InputBuffer::Ai(AiController::new(config.ai.clone())),
                BufferRole::NetworkSender => {
                    let transport = transport
                        .clone()
                        .ok_or_else(|| Error::config(format!("{mode} requires a transport")))?;
                    InputBuffer::device_sender(bindings, host.clone(), transport)
                }
                BufferRole::NetworkReceiver => {
                    let queue = ReceiverQueue::with_policy(
                        config.network.queue_capacity,
                        config.network.overflow,
                    );
                    let shared = SharedReceiver::new(queue);
                    receiver = Some(shared.clone());
                    InputBuffer::NetworkReceiver(shared)
                }
            })
        };
        let player_one = assign(0, p1)?;
        let player_two = assign(1, p2)?;

        info!(%mode, player_one = ?p1, player_two = ?p2, "input buffers assigned");
        Ok(BufferPair {
            mode,
            player_one,
            player_two,
            receiver,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ActionBindings;
    use clash_core::{Action, KeyboardState};
    use clash_netcode::LoopbackTransport;

    fn keys() -> Arc<dyn HostInput> {
        Arc::new(KeyboardState::new())
    }

    fn loopback() -> Option<Arc<dyn Transport>> {
        let (host, _client) = LoopbackTransport::pair();
        Some(Arc::new(host))
    }

    #[test]
    fn test_every_mode_assigns_its_roles() {
        for mode in GameMode::ALL {
            let config = MatchConfig::for_mode(mode);
            let pair = MatchSetup::build(&config, keys(), loopback()).unwrap();
            assert_eq!(pair.mode, mode);
            assert_eq!(
                (pair.player_one.role(), pair.player_two.role()),
                roles_for(mode)
            );
            assert_eq!(pair.receiver.is_some(), mode.is_online());
        }
    }

    #[test]
    fn test_local_modes_need_no_transport() {
        for mode in [GameMode::LocalAi, GameMode::LocalPvp] {
            let pair = MatchSetup::build(&MatchConfig::for_mode(mode), keys(), None).unwrap();
            assert!(pair.receiver.is_none());
        }
    }

    #[test]
    fn test_online_without_transport_fails() {
        let config = MatchConfig::for_mode(GameMode::OnlinePvpHost);
        let err = MatchSetup::build(&config, keys(), None).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_unknown_mode_assigns_nothing() {
        let config = MatchConfig {
            mode: "SPLIT_SCREEN".to_string(),
            ..MatchConfig::default()
        };
        let err = MatchSetup::build(&config, keys(), loopback()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_missing_binding_fails() {
        let config = MatchConfig {
            mode: GameMode::LocalPvp.name().to_string(),
            player_two: ActionBindings::empty().bind(Action::Jump, "p2_jump"),
            ..MatchConfig::default()
        };
        let err = MatchSetup::build(&config, keys(), None).unwrap_err();
        assert!(err.to_string().contains("player 2"));
    }

    #[test]
    fn test_local_ai_ignores_player_two_bindings() {
        let config = MatchConfig {
            player_two: ActionBindings::empty(),
            ..MatchConfig::for_mode(GameMode::LocalAi)
        };
        assert!(MatchSetup::build(&config, keys(), None).is_ok());
    }

    #[test]
    fn test_client_sender_uses_player_one_keys() {
        let (host_end, client_end) = LoopbackTransport::pair();
        let keyboard = Arc::new(KeyboardState::new());
        let config = MatchConfig::for_mode(GameMode::OnlinePvpClient);
        let pair = MatchSetup::build(&config, keyboard.clone(), Some(Arc::new(client_end))).unwrap();
        let (_, mut p2) = pair.into_buffers();

        keyboard.press("p1_crouch");
        let observation = crate::ai::Observation {
            tick: 0,
            me: crate::fighter::FighterState::spawn(0.0, &config.tuning).view(),
            opponent: None,
        };
        assert_eq!(p2.poll(&observation), clash_core::Intent::NONE.with(Action::Crouch));
        assert_eq!(host_end.drain(), vec!["0;00100".to_string()]);
    }

    #[test]
    fn test_receiver_uses_network_settings() {
        let mut config = MatchConfig::for_mode(GameMode::OnlinePvpHost);
        config.network.queue_capacity = 2;
        config.network.overflow = clash_netcode::OverflowPolicy::RejectNewest;
        let pair = MatchSetup::build(&config, keys(), loopback()).unwrap();
        let receiver = pair.receiver.unwrap();
        receiver.enqueue("0;00000").unwrap();
        receiver.enqueue("1;00000").unwrap();
        assert!(matches!(
            receiver.enqueue("2;00000"),
            Err(clash_netcode::Error::QueueFull { capacity: 2 })
        ));
    }
}
