//! Game modes and the input buffer roles they assign
//!
//! | Mode                | Player one      | Player two      |
//! |---------------------|-----------------|-----------------|
//! | `LOCAL_AI`          | Local           | AI              |
//! | `LOCAL_PVP`         | Local           | Local           |
//! | `ONLINE_PVP_HOST`   | NetworkSender   | NetworkReceiver |
//! | `ONLINE_PVP_CLIENT` | NetworkReceiver | NetworkSender   |

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a match is played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// One local player against the AI
    LocalAi,
    /// Two players sharing one machine
    LocalPvp,
    /// Online match, this peer hosts
    OnlinePvpHost,
    /// Online match, this peer joined a host
    OnlinePvpClient,
}

impl GameMode {
    /// All declared modes
    pub const ALL: [GameMode; 4] = [
        GameMode::LocalAi,
        GameMode::LocalPvp,
        GameMode::OnlinePvpHost,
        GameMode::OnlinePvpClient,
    ];

    /// Online mode for this peer's session role
    pub fn online(is_host: bool) -> Self {
        if is_host {
            GameMode::OnlinePvpHost
        } else {
            GameMode::OnlinePvpClient
        }
    }

    /// Name used in config files and logs
    pub fn name(self) -> &'static str {
        match self {
            GameMode::LocalAi => "LOCAL_AI",
            GameMode::LocalPvp => "LOCAL_PVP",
            GameMode::OnlinePvpHost => "ONLINE_PVP_HOST",
            GameMode::OnlinePvpClient => "ONLINE_PVP_CLIENT",
        }
    }

    /// Whether intents cross the network in this mode
    pub fn is_online(self) -> bool {
        matches!(self, GameMode::OnlinePvpHost | GameMode::OnlinePvpClient)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        GameMode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| Error::config(format!("unrecognized game mode '{s}'")))
    }
}

/// Which kind of input buffer drives a fighter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferRole {
    /// Polls the host input system
    Local,
    /// Decides intents itself
    Ai,
    /// Polls local input and transmits it
    NetworkSender,
    /// Replays intents received from the peer
    NetworkReceiver,
}

impl BufferRole {
    /// Whether this role reads named actions from the host input system
    pub fn reads_host_input(self) -> bool {
        matches!(self, BufferRole::Local | BufferRole::NetworkSender)
    }
}

/// Roles for (player one, player two) in `mode`
pub fn roles_for(mode: GameMode) -> (BufferRole, BufferRole) {
    match mode {
        GameMode::LocalAi => (BufferRole::Local, BufferRole::Ai),
        GameMode::LocalPvp => (BufferRole::Local, BufferRole::Local),
        GameMode::OnlinePvpHost => (BufferRole::NetworkSender, BufferRole::NetworkReceiver),
        GameMode::OnlinePvpClient => (BufferRole::NetworkReceiver, BufferRole::NetworkSender),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_roundtrip() {
        for mode in GameMode::ALL {
            assert_eq!(mode.name().parse::<GameMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_unknown_mode_is_configuration_error() {
        let err = "ONLINE_SPECTATOR".parse::<GameMode>().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!("local_ai".parse::<GameMode>().is_err());
    }

    #[test]
    fn test_roles_table() {
        assert_eq!(roles_for(GameMode::LocalAi), (BufferRole::Local, BufferRole::Ai));
        assert_eq!(roles_for(GameMode::LocalPvp), (BufferRole::Local, BufferRole::Local));
        assert_eq!(
            roles_for(GameMode::OnlinePvpHost),
            (BufferRole::NetworkSender, BufferRole::NetworkReceiver)
        );
        assert_eq!(
            roles_for(GameMode::OnlinePvpClient),
            (BufferRole::NetworkReceiver, BufferRole::NetworkSender)
        );
    }

    #[test]
    fn test_online_exactly_one_sender_and_receiver() {
        for mode in GameMode::ALL.into_iter().filter(|m| m.is_online()) {
            let (p1, p2) = roles_for(mode);
            let roles = [p1, p2];
            assert_eq!(roles.iter().filter(|r| **r == BufferRole::NetworkSender).count(), 1);
            assert_eq!(roles.iter().filter(|r| **r == BufferRole::NetworkReceiver).count(), 1);
        }
    }

    #[test]
    fn test_online_for_session_role() {
        assert_eq!(GameMode::online(true), GameMode::OnlinePvpHost);
        assert_eq!(GameMode::online(false), GameMode::OnlinePvpClient);
    }
}
