//! Error types for clash-sim

use crate::simulation::Phase;
use thiserror::Error;

/// Result type for clash-sim operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up or running a match
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid match setup (unknown mode, missing binding, bad tuning)
    ///
    /// Always raised before any fighter is added, so a match never starts
    /// half-configured.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A network message arrived but no fighter has a receiving input buffer
    #[error("no network receiver in this match")]
    UnroutableMessage,

    /// Operation not allowed in the current match phase
    #[error("{operation} is not allowed while the match is {phase:?}")]
    InvalidPhase {
        /// Rejected operation
        operation: &'static str,
        /// Phase the simulation was in
        phase: Phase,
    },

    /// Netcode error
    #[error("netcode error: {0}")]
    Netcode(#[from] clash_netcode::Error),

    /// Core error
    #[error("core error: {0}")]
    Core(#[from] clash_core::Error),

    /// Config file could not be parsed
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }
}

// Compile-time check that Error can cross the thread a transport callback runs on.
fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<Error>();
}
