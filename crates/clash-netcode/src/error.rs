//! Error types for clash-netcode

use clash_core::Sequence;
use thiserror::Error;

/// Netcode error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Payload could not be decoded into a sequenced intent
    #[error("Malformed intent message: {reason}")]
    Deserialization { reason: String },

    /// Sequence already applied, or already queued (duplicate delivery)
    #[error("Stale intent {sequence}, last applied is {last_applied:?}")]
    StaleMessage {
        sequence: Sequence,
        last_applied: Option<Sequence>,
    },

    /// Sequence arrived after a newer one was already queued
    #[error("Intent {sequence} arrived after newer intent {newest}")]
    OrderingViolation { sequence: Sequence, newest: Sequence },

    /// Pending queue is at capacity and the overflow policy rejects new input
    #[error("Receiver queue full ({capacity} pending intents)")]
    QueueFull { capacity: usize },

    /// Outbound send failed
    #[error("Transport error: {0}")]
    Transport(String),
}

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Error::Deserialization {
            reason: reason.into(),
        }
    }

    /// Whether this error is routine duplicate/late delivery that callers
    /// should discard without surfacing
    pub fn is_stale(&self) -> bool {
        matches!(self, Error::StaleMessage { .. })
    }
}

/// Result type for netcode operations
pub type Result<T> = std::result::Result<T, Error>;
