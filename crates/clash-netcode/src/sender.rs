//! Send-side sequencing
//!
//! Every intent the local player produces is stamped with the next sequence
//! number and pushed through the transport. Sequence numbers start at zero
//! and never repeat within a match.

use crate::transport::Transport;
use crate::wire;
use clash_core::{Intent, Sequence};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Monotonic sequence source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceCounter {
    next: Sequence,
}

impl SequenceCounter {
    /// Start counting from zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next sequence number and advance
    pub fn advance(&mut self) -> Sequence {
        let sequence = self.next;
        self.next += 1;
        sequence
    }

    /// The sequence the next call to [`advance`](Self::advance) will return
    pub fn peek(&self) -> Sequence {
        self.next
    }
}

/// Stamps and transmits local intents
pub struct IntentSender {
    counter: SequenceCounter,
    transport: Arc<dyn Transport>,
    send_failures: u64,
}

impl IntentSender {
    /// Create a sender over the given transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            counter: SequenceCounter::new(),
            transport,
            send_failures: 0,
        }
    }

    /// Stamp `intent` with the next sequence number and send it
    ///
    /// Transport failures are logged and counted, never returned: the local
    /// simulation keeps running on its own input whether or not the peer
    /// hears about it.
    pub fn transmit(&mut self, intent: Intent) -> Sequence {
        let sequence = self.counter.advance();
        let message = wire::encode(sequence, intent);
        if let Err(e) = self.transport.send(&message) {
            self.send_failures += 1;
            warn!(sequence, error = %e, "failed to send local intent");
        }
        sequence
    }

    /// Sequence the next transmitted intent will carry
    pub fn next_sequence(&self) -> Sequence {
        self.counter.peek()
    }

    /// Number of sends the transport refused
    pub fn send_failures(&self) -> u64 {
        self.send_failures
    }
}

impl fmt::Debug for IntentSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentSender")
            .field("next_sequence", &self.counter.peek())
            .field("send_failures", &self.send_failures)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::LoopbackTransport;
    use clash_core::Action;

    #[test]
    fn test_counter_starts_at_zero() {
        let mut counter = SequenceCounter::new();
        assert_eq!(counter.advance(), 0);
        assert_eq!(counter.advance(), 1);
        assert_eq!(counter.peek(), 2);
    }

    #[test]
    fn test_transmit_sends_sequenced_frames() {
        let (host, client) = LoopbackTransport::pair();
        let mut sender = IntentSender::new(Arc::new(host));

        assert_eq!(sender.transmit(Intent::NONE), 0);
        assert_eq!(sender.transmit(Intent::NONE.with(Action::Jump)), 1);

        assert_eq!(client.drain(), vec!["0;00000".to_string(), "1;00010".to_string()]);
        assert_eq!(sender.next_sequence(), 2);
    }

    #[test]
    fn test_send_failure_still_advances() {
        let (host, client) = LoopbackTransport::pair();
        host.close();
        let mut sender = IntentSender::new(Arc::new(host));

        assert_eq!(sender.transmit(Intent::NONE), 0);
        assert_eq!(sender.transmit(Intent::NONE), 1);
        assert_eq!(sender.send_failures(), 2);
        assert_eq!(client.pending(), 0);
    }
}
