//! Transport capability for online matches
//!
//! The match logic only needs an outbound `send(message)` primitive; inbound
//! messages are pushed to whatever callback the host registered. Users
//! implement [`Transport`] over their network stack (UDP server/client,
//! WebSocket, ...). [`LoopbackTransport`] connects two in-process peers.

use crate::{Error, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Outbound half of a message-oriented connection
///
/// Fire-and-forget: a successful return means the message was handed to the
/// network stack, not that the peer received it.
pub trait Transport: Send + Sync {
    /// Send one text message to the connected peer
    fn send(&self, message: &str) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, message: &str) -> Result<()> {
        (**self).send(message)
    }
}

#[derive(Debug, Default)]
struct Pipe {
    messages: VecDeque<String>,
    closed: bool,
}

/// In-memory, ordered transport between two peers in one process
///
/// Each endpoint sends into its peer's inbox and drains its own with
/// [`pump`](Self::pump), the way a host engine polls its socket once per tick.
#[derive(Debug, Clone)]
pub struct LoopbackTransport {
    outbox: Arc<Mutex<Pipe>>,
    inbox: Arc<Mutex<Pipe>>,
}

impl LoopbackTransport {
    /// Create a connected pair of endpoints (host side, client side)
    pub fn pair() -> (Self, Self) {
        let a_to_b = Arc::new(Mutex::new(Pipe::default()));
        let b_to_a = Arc::new(Mutex::new(Pipe::default()));
        let host = Self {
            outbox: a_to_b.clone(),
            inbox: b_to_a.clone(),
        };
        let client = Self {
            outbox: b_to_a,
            inbox: a_to_b,
        };
        (host, client)
    }

    /// Deliver every pending inbound message to `on_message`, oldest first
    ///
    /// Returns the number of messages delivered.
    pub fn pump(&self, mut on_message: impl FnMut(&str)) -> usize {
        // Release the lock before running callbacks so they may send
        let pending: Vec<String> = self.inbox.lock().messages.drain(..).collect();
        for message in &pending {
            on_message(message);
        }
        pending.len()
    }

    /// Take all pending inbound messages without delivering them
    pub fn drain(&self) -> Vec<String> {
        self.inbox.lock().messages.drain(..).collect()
    }

    /// Number of inbound messages waiting
    pub fn pending(&self) -> usize {
        self.inbox.lock().messages.len()
    }

    /// Stop accepting outbound messages; later sends fail
    pub fn close(&self) {
        self.outbox.lock().closed = true;
    }
}

impl Transport for LoopbackTransport {
    fn send(&self, message: &str) -> Result<()> {
        let mut pipe = self.outbox.lock();
        if pipe.closed {
            return Err(Error::Transport("loopback endpoint closed".to_string()));
        }
        pipe.messages.push_back(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_delivers_in_order() {
        let (host, client) = LoopbackTransport::pair();
        host.send("0;00000").unwrap();
        host.send("1;00010").unwrap();

        let mut received = Vec::new();
        let delivered = client.pump(|m| received.push(m.to_string()));
        assert_eq!(delivered, 2);
        assert_eq!(received, vec!["0;00000", "1;00010"]);
        assert_eq!(client.pending(), 0);
    }

    #[test]
    fn test_directions_are_independent() {
        let (host, client) = LoopbackTransport::pair();
        client.send("from client").unwrap();
        assert_eq!(host.pending(), 1);
        assert_eq!(client.pending(), 0);
        assert_eq!(host.drain(), vec!["from client".to_string()]);
    }

    #[test]
    fn test_closed_endpoint_rejects_send() {
        let (host, _client) = LoopbackTransport::pair();
        host.close();
        assert!(matches!(host.send("x"), Err(Error::Transport(_))));
    }

    #[test]
    fn test_shared_transport() {
        let (host, client) = LoopbackTransport::pair();
        let shared: Arc<dyn Transport> = Arc::new(host);
        shared.send("hello").unwrap();
        assert_eq!(client.drain(), vec!["hello".to_string()]);
    }
}
