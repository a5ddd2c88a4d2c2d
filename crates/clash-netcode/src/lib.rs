//! Clash Netcode - Intent synchronization between two peers
//!
//! This crate moves one player's per-tick intent across an ordered,
//! message-oriented connection:
//!
//! - **Wire**: compact text encoding of `(sequence, intent)`
//! - **Sending**: sequence stamping and fire-and-forget transmission
//! - **Receiving**: FIFO queue with stale discard and hold-last-state
//! - **Transport**: the `send(message)` capability a host provides
//!
//! # Architecture
//!
//! ```text
//!   sending peer                                  receiving peer
//! ┌──────────────────┐                      ┌───────────────────────┐
//! │ local Intent     │                      │ transport callback    │
//! │       │          │                      │         │             │
//! │       ▼          │   "5;00010"          │         ▼             │
//! │ IntentSender ────┼──── Transport ──────▶│ SharedReceiver        │
//! │  (seq 0,1,2…)    │                      │  enqueue()  poll() ◀──┼── tick
//! └──────────────────┘                      └───────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use clash_core::{Action, Intent};
//! use clash_netcode::{IntentSender, LoopbackTransport, ReceiverQueue, SharedReceiver};
//!
//! let (host, client) = LoopbackTransport::pair();
//! let mut sender = IntentSender::new(Arc::new(host));
//! let receiver = SharedReceiver::new(ReceiverQueue::new(64));
//!
//! sender.transmit(Intent::NONE.with(Action::Jump));
//! client.pump(|message| {
//!     let _ = receiver.enqueue(message);
//! });
//!
//! assert!(receiver.poll().is_pressed(Action::Jump));
//! ```

mod error;
mod input_buffer;
mod sender;
mod transport;
pub mod wire;

pub use error::{Error, Result};
pub use input_buffer::{OverflowPolicy, ReceiverQueue, ReceiverStats, SharedReceiver, DEFAULT_CAPACITY};
pub use sender::{IntentSender, SequenceCounter};
pub use transport::{LoopbackTransport, Transport};
pub use wire::SequencedIntent;
