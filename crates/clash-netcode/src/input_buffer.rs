//! Receive-side input buffering for network synchronization
//!
//! Holds remote intents that have arrived but not yet been consumed by the
//! simulation. One intent is released per tick; when nothing is pending the
//! last applied intent is repeated (hold-last-state).

use crate::wire::{self, SequencedIntent};
use crate::{Error, Result};
use clash_core::{Intent, Sequence};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

/// Default number of pending intents: two seconds at 60 ticks per second
pub const DEFAULT_CAPACITY: usize = 120;

/// What to do with a new intent when the pending queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Evict the oldest pending intent to make room
    #[default]
    DropOldest,
    /// Refuse the new intent with `Error::QueueFull`
    RejectNewest,
}

/// Counters for everything the receiver has seen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    /// Intents appended to the pending queue
    pub accepted: u64,
    /// Intents released to the simulation
    pub applied: u64,
    /// Late arrivals at or below the last applied sequence, and repeats of
    /// a sequence still pending
    pub stale: u64,
    /// Arrivals older than an intent already queued
    pub reordered: u64,
    /// Payloads that failed to decode
    pub malformed: u64,
    /// Pending intents evicted by `OverflowPolicy::DropOldest`
    pub evicted: u64,
}

/// FIFO of remote intents with stale-sequence discard
///
/// Invariants:
/// - pending sequences are strictly increasing, front to back
/// - every pending sequence is greater than `last_applied`
/// - a sequence is released by [`poll`](Self::poll) at most once
#[derive(Debug)]
pub struct ReceiverQueue {
    /// Pending intents (oldest first)
    pending: VecDeque<SequencedIntent>,
    /// Maximum number of pending intents
    capacity: usize,
    overflow: OverflowPolicy,
    /// Sequence of the intent most recently released
    last_applied: Option<Sequence>,
    /// Intent returned while nothing new is pending
    held: Intent,
    stats: ReceiverStats,
}

impl ReceiverQueue {
    /// Create a queue with the given capacity and the default overflow policy
    pub fn new(capacity: usize) -> Self {
        Self::with_policy(capacity, OverflowPolicy::default())
    }

    /// Create a queue with an explicit overflow policy
    ///
    /// A capacity of zero is raised to one.
    pub fn with_policy(capacity: usize, overflow: OverflowPolicy) -> Self {
        let capacity = capacity.max(1);
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity,
            overflow,
            last_applied: None,
            held: Intent::NONE,
            stats: ReceiverStats::default(),
        }
    }

    /// Decode a raw message and queue it
    ///
    /// Malformed payloads, stale sequences and out-of-order arrivals are
    /// counted and returned as errors; none of them disturb the queue.
    pub fn enqueue(&mut self, message: &str) -> Result<Sequence> {
        let entry = match wire::decode(message) {
            Ok(entry) => entry,
            Err(e) => {
                self.stats.malformed += 1;
                return Err(e);
            }
        };
        self.push(entry)?;
        Ok(entry.sequence)
    }

    /// Queue an already decoded intent
    pub fn push(&mut self, entry: SequencedIntent) -> Result<()> {
        let sequence = entry.sequence;

        if self.last_applied.is_some_and(|last| sequence <= last) {
            self.stats.stale += 1;
            return Err(Error::StaleMessage {
                sequence,
                last_applied: self.last_applied,
            });
        }

        if let Some(newest) = self.newest_sequence() {
            if sequence <= newest && self.pending.iter().any(|e| e.sequence == sequence) {
                // At-least-once delivery repeated a message still pending
                self.stats.stale += 1;
                return Err(Error::StaleMessage {
                    sequence,
                    last_applied: self.last_applied,
                });
            }
            if sequence < newest {
                self.stats.reordered += 1;
                return Err(Error::OrderingViolation { sequence, newest });
            }
        }

        if self.pending.len() >= self.capacity {
            match self.overflow {
                OverflowPolicy::RejectNewest => {
                    return Err(Error::QueueFull {
                        capacity: self.capacity,
                    })
                }
                OverflowPolicy::DropOldest => {
                    if let Some(evicted) = self.pending.pop_front() {
                        self.stats.evicted += 1;
                        debug!(sequence = evicted.sequence, "evicted oldest pending intent");
                    }
                }
            }
        }

        self.pending.push_back(entry);
        self.stats.accepted += 1;
        Ok(())
    }

    /// Release the intent for this tick
    ///
    /// Returns the oldest pending intent, or repeats the last applied one
    /// when nothing is pending. Never blocks and never fails.
    pub fn poll(&mut self) -> Intent {
        self.poll_fresh().0
    }

    /// Release the intent for this tick and report whether it was newly
    /// dequeued (`true`) or is the held intent repeated (`false`)
    pub fn poll_fresh(&mut self) -> (Intent, bool) {
        while let Some(entry) = self.pending.pop_front() {
            if self.last_applied.is_some_and(|last| entry.sequence <= last) {
                // Unreachable while push() holds its invariant
                warn!(sequence = entry.sequence, "dropping stale intent at dequeue");
                self.stats.stale += 1;
                continue;
            }
            self.last_applied = Some(entry.sequence);
            self.held = entry.intent;
            self.stats.applied += 1;
            return (self.held, true);
        }
        (self.held, false)
    }

    /// Intent that is being held between arrivals
    pub fn held(&self) -> Intent {
        self.held
    }

    /// Sequence of the most recently released intent
    pub fn last_applied(&self) -> Option<Sequence> {
        self.last_applied
    }

    /// Oldest pending sequence
    pub fn oldest_sequence(&self) -> Option<Sequence> {
        self.pending.front().map(|e| e.sequence)
    }

    /// Newest pending sequence
    pub fn newest_sequence(&self) -> Option<Sequence> {
        self.pending.back().map(|e| e.sequence)
    }

    /// Get the number of pending intents
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Check if the queue is at capacity
    pub fn is_full(&self) -> bool {
        self.pending.len() >= self.capacity
    }

    /// Get the capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the overflow policy
    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow
    }

    /// Counters since creation
    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }
}

impl Default for ReceiverQueue {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Lock-protected [`ReceiverQueue`] shared between the tick and the network callback
///
/// Cloning yields another handle to the same queue, so a transport callback
/// running on its own thread can enqueue while the simulation polls. Every
/// enqueue and poll is serialized by one lock, which preserves arrival order.
#[derive(Debug, Clone, Default)]
pub struct SharedReceiver {
    inner: Arc<Mutex<ReceiverQueue>>,
}

impl SharedReceiver {
    /// Wrap a fresh queue
    pub fn new(queue: ReceiverQueue) -> Self {
        Self {
            inner: Arc::new(Mutex::new(queue)),
        }
    }

    /// Decode and queue a raw message; see [`ReceiverQueue::enqueue`]
    pub fn enqueue(&self, message: &str) -> Result<Sequence> {
        let result = self.inner.lock().enqueue(message);
        match &result {
            Ok(sequence) => debug!(sequence, "queued remote intent"),
            Err(e @ Error::StaleMessage { .. }) => debug!(error = %e, "discarded stale intent"),
            Err(e @ Error::OrderingViolation { .. }) => warn!(error = %e, "out-of-order intent dropped"),
            Err(e) => warn!(error = %e, "discarded remote intent"),
        }
        result
    }

    /// Release the intent for this tick; see [`ReceiverQueue::poll`]
    pub fn poll(&self) -> Intent {
        self.inner.lock().poll()
    }

    /// Release the intent for this tick; see [`ReceiverQueue::poll_fresh`]
    pub fn poll_fresh(&self) -> (Intent, bool) {
        self.inner.lock().poll_fresh()
    }

    /// Run `f` with the queue locked
    pub fn with<R>(&self, f: impl FnOnce(&ReceiverQueue) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Sequence of the most recently released intent
    pub fn last_applied(&self) -> Option<Sequence> {
        self.inner.lock().last_applied()
    }

    /// Number of pending intents
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Counters since creation
    pub fn stats(&self) -> ReceiverStats {
        self.inner.lock().stats()
    }
}
