//! Message delivery between participants.
//!
//! A channel makes no ordering promise: messages may come out of `receive`
//! in a different order than they went into `send`, late, or not at all.
//! Callers must not rely on exactly-once application either.

use std::collections::VecDeque;

/// One direction of a link between two participants.
pub trait Channel<M> {
    /// Queue `msg` for delivery.  `now` is the sender's game time.
    fn send(&mut self, now: f64, msg: M);

    /// Take every message deliverable at game time `now`.
    fn receive(&mut self, now: f64) -> Vec<M>;

    /// Messages sent but not yet delivered or dropped.
    fn in_flight(&self) -> usize;
}

/// Zero-latency, lossless, in-order loopback.  Used where the authority
/// talks to itself and in tests.
#[derive(Debug)]
pub struct LocalChannel<M> {
    queue: VecDeque<M>,
}

impl<M> Default for LocalChannel<M> {
    fn default() -> Self {
        Self { queue: VecDeque::new() }
    }
}

impl<M> LocalChannel<M> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M> Channel<M> for LocalChannel<M> {
    fn send(&mut self, _now: f64, msg: M) {
        self.queue.push_back(msg);
    }

    fn receive(&mut self, _now: f64) -> Vec<M> {
        self.queue.drain(..).collect()
    }

    fn in_flight(&self) -> usize {
        self.queue.len()
    }
}
