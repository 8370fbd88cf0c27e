//! Simulated one-way link with deterministic latency, jitter, and loss.
//!
//! Packets are keyed by delivery time in microseconds plus a send sequence,
//! so equal delivery times come out in send order and the whole schedule is
//! a plain `BTreeMap` walk.  Jitter wider than the send interval reorders
//! packets; nothing here tries to prevent that.

use std::collections::BTreeMap;

use kart_core::SimRng;
use kart_replicate::Channel;
use tracing::trace;

use crate::LinkConfig;

/// Running totals for one link.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub sent:      u64,
    pub dropped:   u64,
    pub delivered: u64,
}

/// One direction of a lossy, jittery connection.
pub struct SimulatedLink<M> {
    config:    LinkConfig,
    rng:       SimRng,
    /// `(deliver_at_us, seq) → packet`.
    in_flight: BTreeMap<(u64, u64), M>,
    next_seq:  u64,
    stats:     LinkStats,
}

impl<M> SimulatedLink<M> {
    pub fn new(config: LinkConfig, rng: SimRng) -> Self {
        Self {
            config,
            rng,
            in_flight: BTreeMap::new(),
            next_seq:  0,
            stats:     LinkStats::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    #[inline]
    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    /// Change the loss rate mid-session, e.g. to model an outage.
    pub fn set_loss(&mut self, loss: f64) {
        self.config.loss = loss.clamp(0.0, 1.0);
    }

    /// Sample this packet's one-way latency.  Never negative.
    fn sample_latency(&mut self) -> f64 {
        let jitter = self.config.jitter_secs;
        let offset = if jitter > 0.0 { self.rng.gen_range(-jitter..=jitter) } else { 0.0 };
        (self.config.latency_secs + offset).max(0.0)
    }
}

impl<M> Channel<M> for SimulatedLink<M> {
    fn send(&mut self, now: f64, msg: M) {
        self.stats.sent += 1;
        if self.config.loss > 0.0 && self.rng.gen_bool(self.config.loss) {
            self.stats.dropped += 1;
            trace!(now, "packet lost");
            return;
        }
        let deliver_at = now + self.sample_latency();
        let key = (to_micros(deliver_at), self.next_seq);
        self.next_seq += 1;
        self.in_flight.insert(key, msg);
    }

    fn receive(&mut self, now: f64) -> Vec<M> {
        // Everything keyed strictly below (now + 1 µs, 0) is due.
        let later = self.in_flight.split_off(&(to_micros(now) + 1, 0));
        let due = std::mem::replace(&mut self.in_flight, later);
        self.stats.delivered += due.len() as u64;
        due.into_values().collect()
    }

    fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

#[inline]
fn to_micros(secs: f64) -> u64 {
    (secs.max(0.0) * 1_000_000.0).round() as u64
}
