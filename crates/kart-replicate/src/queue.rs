//! `PredictionQueue`: the predicting participant's unacknowledged moves.
//!
//! Moves are appended in creation order, which is also timestamp order, so
//! the queue is always sorted by strictly ascending timestamp.  That makes
//! pruning a pop-from-front loop: everything at or below the watermark is at
//! the head.
//!
//! # Growth bound
//!
//! If moves are lost on the way to the authority, or broadcasts stop
//! arriving, nothing is ever acknowledged.  `QueuePolicy::capacity` caps the
//! queue; past it the oldest move is evicted.  An evicted move can no longer
//! be replayed, so the next reconciliation lands short of the true
//! prediction and the participant visibly snaps once the authority catches
//! up.  That trade is preferred over unbounded replay cost per broadcast.

use std::collections::VecDeque;

use kart_motion::Move;
use tracing::warn;

use crate::{ReplicateError, ReplicateResult};

/// Sizing for a [`PredictionQueue`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QueuePolicy {
    /// Maximum buffered moves.  Default 256: a little over 4 s at 60 Hz.
    pub capacity: usize,
}

impl Default for QueuePolicy {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

/// Ordered buffer of moves the authority has not yet acknowledged.
#[derive(Clone, Debug, Default)]
pub struct PredictionQueue {
    moves:   VecDeque<Move>,
    policy:  QueuePolicy,
    evicted: u64,
}

impl PredictionQueue {
    pub fn new(policy: QueuePolicy) -> Self {
        Self {
            moves: VecDeque::with_capacity(policy.capacity.min(1024)),
            policy,
            evicted: 0,
        }
    }

    /// Append a freshly recorded move at the tail.
    ///
    /// # Errors
    ///
    /// `OutOfOrderMove` if `mv` is not strictly after the current tail; the
    /// queue is left unchanged.
    pub fn push(&mut self, mv: Move) -> ReplicateResult<()> {
        if let Some(tail) = self.moves.back() {
            if !mv.is_after(tail) {
                return Err(ReplicateError::OutOfOrderMove {
                    timestamp: mv.timestamp,
                    tail:      tail.timestamp,
                });
            }
        }
        self.moves.push_back(mv);

        while self.moves.len() > self.policy.capacity {
            if let Some(dropped) = self.moves.pop_front() {
                self.evicted += 1;
                warn!(
                    timestamp = dropped.timestamp,
                    capacity  = self.policy.capacity,
                    "prediction queue full, evicting oldest unacknowledged move"
                );
            }
        }
        Ok(())
    }

    /// Remove every move with `timestamp <= watermark.timestamp`.
    ///
    /// Returns how many moves were removed.  Pruning twice with the same
    /// watermark removes nothing the second time.
    pub fn prune(&mut self, watermark: &Move) -> usize {
        let mut removed = 0;
        while self.moves.front().is_some_and(|m| m.acknowledged_by(watermark)) {
            self.moves.pop_front();
            removed += 1;
        }
        removed
    }

    /// Moves in ascending timestamp order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Move> + '_ {
        self.moves.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The newest queued move.
    #[inline]
    pub fn back(&self) -> Option<&Move> {
        self.moves.back()
    }

    /// Total moves evicted by the capacity bound since creation.
    #[inline]
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    #[inline]
    pub fn policy(&self) -> QueuePolicy {
        self.policy
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }
}
