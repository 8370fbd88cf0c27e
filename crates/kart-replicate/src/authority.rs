//! The authority's canonical copy of a body.

use kart_motion::{Collider, KartState, MotionModel, Move};
use tracing::debug;

use crate::{MoveLimits, MoveRejection, validate_move};

/// Canonical state of one body, owned and mutated only by the authority.
#[derive(Clone, Debug)]
pub struct AuthorityState {
    state:    KartState,
    limits:   MoveLimits,
    accepted: u64,
    rejected: u64,
}

impl AuthorityState {
    pub fn new(initial: KartState, limits: MoveLimits) -> Self {
        Self { state: initial, limits, accepted: 0, rejected: 0 }
    }

    /// The current canonical state.
    #[inline]
    pub fn state(&self) -> &KartState {
        &self.state
    }

    /// Validate `mv`, then apply it.
    ///
    /// Moves are applied in the order they are received; no reordering by
    /// timestamp happens here.  A rejected move leaves the state untouched.
    pub fn receive_move<C: Collider>(
        &mut self,
        model: &MotionModel<C>,
        mv:    Move,
    ) -> Result<&KartState, MoveRejection> {
        if let Err(reason) = validate_move(&mv, &self.limits) {
            self.rejected += 1;
            debug!(%mv, %reason, "dropping invalid move");
            return Err(reason);
        }
        self.state = model.step(&self.state, &mv);
        self.accepted += 1;
        Ok(&self.state)
    }

    /// Moves applied so far.
    #[inline]
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Moves dropped by validation so far.
    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    #[inline]
    pub fn limits(&self) -> &MoveLimits {
        &self.limits
    }
}
