//! Reconciliation: snap to the authority, prune, replay.

use kart_motion::{Collider, KartState, MotionModel};
use tracing::trace;

use crate::PredictionQueue;

/// Outcome of one reconciliation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Reconciliation {
    /// The corrected prediction.
    pub state:      KartState,
    /// Moves dropped as already acknowledged.
    pub pruned:     usize,
    /// Moves replayed on top of the authority's state.
    pub replayed:   usize,
    /// Distance (host units) between the prediction before and after.  Zero
    /// means the prediction was exactly right.
    pub correction: f32,
}

/// Stateless snap / prune / replay.
pub struct Reconciler;

impl Reconciler {
    /// Rebuild the current prediction from an authoritative state.
    ///
    /// 1. Start from `authoritative` (every field overwritten).
    /// 2. Drop queued moves at or below `authoritative.last_move`.
    /// 3. Replay the remaining moves in ascending timestamp order.
    ///
    /// `predicted` is the state held before this update, used only to
    /// measure the correction.
    pub fn reconcile<C: Collider>(
        model:         &MotionModel<C>,
        queue:         &mut PredictionQueue,
        authoritative: &KartState,
        predicted:     Option<&KartState>,
    ) -> Reconciliation {
        let pruned = queue.prune(&authoritative.last_move);
        let replayed = queue.len();
        let state = model.replay(authoritative, queue.iter());

        let correction = predicted
            .map(|p| p.transform.distance(&state.transform))
            .unwrap_or(0.0);

        trace!(pruned, replayed, correction, "reconciled against authority");
        Reconciliation { state, pruned, replayed, correction }
    }
}
