//! Per-body kinematic state.

use glam::Vec3;
use kart_core::Transform;

use crate::Move;

/// Kinematic snapshot of one body plus the move that produced it.
///
/// Used both for the authority's canonical state and for a participant's
/// local prediction.  A `step` replaces the whole value at once; there is no
/// partial update.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KartState {
    pub transform: Transform,
    /// Metres per second.
    pub velocity:  Vec3,
    /// The last move applied to reach this state.  Serves as the authority's
    /// acknowledgement watermark.
    pub last_move: Move,
}

impl KartState {
    /// A body standing still at `transform`, with no move applied yet.
    #[inline]
    pub fn at_rest(transform: Transform) -> Self {
        Self {
            transform,
            velocity:  Vec3::ZERO,
            last_move: Move::NONE,
        }
    }

    /// Speed in metres per second.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Timestamp of the last applied move.
    #[inline]
    pub fn watermark(&self) -> f64 {
        self.last_move.timestamp
    }
}
