//! The `Move` record: one control input sample plus the time slice it
//! applies to.

/// An immutable, timestamped control sample.
///
/// `delta_time` travels with the move because the sender's frame time may
/// differ from the receiver's; replaying a move must integrate over the same
/// slice the sender used.
///
/// `timestamp` is read from the authority's clock and is the move's only
/// identity.  Two moves with identical inputs are still distinct moves; two
/// moves are "the same or earlier" strictly by timestamp comparison.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    /// Forward/backward input in `[-1, 1]`.
    pub throttle:       f32,
    /// Left/right input in `[-1, 1]`.
    pub steering_throw: f32,
    /// Seconds of simulated time this move covers.  Must be `> 0`.
    pub delta_time:     f32,
    /// Authority game time (seconds) when the move was recorded.
    pub timestamp:      f64,
}

impl Move {
    /// Placeholder "no move yet" record.
    ///
    /// Its timestamp is below every real clock reading, so it never
    /// acknowledges anything, and its zero `delta_time` makes stepping it a
    /// no-op.
    pub const NONE: Move = Move {
        throttle:       0.0,
        steering_throw: 0.0,
        delta_time:     0.0,
        timestamp:      f64::NEG_INFINITY,
    };

    /// `true` if `self` was recorded strictly after `other`.
    #[inline]
    pub fn is_after(&self, other: &Move) -> bool {
        self.timestamp > other.timestamp
    }

    /// `true` if an authority whose last applied move is `watermark` has
    /// already incorporated `self`.
    #[inline]
    pub fn acknowledged_by(&self, watermark: &Move) -> bool {
        self.timestamp <= watermark.timestamp
    }
}

impl Default for Move {
    fn default() -> Self {
        Self::NONE
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "move@{:.3} (throttle {:+.2}, steer {:+.2}, dt {:.4})",
            self.timestamp, self.throttle, self.steering_throw, self.delta_time
        )
    }
}
