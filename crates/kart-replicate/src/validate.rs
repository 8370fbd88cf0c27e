//! Range checks applied to every move at the authority boundary.

use kart_motion::Move;
use thiserror::Error;

/// Why the authority dropped a move.  Never sent back to the client.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum MoveRejection {
    #[error("throttle {0} outside [-1, 1]")]
    Throttle(f32),

    #[error("steering {0} outside [-1, 1]")]
    Steering(f32),

    #[error("delta time {0} is not positive")]
    DeltaTime(f32),

    #[error("delta time {got} exceeds the {max} s limit")]
    DeltaTimeTooLong { got: f32, max: f32 },

    #[error("timestamp {0} is not finite")]
    Timestamp(f64),
}

/// Bounds beyond the fixed `[-1, 1]` input range.
#[derive(Copy, Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MoveLimits {
    /// Longest time slice a single move may claim.  Stops a client from
    /// stretching one full-throttle sample over seconds of simulated time.
    pub max_delta_time: f32,
}

impl Default for MoveLimits {
    fn default() -> Self {
        Self { max_delta_time: 0.25 }
    }
}

/// Accept or reject `mv` before it may touch canonical state.
///
/// NaN inputs fail the range checks because every comparison with NaN is
/// false.
pub fn validate_move(mv: &Move, limits: &MoveLimits) -> Result<(), MoveRejection> {
    if !(mv.throttle.abs() <= 1.0) {
        return Err(MoveRejection::Throttle(mv.throttle));
    }
    if !(mv.steering_throw.abs() <= 1.0) {
        return Err(MoveRejection::Steering(mv.steering_throw));
    }
    if !(mv.delta_time > 0.0) {
        return Err(MoveRejection::DeltaTime(mv.delta_time));
    }
    if !(mv.delta_time <= limits.max_delta_time) {
        return Err(MoveRejection::DeltaTimeTooLong {
            got: mv.delta_time,
            max: limits.max_delta_time,
        });
    }
    if !mv.timestamp.is_finite() {
        return Err(MoveRejection::Timestamp(mv.timestamp));
    }
    Ok(())
}
