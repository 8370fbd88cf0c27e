//! Turning host input into `Move` records.

use kart_core::TimeSource;

use crate::Move;

/// The latest control values written by the host's input bindings.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct ControlInput {
    pub throttle: f32,
    pub steering: f32,
}

impl ControlInput {
    #[inline]
    pub fn new(throttle: f32, steering: f32) -> Self {
        Self { throttle, steering }
    }

    /// Copy with both axes clamped to `[-1, 1]`.  Input bindings call this;
    /// the authority still validates whatever arrives over the wire.
    #[inline]
    pub fn clamped(self) -> Self {
        Self {
            throttle: self.throttle.clamp(-1.0, 1.0),
            steering: self.steering.clamp(-1.0, 1.0),
        }
    }
}

/// Captures the current control input as timestamped moves.
#[derive(Clone, Debug, Default)]
pub struct MoveRecorder {
    input: ControlInput,
}

impl MoveRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a move from raw values.  Pure construction; never fails.
    #[inline]
    pub fn record(clock_time: f64, delta_time: f32, throttle: f32, steering: f32) -> Move {
        Move {
            throttle,
            steering_throw: steering,
            delta_time,
            timestamp: clock_time,
        }
    }

    pub fn set_throttle(&mut self, value: f32) {
        self.input.throttle = value;
    }

    pub fn set_steering(&mut self, value: f32) {
        self.input.steering = value;
    }

    pub fn set_input(&mut self, input: ControlInput) {
        self.input = input;
    }

    #[inline]
    pub fn input(&self) -> ControlInput {
        self.input
    }

    /// Record the current input, stamped with `clock`'s current time.
    ///
    /// `clock` must be the session's shared authority clock.
    pub fn create_move<T: TimeSource + ?Sized>(&self, clock: &T, delta_time: f32) -> Move {
        Self::record(clock.now(), delta_time, self.input.throttle, self.input.steering)
    }
}
