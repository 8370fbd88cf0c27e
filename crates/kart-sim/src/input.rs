//! Scripted driver input.
//!
//! A session has no keyboard.  Each controlling participant asks an
//! [`InputScript`] for its control values once per tick, before recording
//! its move.

use kart_core::{BodyId, ParticipantId, Tick};
use kart_motion::ControlInput;

/// Source of control values for controlled bodies.
///
/// Implementations should be deterministic for reproducible sessions.  Any
/// `FnMut(ParticipantId, BodyId, Tick) -> ControlInput` closure is a script.
pub trait InputScript {
    fn input(&mut self, participant: ParticipantId, body: BodyId, tick: Tick) -> ControlInput;
}

impl<F> InputScript for F
where
    F: FnMut(ParticipantId, BodyId, Tick) -> ControlInput,
{
    #[inline]
    fn input(&mut self, participant: ParticipantId, body: BodyId, tick: Tick) -> ControlInput {
        self(participant, body, tick)
    }
}

/// The same input for every body on every tick.
#[derive(Copy, Clone, Debug, Default)]
pub struct ConstantInput(pub ControlInput);

impl ConstantInput {
    pub fn full_throttle() -> Self {
        Self(ControlInput::new(1.0, 0.0))
    }
}

impl InputScript for ConstantInput {
    #[inline]
    fn input(&mut self, _participant: ParticipantId, _body: BodyId, _tick: Tick) -> ControlInput {
        self.0
    }
}

/// Fixed throttle with steering swept sinusoidally, phase-shifted per body
/// so karts don't move in lockstep.
#[derive(Copy, Clone, Debug)]
pub struct SlalomInput {
    pub throttle:     f32,
    /// Peak steering throw, `[0, 1]`.
    pub amplitude:    f32,
    /// Ticks per full left-right-left cycle.
    pub period_ticks: u64,
}

impl Default for SlalomInput {
    fn default() -> Self {
        Self { throttle: 0.8, amplitude: 0.6, period_ticks: 180 }
    }
}

impl InputScript for SlalomInput {
    fn input(&mut self, _participant: ParticipantId, body: BodyId, tick: Tick) -> ControlInput {
        let period = self.period_ticks.max(1);
        let phase = (tick.0 + body.0 as u64 * period / 4) % period;
        let angle = phase as f32 / period as f32 * std::f32::consts::TAU;
        ControlInput::new(self.throttle, self.amplitude * angle.sin()).clamped()
    }
}
