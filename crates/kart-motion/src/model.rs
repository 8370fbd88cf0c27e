//! The motion model: one control input over one time slice.

use glam::{Quat, Vec3};
use kart_core::Transform;
use kart_core::transform::UP;
use tracing::trace;

use crate::{Collider, KartState, Move, MotionParams, OpenGround};

/// Deterministic single-body integrator.
///
/// # Type parameter
///
/// `C` is the host's collision primitive.  It is fixed at construction so
/// `step` stays a function of `(state, move)` alone.
#[derive(Clone, Debug, Default)]
pub struct MotionModel<C: Collider = OpenGround> {
    pub params:   MotionParams,
    pub collider: C,
}

impl MotionModel<OpenGround> {
    /// A model driving on an unobstructed plane.
    pub fn open(params: MotionParams) -> Self {
        Self { params, collider: OpenGround }
    }
}

impl<C: Collider> MotionModel<C> {
    pub fn new(params: MotionParams, collider: C) -> Self {
        Self { params, collider }
    }

    /// Advance `state` by `mv`.
    ///
    /// A move whose `delta_time` is not a positive finite number is a no-op:
    /// the input state comes back unchanged (including `last_move`).
    pub fn step(&self, state: &KartState, mv: &Move) -> KartState {
        let dt = mv.delta_time;
        if !(dt > 0.0 && dt.is_finite()) {
            trace!(%mv, "skipping move with non-positive delta time");
            return *state;
        }
        let p = &self.params;
        let forward = state.transform.forward();

        // ① forces → velocity
        let force = forward * p.max_driving_force * mv.throttle
            + self.air_resistance(state.velocity)
            + self.rolling_resistance(state.velocity);
        let acceleration = force / p.mass;
        let mut velocity = state.velocity + acceleration * dt;

        // ② steering: turn in proportion to distance covered along the
        //    forward axis, so a reversing body turns the other way.
        let signed_forward = forward.dot(velocity) * dt;
        let angle = signed_forward / p.min_turning_radius * mv.steering_throw;
        velocity = Quat::from_axis_angle(UP, angle) * velocity;
        let yaw = state.transform.rotated(angle).yaw;

        // ③ translate through the world
        let translation = velocity * dt * p.units_per_meter;
        let sweep = self.collider.sweep(state.transform.position, translation);
        if sweep.blocked {
            velocity = Vec3::ZERO;
        }

        KartState {
            transform: Transform { position: sweep.position, yaw },
            velocity,
            last_move: *mv,
        }
    }

    /// Fold `step` over `moves` in order, starting from `base`.
    pub fn replay<'a, I>(&self, base: &KartState, moves: I) -> KartState
    where
        I: IntoIterator<Item = &'a Move>,
    {
        moves.into_iter().fold(*base, |state, mv| self.step(&state, mv))
    }

    /// Drag opposing motion, quadratic in speed.
    #[inline]
    pub fn air_resistance(&self, velocity: Vec3) -> Vec3 {
        -velocity.normalize_or_zero() * velocity.length_squared() * self.params.drag_coefficient
    }

    /// Constant-magnitude rolling friction opposing motion.
    #[inline]
    pub fn rolling_resistance(&self, velocity: Vec3) -> Vec3 {
        -velocity.normalize_or_zero()
            * self.params.rolling_resistance_coefficient
            * self.params.normal_force()
    }
}
