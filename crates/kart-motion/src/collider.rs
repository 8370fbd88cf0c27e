//! The host's "move and report collision" primitive.
//!
//! The motion model never resolves contacts itself.  It hands the desired
//! translation to a [`Collider`], which stops the body at the first contact
//! point and says whether a blocking hit occurred.

use glam::{Vec2, Vec3};

use crate::{MotionError, MotionResult};

/// Result of sweeping a body along a translation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sweep {
    /// Where the body ends up: the full target, or the contact point.
    pub position: Vec3,
    /// `true` if the translation was cut short by an obstruction.
    pub blocked:  bool,
}

/// World geometry the body moves through.
///
/// Implementations must be deterministic: the same `from` and `translation`
/// always yield the same `Sweep`.
pub trait Collider {
    fn sweep(&self, from: Vec3, translation: Vec3) -> Sweep;
}

impl<C: Collider + ?Sized> Collider for &C {
    #[inline]
    fn sweep(&self, from: Vec3, translation: Vec3) -> Sweep {
        (**self).sweep(from, translation)
    }
}

/// An unobstructed plane.
#[derive(Copy, Clone, Debug, Default)]
pub struct OpenGround;

impl Collider for OpenGround {
    #[inline]
    fn sweep(&self, from: Vec3, translation: Vec3) -> Sweep {
        Sweep { position: from + translation, blocked: false }
    }
}

/// A rectangular track enclosed by walls, in host units on the XY plane.
///
/// Leaving the rectangle is a blocking hit at the wall.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Arena {
    min: Vec2,
    max: Vec2,
}

impl Arena {
    pub fn new(min: Vec2, max: Vec2) -> MotionResult<Self> {
        if !(min.x < max.x && min.y < max.y) {
            return Err(MotionError::EmptyArena { min: min.to_array(), max: max.to_array() });
        }
        Ok(Self { min, max })
    }

    /// A square arena of half-width `half_extent` centred on the origin.
    pub fn square(half_extent: f32) -> MotionResult<Self> {
        Self::new(Vec2::splat(-half_extent), Vec2::splat(half_extent))
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Fraction of `d` that can be travelled along one axis before crossing
    /// a wall.
    fn axis_fraction(from: f32, d: f32, lo: f32, hi: f32) -> f32 {
        if d > 0.0 && from + d > hi {
            (hi - from) / d
        } else if d < 0.0 && from + d < lo {
            (lo - from) / d
        } else {
            1.0
        }
    }
}

impl Collider for Arena {
    fn sweep(&self, from: Vec3, translation: Vec3) -> Sweep {
        let tx = Self::axis_fraction(from.x, translation.x, self.min.x, self.max.x);
        let ty = Self::axis_fraction(from.y, translation.y, self.min.y, self.max.y);
        let t = tx.min(ty).clamp(0.0, 1.0);
        if t < 1.0 {
            Sweep { position: from + translation * t, blocked: true }
        } else {
            Sweep { position: from + translation, blocked: false }
        }
    }
}
