//! Planar body transform: a 3D position plus a rotation about the up axis.
//!
//! Axes follow the host convention: X forward at yaw 0, Z up.  Angles are
//! radians.

use glam::{Quat, Vec3};

/// World up axis.  All rotation happens about this axis.
pub const UP: Vec3 = Vec3::Z;

/// Position and yaw of a body.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    /// Position in host distance units.
    pub position: Vec3,
    /// Rotation about [`UP`] in radians, kept in `[-π, π)`.
    pub yaw: f32,
}

impl Transform {
    #[inline]
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw: wrap_angle(yaw) }
    }

    /// Unit forward vector for the current yaw.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        let (sin, cos) = self.yaw.sin_cos();
        Vec3::new(cos, sin, 0.0)
    }

    /// The yaw as a quaternion about [`UP`].
    #[inline]
    pub fn rotation(&self) -> Quat {
        Quat::from_axis_angle(UP, self.yaw)
    }

    /// Return a copy rotated by `angle` radians about [`UP`].
    #[inline]
    pub fn rotated(self, angle: f32) -> Self {
        Self::new(self.position, self.yaw + angle)
    }

    /// Straight-line distance between the two positions.
    #[inline]
    pub fn distance(&self, other: &Transform) -> f32 {
        self.position.distance(other.position)
    }
}

/// Wrap an angle into `[-π, π)`.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

impl std::fmt::Display for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}, {:.2}) yaw {:.3}",
            self.position.x, self.position.y, self.position.z, self.yaw
        )
    }
}
