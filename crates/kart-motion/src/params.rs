//! Vehicle tuning.

use crate::{MotionError, MotionResult};

/// Physical tuning for one body.
///
/// Every participant simulating the same body must use identical params;
/// differing tuning makes replay diverge from the authority.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionParams {
    /// Mass of the body (kg).
    pub mass: f32,

    /// Force applied when the throttle is fully down (N).  With the default
    /// mass this is 10 m/s² of acceleration.
    pub max_driving_force: f32,

    /// Radius of the turning circle at full steering lock (m).
    pub min_turning_radius: f32,

    /// Air drag (kg/m).  The default caps top speed at 25 m/s:
    /// 10000 N / 25² = 16.
    pub drag_coefficient: f32,

    /// Rolling resistance, dimensionless (typical tyres: 0.010–0.015).
    pub rolling_resistance_coefficient: f32,

    /// Gravitational acceleration (m/s²), used for the rolling normal force.
    pub gravity: f32,

    /// Host distance units per metre.  The default of 100 matches a
    /// centimetre-based world.
    pub units_per_meter: f32,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            mass:                           1000.0,
            max_driving_force:              10_000.0,
            min_turning_radius:             10.0,
            drag_coefficient:               16.0,
            rolling_resistance_coefficient: 0.015,
            gravity:                        9.81,
            units_per_meter:                100.0,
        }
    }
}

impl MotionParams {
    /// Check that the divisors and scales are usable.
    ///
    /// Coefficients may be zero (frictionless test rigs) but not negative.
    pub fn validate(&self) -> MotionResult<()> {
        let positive = [
            ("mass",               self.mass),
            ("min_turning_radius", self.min_turning_radius),
            ("units_per_meter",    self.units_per_meter),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(MotionError::NotPositive { name, value });
            }
        }

        let non_negative = [
            ("max_driving_force",              self.max_driving_force),
            ("drag_coefficient",               self.drag_coefficient),
            ("rolling_resistance_coefficient", self.rolling_resistance_coefficient),
            ("gravity",                        self.gravity),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(MotionError::Negative { name, value });
            }
        }
        Ok(())
    }

    /// Normal force on the ground (N).
    #[inline]
    pub fn normal_force(&self) -> f32 {
        self.mass * self.gravity
    }
}
