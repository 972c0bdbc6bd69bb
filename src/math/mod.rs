pub mod intersect_3d;

use std::f64::consts::{PI, TAU};

/// 2D vector type, used for tangent-plane coordinates.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 3x3 matrix, used for box half axes.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Global geometric tolerance for plane construction.
pub const TOLERANCE: f64 = 1e-10;

pub const EPSILON1: f64 = 1e-1;
pub const EPSILON12: f64 = 1e-12;
pub const EPSILON14: f64 = 1e-14;
pub const EPSILON15: f64 = 1e-15;

/// Returns `true` if `left` and `right` are within `absolute_epsilon` of each
/// other, or within `relative_epsilon` scaled by the larger magnitude.
#[must_use]
pub fn equals_epsilon(left: f64, right: f64, relative_epsilon: f64, absolute_epsilon: f64) -> bool {
    let diff = (left - right).abs();
    diff <= absolute_epsilon || diff <= relative_epsilon * left.abs().max(right.abs())
}

/// Wraps an angle into `[0, 2*pi]`.
///
/// Angles already in range are returned unchanged, so `2*pi` stays `2*pi`.
/// A nonzero multiple of `2*pi` maps to `2*pi` rather than `0`.
#[must_use]
pub fn zero_to_two_pi(angle: f64) -> f64 {
    if (0.0..=TAU).contains(&angle) {
        return angle;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped.abs() < EPSILON14 && angle.abs() > EPSILON14 {
        return TAU;
    }
    wrapped
}

/// Wraps an angle into `[-pi, pi]`.
#[must_use]
pub fn negative_pi_to_pi(angle: f64) -> f64 {
    if (-PI..=PI).contains(&angle) {
        return angle;
    }
    zero_to_two_pi(angle + PI) - PI
}
