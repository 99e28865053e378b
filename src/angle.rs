//! Orientation helpers for undirected lines.
//!
//! Strokes have no sign: a connector drawn left to right and one drawn right
//! to left share an orientation. Everything here therefore works modulo π.
use std::f32::consts::{FRAC_PI_2, PI};

/// Fold an angle into `[0, π)`.
#[inline]
pub fn normalize_half_pi(angle: f32) -> f32 {
    let folded = angle.rem_euclid(PI);
    // rem_euclid can round up to exactly π for tiny negative inputs.
    if folded >= PI - 1e-6 {
        0.0
    } else {
        folded
    }
}

/// Unsigned difference between two orientations, in `[0, π/2]`.
#[inline]
pub fn angular_difference(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(PI);
    if d > FRAC_PI_2 {
        PI - d
    } else {
        d
    }
}

/// Angle between the lines spanned by `a` and `b`, in `[0, π/2]`.
#[inline]
pub fn angle_between_dirless(a: &[f32; 2], b: &[f32; 2]) -> f32 {
    let na = a[0].hypot(a[1]).max(1e-6);
    let nb = b[0].hypot(b[1]).max(1e-6);
    let cos = ((a[0] * b[0] + a[1] * b[1]) / (na * nb)).abs().min(1.0);
    cos.acos()
}

/// Degrees between direction `d` and the closest image axis, in `[0, 45]`.
#[inline]
pub fn axis_deviation_deg(d: [f32; 2]) -> f32 {
    let theta = normalize_half_pi(d[1].atan2(d[0])).to_degrees() % 90.0;
    theta.min(90.0 - theta)
}
