//! Periodic boundary coordinate correction
//!
//! The dump producer only re-wraps coordinates on reneighbouring steps, so
//! a frame can contain positions slightly outside the box. These helpers
//! fold such values back into the canonical half-open range. They are pure
//! functions; no decoder state is consulted.

use crate::property::WrapPolicy;
use crate::types::{Boundary, BoxBounds};

/// Wrap `value` into the half-open range `[lo, hi)`.
///
/// The correction only applies on a side classified as periodic: a value
/// below `lo` gains one box length when the lower side is periodic, a
/// value at or above `hi` loses one when the upper side is. A value
/// exactly at `lo` is already inside the range and is left alone.
pub fn wrap(value: f64, lo: f64, hi: f64, lower: Boundary, upper: Boundary) -> f64 {
    if lower == Boundary::Periodic && value < lo {
        value + (hi - lo)
    } else if upper == Boundary::Periodic && value >= hi {
        value - (hi - lo)
    } else {
        value
    }
}

/// Apply a field's wrap policy given the current frame's box.
///
/// With no box available (a text frame without a `BOX BOUNDS` section)
/// the boundary classifications are unknown and the value passes through
/// untouched.
pub(crate) fn correct(policy: WrapPolicy, value: f64, bounds: Option<&BoxBounds>) -> f64 {
    let Some(bounds) = bounds else {
        return value;
    };
    match policy {
        WrapPolicy::Never => value,
        WrapPolicy::Box { axis } => wrap(
            value,
            bounds.lo[axis],
            bounds.hi[axis],
            bounds.boundaries[axis][0],
            bounds.boundaries[axis][1],
        ),
        WrapPolicy::Fractional { axis } => wrap(
            value,
            0.0,
            1.0,
            bounds.boundaries[axis][0],
            bounds.boundaries[axis][1],
        ),
    }
}
