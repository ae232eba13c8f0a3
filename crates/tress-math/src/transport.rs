//! Parallel transport between unit tangents.
//!
//! The minimal (shortest-arc) rotation taking `from` to `to` rotates about
//! `from × to` by the angle between the two vectors. Applying it to a frame
//! director transports that director without introducing twist.
//!
//! ## Degenerate cases
//!
//! - Parallel tangents (`|from × to| < PARALLEL_EPSILON`, `from · to > 0`):
//!   identity.
//! - Antiparallel tangents: a half-turn about `normalize(from × e)`, where
//!   `e` is the world axis least aligned with `from` (X, then Y, then Z on
//!   ties). The choice depends only on `from`, so repeated transports of
//!   the same configuration always take the same branch.

use std::f64::consts::PI;

use glam::{DQuat, DVec3};
use tress_types::constants::PARALLEL_EPSILON;

/// Shortest-arc rotation mapping unit vector `from` onto unit vector `to`.
///
/// The angle is `acos(clamp(from · to, -1, 1))`, evaluated as
/// `atan2(|from × to|, from · to)` which agrees with it everywhere and
/// keeps full precision near 0 and π.
pub fn minimal_rotation(from: DVec3, to: DVec3) -> DQuat {
    let axis = from.cross(to);
    let axis_len = axis.length();
    let cos = from.dot(to).clamp(-1.0, 1.0);

    if axis_len < PARALLEL_EPSILON {
        if cos > 0.0 {
            return DQuat::IDENTITY;
        }
        return DQuat::from_axis_angle(antiparallel_axis(from), PI);
    }

    let angle = axis_len.atan2(cos);
    DQuat::from_axis_angle(axis / axis_len, angle)
}

/// Transport vector `v` by the minimal rotation from `from` to `to`.
#[inline]
pub fn parallel_transport(v: DVec3, from: DVec3, to: DVec3) -> DVec3 {
    minimal_rotation(from, to) * v
}

/// Signed angle from `u` to `v` measured about `axis` (right-hand rule).
///
/// Both vectors are expected to lie (approximately) in the plane
/// orthogonal to `axis`. Returns a value in `(-π, π]`.
#[inline]
pub fn signed_angle(u: DVec3, v: DVec3, axis: DVec3) -> f64 {
    u.cross(v).dot(axis).atan2(u.dot(v))
}

/// Rotation axis used for the antiparallel tie-break.
pub fn antiparallel_axis(from: DVec3) -> DVec3 {
    let candidates = [DVec3::X, DVec3::Y, DVec3::Z];
    let mut best = candidates[0];
    let mut best_dot = from.dot(best).abs();
    for &e in &candidates[1..] {
        let d = from.dot(e).abs();
        if d < best_dot {
            best = e;
            best_dot = d;
        }
    }
    // `best` is never parallel to a unit `from`: its |dot| is at most 1/√3.
    from.cross(best).try_normalize().unwrap_or(DVec3::X)
}
