//! Discrete curvature and twist at interior vertices.
//!
//! All functions take the quantities of the two edges meeting at a vertex:
//! edge `i − 1` ("prev") and edge `i` ("next").

use tress_math::{parallel_transport, signed_angle, DVec2, DVec3};
use tress_types::constants::PARALLEL_EPSILON;

/// Curvature binormal `kb = 2·(t_prev × t_next) / (1 + t_prev · t_next)`.
///
/// A vertex folded completely back on itself has no finite curvature
/// binormal; zero is returned instead.
#[inline]
pub fn curvature_binormal(t_prev: DVec3, t_next: DVec3) -> DVec3 {
    let denom = 1.0 + t_prev.dot(t_next);
    if denom < PARALLEL_EPSILON {
        return DVec3::ZERO;
    }
    t_prev.cross(t_next) * (2.0 / denom)
}

/// Material curvature `κ = (½ kb·(m2_prev + m2_next), −½ kb·(m1_prev + m1_next))`.
#[inline]
pub fn material_curvature(
    kb: DVec3,
    m1_prev: DVec3,
    m2_prev: DVec3,
    m1_next: DVec3,
    m2_next: DVec3,
) -> DVec2 {
    DVec2::new(
        0.5 * (kb.dot(m2_prev) + kb.dot(m2_next)),
        -0.5 * (kb.dot(m1_prev) + kb.dot(m1_next)),
    )
}

/// Discrete twist: signed angle about `t_next` from the space-transported
/// `m1_prev` to `m1_next`.
#[inline]
pub fn discrete_twist(t_prev: DVec3, t_next: DVec3, m1_prev: DVec3, m1_next: DVec3) -> f64 {
    let transported = parallel_transport(m1_prev, t_prev, t_next);
    signed_angle(transported, m1_next, t_next)
}
