//! Procedural strand generators for benchmarks and testing.
//!
//! Every generator starts at `root` and hangs along −Y unless stated
//! otherwise, producing deterministic vertex sequences.

use std::f64::consts::TAU;

use tress_math::DVec3;

/// Straight strand of `vertex_count` vertices and total `length` along `direction`.
///
/// # Example
/// ```
/// use tress_strand::generators::straight;
/// use tress_math::DVec3;
/// let pts = straight(5, 1.0, DVec3::ZERO, DVec3::X);
/// assert_eq!(pts.len(), 5);
/// assert!((pts[4].x - 1.0).abs() < 1e-12);
/// ```
pub fn straight(vertex_count: usize, length: f64, root: DVec3, direction: DVec3) -> Vec<DVec3> {
    let dir = direction.try_normalize().unwrap_or(DVec3::NEG_Y);
    let step = length / (vertex_count.max(2) - 1) as f64;
    (0..vertex_count).map(|i| root + dir * (i as f64 * step)).collect()
}

/// Helical (curly) strand descending along −Y.
///
/// - `radius`: coil radius.
/// - `pitch`: vertical drop per full turn.
/// - `turns`: number of turns.
pub fn helix(vertex_count: usize, radius: f64, pitch: f64, turns: f64, root: DVec3) -> Vec<DVec3> {
    let n = vertex_count.max(2);
    (0..vertex_count)
        .map(|i| {
            let s = i as f64 / (n - 1) as f64;
            let phi = TAU * turns * s;
            root + DVec3::new(radius * phi.cos() - radius, -pitch * turns * s, radius * phi.sin())
        })
        .collect()
}

/// Planar wavy strand in the XY plane descending along −Y.
///
/// `amplitude` is the lateral (X) excursion, `waves` the number of full
/// periods over the strand.
pub fn wavy(vertex_count: usize, length: f64, amplitude: f64, waves: f64, root: DVec3) -> Vec<DVec3> {
    let n = vertex_count.max(2);
    (0..vertex_count)
        .map(|i| {
            let s = i as f64 / (n - 1) as f64;
            root + DVec3::new(amplitude * (TAU * waves * s).sin(), -length * s, 0.0)
        })
        .collect()
}

/// Roots of a square bundle of strands spaced `spacing` apart in the XZ plane.
pub fn bundle_roots(per_side: usize, spacing: f64, center: DVec3) -> Vec<DVec3> {
    let half = (per_side.saturating_sub(1)) as f64 * spacing * 0.5;
    let mut roots = Vec::with_capacity(per_side * per_side);
    for j in 0..per_side {
        for i in 0..per_side {
            roots.push(center + DVec3::new(i as f64 * spacing - half, 0.0, j as f64 * spacing - half));
        }
    }
    roots
}
