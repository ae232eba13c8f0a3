//! Arc-length resampling of a polyline.
//!
//! Loaded hair geometry is usually sampled unevenly; the simulator wants
//! roughly uniform edge lengths. Resampling keeps the first and last
//! points exactly and spaces the rest evenly along the input curve.

use tress_math::DVec3;
use tress_types::{TressError, TressResult};

/// Resamples `points` to exactly `vertex_count` points at equal arc length.
pub fn subdivide(points: &[DVec3], vertex_count: usize) -> TressResult<Vec<DVec3>> {
    if vertex_count < 2 {
        return Err(TressError::InvalidConfig(format!(
            "Resampled strand needs at least 2 vertices, got {vertex_count}"
        )));
    }
    if points.len() < 2 {
        return Err(TressError::InvalidStrand(format!(
            "A strand needs at least 2 vertices, got {}",
            points.len()
        )));
    }

    let first = points[0];
    let last = points[points.len() - 1];
    let total: f64 = points.windows(2).map(|w| (w[1] - w[0]).length()).sum();
    if total <= 0.0 {
        return Ok(vec![first; vertex_count]);
    }

    let spacing = total / (vertex_count - 1) as f64;
    let mut out = Vec::with_capacity(vertex_count);
    out.push(first);

    let mut segment = 0;
    let mut walked = 0.0; // arc length at the start of `segment`
    for k in 1..vertex_count - 1 {
        let target = k as f64 * spacing;
        loop {
            let seg_len = (points[segment + 1] - points[segment]).length();
            if walked + seg_len >= target || segment + 2 >= points.len() {
                let t = if seg_len > 0.0 {
                    ((target - walked) / seg_len).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                out.push(points[segment].lerp(points[segment + 1], t));
                break;
            }
            walked += seg_len;
            segment += 1;
        }
    }

    out.push(last);
    Ok(out)
}
