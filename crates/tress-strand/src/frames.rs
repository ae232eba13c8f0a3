//! Reference frame transport and material frames.
//!
//! Reference frames are propagated two ways:
//!
//! - **Along the rod** (construction only): edge `i` receives edge `i − 1`'s
//!   directors rotated by the minimal rotation `t[i−1] → t[i]`.
//! - **In time** (every step): each edge rotates its own directors by the
//!   minimal rotation from its previous tangent to its new tangent.
//!
//! Both finish with a re-orthonormalization against the target tangent.

use tress_math::{DVec3, Frame};

/// Builds the reference frame of every edge by space-parallel transport.
///
/// Edge 0 is seeded from a world axis (see [`Frame::from_tangent`]).
pub fn initialize_reference_frames(tangents: &[DVec3]) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::with_capacity(tangents.len());
    for (i, &t) in tangents.iter().enumerate() {
        let frame = if i == 0 {
            Frame::from_tangent(t)
        } else {
            frames[i - 1].transported(t)
        };
        frames.push(frame);
    }
    frames
}

/// Time-parallel transport: moves each frame onto its edge's new tangent.
pub fn transport_in_time(frames: &mut [Frame], new_tangents: &[DVec3]) {
    for (frame, &t) in frames.iter_mut().zip(new_tangents) {
        *frame = frame.transported(t);
    }
}

/// Material directors `(m1, m2)` per edge.
///
/// `m1 = cosθ·d1 + sinθ·d2`, `m2 = −sinθ·d1 + cosθ·d2`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialFrames {
    pub m1: Vec<DVec3>,
    pub m2: Vec<DVec3>,
}

impl MaterialFrames {
    /// Computes material directors from reference frames and twist angles.
    pub fn compute(frames: &[Frame], thetas: &[f64]) -> Self {
        let mut material = Self {
            m1: vec![DVec3::ZERO; frames.len()],
            m2: vec![DVec3::ZERO; frames.len()],
        };
        material.update(frames, thetas);
        material
    }

    /// Recomputes in place.
    pub fn update(&mut self, frames: &[Frame], thetas: &[f64]) {
        for (i, (frame, &theta)) in frames.iter().zip(thetas).enumerate() {
            let (m1, m2) = frame.rotated(theta);
            self.m1[i] = m1;
            self.m2[i] = m2;
        }
    }

    /// Material frame of edge `i` as a [`Frame`] sharing the reference tangent.
    pub fn frame(&self, i: usize, tangent: DVec3) -> Frame {
        Frame::new(tangent, self.m1[i], self.m2[i])
    }
}
