//! Adapted orthonormal frame carried by a rod edge.
//!
//! A frame is a right-handed basis `{tangent, d1, d2}` with
//! `tangent = d1 × d2`. The same type stores reference frames; the
//! material frame is obtained by rotating `(d1, d2)` about the tangent.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tress_types::constants::SEED_AXIS_EPSILON;

use crate::transport::minimal_rotation;

/// Orthonormal frame adapted to an edge tangent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Unit edge tangent.
    pub tangent: DVec3,
    /// First director.
    pub d1: DVec3,
    /// Second director.
    pub d2: DVec3,
}

impl Frame {
    pub const fn new(tangent: DVec3, d1: DVec3, d2: DVec3) -> Self {
        Self { tangent, d1, d2 }
    }

    /// Builds a frame around `tangent` seeded from a world axis.
    ///
    /// World X seeds `d1` unless it is parallel to the tangent, in which
    /// case world Y is used.
    pub fn from_tangent(tangent: DVec3) -> Self {
        let seed = if DVec3::X.cross(tangent).length() < SEED_AXIS_EPSILON {
            DVec3::Y
        } else {
            DVec3::X
        };
        let d2 = tangent.cross(seed).normalize();
        let d1 = d2.cross(tangent).normalize();
        Self::new(tangent, d1, d2)
    }

    /// Re-orthonormalizes the directors against a (new) unit tangent.
    ///
    /// `d2` is projected onto the plane orthogonal to the tangent, then
    /// `d1 = d2 × tangent`. If `d2` collapses onto the tangent the frame
    /// is rebuilt from the world seed.
    pub fn reorthonormalize(self, tangent: DVec3) -> Self {
        let projected = self.d2 - tangent * self.d2.dot(tangent);
        match projected.try_normalize() {
            Some(d2) => {
                let d1 = d2.cross(tangent).normalize();
                Self::new(tangent, d1, d2)
            }
            None => Self::from_tangent(tangent),
        }
    }

    /// Parallel transports the frame onto `new_tangent`.
    pub fn transported(self, new_tangent: DVec3) -> Self {
        let q = minimal_rotation(self.tangent, new_tangent);
        Self::new(new_tangent, q * self.d1, q * self.d2).reorthonormalize(new_tangent)
    }

    /// Rotates the directors by `theta` about the tangent.
    ///
    /// Returns `(m1, m2)` with `m1 = cosθ·d1 + sinθ·d2` and
    /// `m2 = −sinθ·d1 + cosθ·d2`.
    #[inline]
    pub fn rotated(&self, theta: f64) -> (DVec3, DVec3) {
        let (s, c) = theta.sin_cos();
        (self.d1 * c + self.d2 * s, self.d2 * c - self.d1 * s)
    }

    /// Largest deviation from orthonormality over all norms and dot products.
    pub fn orthonormality_error(&self) -> f64 {
        [
            (self.tangent.length() - 1.0).abs(),
            (self.d1.length() - 1.0).abs(),
            (self.d2.length() - 1.0).abs(),
            self.tangent.dot(self.d1).abs(),
            self.tangent.dot(self.d2).abs(),
            self.d1.dot(self.d2).abs(),
            (self.d1.cross(self.d2) - self.tangent).length(),
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }

    /// True when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.tangent.is_finite() && self.d1.is_finite() && self.d2.is_finite()
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(DVec3::Z, DVec3::X, DVec3::Y)
    }
}
