//! Per-edge elliptical cross-sections.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tress_types::{TressError, TressResult};

/// Elliptical semi-axes for every edge of a strand.
///
/// `major[i]` and `minor[i]` belong to edge `i`, so both arrays have
/// one entry fewer than the strand has vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    /// Semi-axis a per edge.
    pub major: Vec<f64>,
    /// Semi-axis b per edge.
    pub minor: Vec<f64>,
}

impl CrossSection {
    /// Creates a cross-section from explicit per-edge radii.
    pub fn new(major: Vec<f64>, minor: Vec<f64>) -> TressResult<Self> {
        let section = Self { major, minor };
        section.validate()?;
        Ok(section)
    }

    /// Same radii on every edge.
    pub fn uniform(edge_count: usize, a: f64, b: f64) -> Self {
        Self {
            major: vec![a; edge_count],
            minor: vec![b; edge_count],
        }
    }

    /// Number of edges described.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.major.len()
    }

    /// Ellipse area of edge `i`.
    #[inline]
    pub fn area(&self, i: usize) -> f64 {
        PI * self.major[i] * self.minor[i]
    }

    /// Radii averaged over the two edges adjacent to interior vertex `i`.
    #[inline]
    pub fn vertex_radii(&self, i: usize) -> (f64, f64) {
        (
            0.5 * (self.major[i - 1] + self.major[i]),
            0.5 * (self.minor[i - 1] + self.minor[i]),
        )
    }

    /// Checks array lengths and radius values.
    pub fn validate(&self) -> TressResult<()> {
        if self.major.len() != self.minor.len() {
            return Err(TressError::InvalidStrand(format!(
                "Cross-section arrays differ in length ({} vs {})",
                self.major.len(),
                self.minor.len()
            )));
        }
        let bad = self
            .major
            .iter()
            .chain(self.minor.iter())
            .find(|r| !r.is_finite() || **r <= 0.0);
        if let Some(r) = bad {
            return Err(TressError::InvalidStrand(format!(
                "Cross-section radius must be positive and finite, got {r}"
            )));
        }
        Ok(())
    }
}
