//! Rest-state bundle, computed once from the initial configuration.

use serde::{Deserialize, Serialize};
use tress_math::DVec2;

use crate::strand::Strand;

/// Immutable rest configuration of a strand.
///
/// Edge arrays have `N − 1` entries; vertex arrays have `N` with zeros at
/// the two end vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestState {
    /// Rest length of every edge.
    pub lengths: Vec<f64>,
    /// Rest material curvature per vertex.
    pub curvatures: Vec<DVec2>,
    /// Rest twist per vertex (always zero at construction).
    pub twists: Vec<f64>,
    /// Voronoi length per vertex: mean of the adjacent rest edge lengths.
    pub voronoi_lengths: Vec<f64>,
}

impl RestState {
    /// Captures the strand's current configuration as its rest state.
    ///
    /// Must run after frame initialization, since curvature is measured
    /// in the material frame.
    pub fn compute(strand: &Strand) -> Self {
        let n = strand.vertex_count();
        let lengths = strand.geometry().lengths.clone();

        let mut voronoi_lengths = vec![0.0; n];
        for i in 1..n.saturating_sub(1) {
            voronoi_lengths[i] = 0.5 * (lengths[i - 1] + lengths[i]);
        }

        Self {
            lengths,
            curvatures: strand.curvatures(),
            twists: vec![0.0; n],
            voronoi_lengths,
        }
    }

    /// Number of vertices this rest state describes.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.voronoi_lengths.len()
    }

    /// Total rest length.
    pub fn total_length(&self) -> f64 {
        self.lengths.iter().sum()
    }
}
