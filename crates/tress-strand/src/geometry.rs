//! Edge vectors, lengths and unit tangents derived from vertex positions.

use tress_math::DVec3;
use tress_types::constants::DEGENERATE_EDGE_LENGTH;

/// Cached per-edge geometry.
///
/// Recomputed from positions after every integration step. Edge `i` is
/// `positions[i + 1] − positions[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeGeometry {
    /// Edge vectors.
    pub edges: Vec<DVec3>,
    /// Edge lengths `‖edge‖`.
    pub lengths: Vec<f64>,
    /// Unit tangents `edge / ‖edge‖`.
    pub tangents: Vec<DVec3>,
}

impl EdgeGeometry {
    /// Builds geometry for a fresh polyline.
    ///
    /// A degenerate edge with no previous tangent inherits the tangent of
    /// the edge before it, or world +Z for the first edge.
    pub fn from_positions(positions: &[DVec3]) -> Self {
        let edge_count = positions.len().saturating_sub(1);
        let mut geometry = Self {
            edges: vec![DVec3::ZERO; edge_count],
            lengths: vec![0.0; edge_count],
            tangents: vec![DVec3::Z; edge_count],
        };
        for i in 0..edge_count {
            if i > 0 {
                geometry.tangents[i] = geometry.tangents[i - 1];
            }
            geometry.update_edge(i, positions);
        }
        geometry
    }

    /// Recomputes every edge from new positions.
    ///
    /// Degenerate edges keep their previous tangent (no division by zero).
    pub fn update(&mut self, positions: &[DVec3]) {
        for i in 0..self.edges.len() {
            self.update_edge(i, positions);
        }
    }

    fn update_edge(&mut self, i: usize, positions: &[DVec3]) {
        let edge = positions[i + 1] - positions[i];
        let length = edge.length();
        self.edges[i] = edge;
        self.lengths[i] = length;
        if length > DEGENERATE_EDGE_LENGTH {
            self.tangents[i] = edge / length;
        }
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True when edge `i` is too short to define a direction.
    #[inline]
    pub fn is_degenerate(&self, i: usize) -> bool {
        self.lengths[i] <= DEGENERATE_EDGE_LENGTH
    }

    /// Sum of all edge lengths.
    pub fn total_length(&self) -> f64 {
        self.lengths.iter().sum()
    }
}
