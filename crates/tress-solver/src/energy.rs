//! Elastic energies of a rod.
//!
//! ```text
//! E_s = Σ_edges    ½ k_S (|e| − ℓ̄)²
//! E_b = Σ_interior ½ (κ − κ̄)ᵀ B (κ − κ̄)
//! E_t = Σ_interior ½ β (m − m̄)² / ℓ_vor
//! ```
//!
//! Vertices touching a degenerate edge, and fully folded vertices,
//! contribute zero bending and twisting energy.

use serde::{Deserialize, Serialize};
use tress_strand::{RestState, Stiffness, Strand};
use tress_types::constants::PARALLEL_EPSILON;

/// Energy split by term.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnergyBreakdown {
    pub stretching: f64,
    pub bending: f64,
    pub twisting: f64,
    /// Translational plus rotational kinetic energy.
    pub kinetic: f64,
}

impl EnergyBreakdown {
    /// Sum of the three elastic terms.
    #[inline]
    pub fn elastic(&self) -> f64 {
        self.stretching + self.bending + self.twisting
    }

    /// Elastic plus kinetic energy.
    #[inline]
    pub fn total(&self) -> f64 {
        self.elastic() + self.kinetic
    }
}

impl std::ops::Add for EnergyBreakdown {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            stretching: self.stretching + rhs.stretching,
            bending: self.bending + rhs.bending,
            twisting: self.twisting + rhs.twisting,
            kinetic: self.kinetic + rhs.kinetic,
        }
    }
}

/// True when vertex `i` has well-defined curvature and twist derivatives.
pub(crate) fn is_regular_vertex(strand: &Strand, i: usize) -> bool {
    if strand.is_endpoint(i) {
        return false;
    }
    let g = strand.geometry();
    if g.is_degenerate(i - 1) || g.is_degenerate(i) {
        return false;
    }
    1.0 + g.tangents[i - 1].dot(g.tangents[i]) >= PARALLEL_EPSILON
}

/// Stretching energy `Σ ½ k_S (|e| − ℓ̄)²`.
pub fn stretching_energy(strand: &Strand, rest: &RestState, stiffness: &Stiffness) -> f64 {
    strand
        .geometry()
        .lengths
        .iter()
        .zip(&rest.lengths)
        .zip(&stiffness.stretching)
        .map(|((&len, &rest_len), &k)| 0.5 * k * (len - rest_len).powi(2))
        .sum()
}

/// Bending energy `Σ ½ Δκᵀ B Δκ` over interior vertices.
pub fn bending_energy(strand: &Strand, rest: &RestState, stiffness: &Stiffness) -> f64 {
    (1..strand.vertex_count().saturating_sub(1))
        .filter(|&i| is_regular_vertex(strand, i))
        .map(|i| {
            let dk = strand.curvature(i) - rest.curvatures[i];
            0.5 * dk.dot(stiffness.bending[i] * dk)
        })
        .sum()
}

/// Twisting energy `Σ ½ β (m − m̄)² / ℓ_vor` over interior vertices.
pub fn twisting_energy(strand: &Strand, rest: &RestState, stiffness: &Stiffness) -> f64 {
    (1..strand.vertex_count().saturating_sub(1))
        .filter(|&i| is_regular_vertex(strand, i) && rest.voronoi_lengths[i] > 0.0)
        .map(|i| {
            let dm = strand.twist(i) - rest.twists[i];
            0.5 * stiffness.twisting[i] * dm * dm / rest.voronoi_lengths[i]
        })
        .sum()
}

/// All elastic terms; `kinetic` is left at zero.
pub fn elastic_energy(strand: &Strand, rest: &RestState, stiffness: &Stiffness) -> EnergyBreakdown {
    EnergyBreakdown {
        stretching: stretching_energy(strand, rest, stiffness),
        bending: bending_energy(strand, rest, stiffness),
        twisting: twisting_energy(strand, rest, stiffness),
        kinetic: 0.0,
    }
}
