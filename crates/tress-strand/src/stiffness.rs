//! Stiffness bundle derived from moduli and cross-section.
//!
//! Bending and twisting stiffness use radii averaged over the two edges
//! adjacent to a vertex: with `ā = (a[i−1] + a[i]) / 2`, `b̄` likewise
//! and `A = π·ā·b̄`,
//!
//! ```text
//! B_i = diag(E·A·ā²/4, E·A·b̄²/4)
//! β_i = G·A·(ā² + b̄²)/4
//! ```
//!
//! Stretching stiffness is per edge: `k_S = E·π·a·b`.

use serde::{Deserialize, Serialize};
use tress_material::CrossSection;
use tress_math::{DMat2, DVec2};
use tress_types::{TressError, TressResult};

/// Immutable elastic coefficients of a strand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stiffness {
    /// Stretching stiffness per edge.
    pub stretching: Vec<f64>,
    /// Bending stiffness matrix per vertex (zero at endpoints).
    pub bending: Vec<DMat2>,
    /// Twisting stiffness per vertex (zero at endpoints).
    pub twisting: Vec<f64>,
}

impl Stiffness {
    /// Derives stiffness for a strand of `vertex_count` vertices.
    pub fn compute(
        cross_section: &CrossSection,
        youngs_modulus: f64,
        shear_modulus: f64,
        vertex_count: usize,
    ) -> TressResult<Self> {
        cross_section.validate()?;
        let edge_count = vertex_count.saturating_sub(1);
        if cross_section.edge_count() != edge_count {
            return Err(TressError::InvalidStrand(format!(
                "Cross-section has {} edges, strand has {}",
                cross_section.edge_count(),
                edge_count
            )));
        }

        let stretching = (0..edge_count)
            .map(|i| youngs_modulus * cross_section.area(i))
            .collect();

        let mut bending = vec![DMat2::ZERO; vertex_count];
        let mut twisting = vec![0.0; vertex_count];
        for i in 1..edge_count {
            let (a, b) = cross_section.vertex_radii(i);
            let area = std::f64::consts::PI * a * b;
            bending[i] = DMat2::from_diagonal(DVec2::new(
                youngs_modulus * area * a * a / 4.0,
                youngs_modulus * area * b * b / 4.0,
            ));
            twisting[i] = shear_modulus * area * (a * a + b * b) / 4.0;
        }

        Ok(Self {
            stretching,
            bending,
            twisting,
        })
    }
}
