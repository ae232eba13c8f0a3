//! Elastic forces: the negative energy gradient.
//!
//! Every term is assembled per stencil. Stretching touches the two
//! vertices of an edge. Bending and twisting at interior vertex `i` touch
//! vertices `i − 1, i, i + 1` and the twist angles of edges `i − 1, i`.
//!
//! ## Curvature derivatives
//!
//! With `e`, `f` the edges before and after vertex `i`, `χ = 1 + t_e·t_f`,
//! `t̃ = (t_e + t_f)/χ` and `m̃1`, `m̃2` the sums of the adjacent material
//! directors divided by `χ`:
//!
//! ```text
//! ∂κ1/∂e = (−κ1·t̃ + t_f × m̃2) / |e|     ∂κ1/∂f = (−κ1·t̃ − t_e × m̃2) / |f|
//! ∂κ2/∂e = (−κ2·t̃ − t_f × m̃1) / |e|     ∂κ2/∂f = (−κ2·t̃ + t_e × m̃1) / |f|
//! ∂κ1/∂θ_j = −½ kb·m1_j                  ∂κ2/∂θ_j = −½ kb·m2_j
//! ```
//!
//! ## Twist derivatives
//!
//! ```text
//! ∂m/∂x_{i−1} = −kb / (2|e|)   ∂m/∂x_{i+1} = kb / (2|f|)   ∂m/∂x_i = −(sum)
//! ∂m/∂θ_{i−1} = −1             ∂m/∂θ_i = +1
//! ```

use tress_math::{DVec2, DVec3};
use tress_strand::{RestState, Stiffness, Strand};

use crate::energy::is_regular_vertex;

/// Forces on vertices and moments on edge twist angles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RodForces {
    /// Force per vertex.
    pub vertex: Vec<DVec3>,
    /// Generalized force `−∂E/∂θ` per edge.
    pub twist: Vec<f64>,
}

impl RodForces {
    /// Zeroed buffers for a strand of `vertex_count` vertices.
    pub fn zeros(vertex_count: usize) -> Self {
        Self {
            vertex: vec![DVec3::ZERO; vertex_count],
            twist: vec![0.0; vertex_count.saturating_sub(1)],
        }
    }

    /// Resets all entries to zero.
    pub fn clear(&mut self) {
        self.vertex.iter_mut().for_each(|f| *f = DVec3::ZERO);
        self.twist.iter_mut().for_each(|m| *m = 0.0);
    }

    /// True when no entry is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.vertex.iter().all(|f| f.is_finite()) && self.twist.iter().all(|m| m.is_finite())
    }

    /// Largest vertex force magnitude.
    pub fn max_force(&self) -> f64 {
        self.vertex.iter().map(|f| f.length()).fold(0.0, f64::max)
    }
}

/// Local derivatives of the material curvature at one vertex.
struct CurvatureJacobian {
    /// `∂κ1/∂e, ∂κ2/∂e` for the edge before the vertex.
    de: [DVec3; 2],
    /// `∂κ1/∂f, ∂κ2/∂f` for the edge after the vertex.
    df: [DVec3; 2],
    /// `∂κ/∂θ` for the edge before the vertex.
    dtheta_e: DVec2,
    /// `∂κ/∂θ` for the edge after the vertex.
    dtheta_f: DVec2,
}

impl CurvatureJacobian {
    fn at(strand: &Strand, i: usize) -> Self {
        let g = strand.geometry();
        let m = strand.material_frames();
        let (te, tf) = (g.tangents[i - 1], g.tangents[i]);
        let (len_e, len_f) = (g.lengths[i - 1], g.lengths[i]);
        let kappa = strand.curvature(i);
        let kb = strand.curvature_binormal(i);

        let chi = 1.0 + te.dot(tf);
        let t_tilde = (te + tf) / chi;
        let m1_tilde = (m.m1[i - 1] + m.m1[i]) / chi;
        let m2_tilde = (m.m2[i - 1] + m.m2[i]) / chi;

        Self {
            de: [
                (-kappa.x * t_tilde + tf.cross(m2_tilde)) / len_e,
                (-kappa.y * t_tilde - tf.cross(m1_tilde)) / len_e,
            ],
            df: [
                (-kappa.x * t_tilde - te.cross(m2_tilde)) / len_f,
                (-kappa.y * t_tilde + te.cross(m1_tilde)) / len_f,
            ],
            dtheta_e: DVec2::new(-0.5 * kb.dot(m.m1[i - 1]), -0.5 * kb.dot(m.m2[i - 1])),
            dtheta_f: DVec2::new(-0.5 * kb.dot(m.m1[i]), -0.5 * kb.dot(m.m2[i])),
        }
    }
}

/// Adds stretching forces `−k_S(|e| − ℓ̄)·t` to both ends of every edge.
pub fn add_stretching_forces(
    strand: &Strand,
    rest: &RestState,
    stiffness: &Stiffness,
    out: &mut RodForces,
) {
    let g = strand.geometry();
    for j in 0..g.edge_count() {
        if g.is_degenerate(j) {
            continue;
        }
        let f = g.tangents[j] * (stiffness.stretching[j] * (g.lengths[j] - rest.lengths[j]));
        out.vertex[j] += f;
        out.vertex[j + 1] -= f;
    }
}

/// Adds bending forces and moments.
pub fn add_bending_forces(
    strand: &Strand,
    rest: &RestState,
    stiffness: &Stiffness,
    out: &mut RodForces,
) {
    for i in 1..strand.vertex_count().saturating_sub(1) {
        if !is_regular_vertex(strand, i) {
            continue;
        }
        // ∂E/∂κ = B·Δκ
        let dk = strand.curvature(i) - rest.curvatures[i];
        let dedk = stiffness.bending[i] * dk;
        let jac = CurvatureJacobian::at(strand, i);

        let grad_e = jac.de[0] * dedk.x + jac.de[1] * dedk.y;
        let grad_f = jac.df[0] * dedk.x + jac.df[1] * dedk.y;
        out.vertex[i - 1] += grad_e;
        out.vertex[i] += grad_f - grad_e;
        out.vertex[i + 1] -= grad_f;

        out.twist[i - 1] -= jac.dtheta_e.dot(dedk);
        out.twist[i] -= jac.dtheta_f.dot(dedk);
    }
}

/// Adds twisting forces and moments.
pub fn add_twisting_forces(
    strand: &Strand,
    rest: &RestState,
    stiffness: &Stiffness,
    out: &mut RodForces,
) {
    let g = strand.geometry();
    for i in 1..strand.vertex_count().saturating_sub(1) {
        let voronoi = rest.voronoi_lengths[i];
        if !is_regular_vertex(strand, i) || voronoi <= 0.0 {
            continue;
        }
        // ∂E/∂m
        let dedm = stiffness.twisting[i] * (strand.twist(i) - rest.twists[i]) / voronoi;
        let kb = strand.curvature_binormal(i);
        let grad_prev = kb * (-0.5 / g.lengths[i - 1]) * dedm;
        let grad_next = kb * (0.5 / g.lengths[i]) * dedm;

        out.vertex[i - 1] -= grad_prev;
        out.vertex[i] += grad_prev + grad_next;
        out.vertex[i + 1] -= grad_next;

        out.twist[i - 1] += dedm;
        out.twist[i] -= dedm;
    }
}

/// Total elastic forces of the current configuration.
pub fn elastic_forces(strand: &Strand, rest: &RestState, stiffness: &Stiffness) -> RodForces {
    let mut out = RodForces::zeros(strand.vertex_count());
    accumulate_elastic_forces(strand, rest, stiffness, &mut out);
    out
}

/// Clears `out` and fills it with the total elastic forces.
pub fn accumulate_elastic_forces(
    strand: &Strand,
    rest: &RestState,
    stiffness: &Stiffness,
    out: &mut RodForces,
) {
    out.clear();
    add_stretching_forces(strand, rest, stiffness, out);
    add_bending_forces(strand, rest, stiffness, out);
    add_twisting_forces(strand, rest, stiffness, out);
}

/// Diagonal of the twist-angle Hessian (Gauss–Newton for bending).
///
/// Entry `j` is `Σ β/ℓ_vor` over the two vertices of edge `j` plus
/// `Σ B_kk (∂κ_k/∂θ_j)²` from the same vertices.
pub fn twist_hessian_diagonal(strand: &Strand, rest: &RestState, stiffness: &Stiffness) -> Vec<f64> {
    let mut diag = vec![0.0; strand.edge_count()];
    for i in 1..strand.vertex_count().saturating_sub(1) {
        if !is_regular_vertex(strand, i) {
            continue;
        }
        let voronoi = rest.voronoi_lengths[i];
        let twist = if voronoi > 0.0 {
            stiffness.twisting[i] / voronoi
        } else {
            0.0
        };
        let b = stiffness.bending[i];
        let jac = CurvatureJacobian::at(strand, i);
        let bend = |d: DVec2| b.x_axis.x * d.x * d.x + b.y_axis.y * d.y * d.y;

        diag[i - 1] += twist + bend(jac.dtheta_e);
        diag[i] += twist + bend(jac.dtheta_f);
    }
    diag
}
