//! The strand: owned vertex state plus every derived per-edge array.
//!
//! Dynamic state (`positions`, `velocities`, `thetas`, `theta_rates`) is
//! public and written by the integrator. Derived arrays are read-only and
//! refreshed with [`Strand::update_kinematics`] once the dynamic state
//! has changed.

use tress_math::{DVec2, DVec3, Frame};
use tress_types::constants::FRAME_TOLERANCE;
use tress_types::{TressError, TressResult};

use crate::curvature::{curvature_binormal, discrete_twist, material_curvature};
use crate::frames::{initialize_reference_frames, transport_in_time, MaterialFrames};
use crate::geometry::EdgeGeometry;

/// A discrete elastic rod.
///
/// Vertex order is arc-length order and never changes; a strand always
/// has at least two vertices.
#[derive(Debug, Clone)]
pub struct Strand {
    /// Vertex positions.
    pub positions: Vec<DVec3>,
    /// Vertex velocities.
    pub velocities: Vec<DVec3>,
    /// Twist angle θ per edge (material frame relative to reference frame).
    pub thetas: Vec<f64>,
    /// Angular velocity dθ/dt per edge.
    pub theta_rates: Vec<f64>,

    geometry: EdgeGeometry,
    reference: Vec<Frame>,
    material: MaterialFrames,
}

impl Strand {
    /// Creates a strand at rest from an ordered polyline.
    ///
    /// Velocities and twist angles start at zero. Reference frames are
    /// built by parallel transport along the rod.
    pub fn new(points: Vec<DVec3>) -> TressResult<Self> {
        if points.len() < 2 {
            return Err(TressError::InvalidStrand(format!(
                "A strand needs at least 2 vertices, got {}",
                points.len()
            )));
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(TressError::InvalidStrand(format!(
                "Vertex {i} has a non-finite position"
            )));
        }

        let n = points.len();
        let geometry = EdgeGeometry::from_positions(&points);
        let reference = initialize_reference_frames(&geometry.tangents);
        let thetas = vec![0.0; n - 1];
        let material = MaterialFrames::compute(&reference, &thetas);

        Ok(Self {
            positions: points,
            velocities: vec![DVec3::ZERO; n],
            thetas,
            theta_rates: vec![0.0; n - 1],
            geometry,
            reference,
            material,
        })
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of edges (`vertex_count − 1`).
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.positions.len() - 1
    }

    /// Cached edge geometry.
    #[inline]
    pub fn geometry(&self) -> &EdgeGeometry {
        &self.geometry
    }

    /// Reference frame of every edge.
    #[inline]
    pub fn reference_frames(&self) -> &[Frame] {
        &self.reference
    }

    /// Material directors of every edge.
    #[inline]
    pub fn material_frames(&self) -> &MaterialFrames {
        &self.material
    }

    /// Refreshes derived state after positions (and possibly θ) changed.
    ///
    /// Re-derives edges and tangents, transports each reference frame in
    /// time onto its new tangent, then recomputes the material frame.
    pub fn update_kinematics(&mut self) {
        self.geometry.update(&self.positions);
        transport_in_time(&mut self.reference, &self.geometry.tangents);
        self.material.update(&self.reference, &self.thetas);
    }

    /// Installs stored reference frames after the dynamic state was
    /// overwritten.
    ///
    /// Edge geometry is re-derived from the current positions without
    /// transporting the old frames. Degenerate edges take their tangent
    /// from the installed frame.
    pub fn set_reference_frames(&mut self, frames: Vec<Frame>) -> TressResult<()> {
        if frames.len() != self.edge_count() {
            return Err(TressError::InvalidStrand(format!(
                "Expected {} reference frames, got {}",
                self.edge_count(),
                frames.len()
            )));
        }
        if let Some(i) = frames
            .iter()
            .position(|f| !f.is_finite() || f.orthonormality_error() > FRAME_TOLERANCE)
        {
            return Err(TressError::InvalidStrand(format!(
                "Reference frame {i} is not orthonormal"
            )));
        }
        self.geometry.update(&self.positions);
        for (i, frame) in frames.iter().enumerate() {
            if self.geometry.is_degenerate(i) {
                self.geometry.tangents[i] = frame.tangent;
            }
        }
        self.reference = frames;
        self.material.update(&self.reference, &self.thetas);
        Ok(())
    }

    /// Recomputes only the material frame (positions unchanged).
    pub fn update_material_frames(&mut self) {
        self.material.update(&self.reference, &self.thetas);
    }

    /// True when vertex `i` is an end vertex.
    #[inline]
    pub fn is_endpoint(&self, i: usize) -> bool {
        i == 0 || i + 1 == self.vertex_count()
    }

    /// Curvature binormal at vertex `i` (zero at the endpoints).
    pub fn curvature_binormal(&self, i: usize) -> DVec3 {
        if self.is_endpoint(i) {
            return DVec3::ZERO;
        }
        let t = &self.geometry.tangents;
        curvature_binormal(t[i - 1], t[i])
    }

    /// Material curvature κ at vertex `i` (zero at the endpoints).
    pub fn curvature(&self, i: usize) -> DVec2 {
        if self.is_endpoint(i) {
            return DVec2::ZERO;
        }
        let m = &self.material;
        material_curvature(
            self.curvature_binormal(i),
            m.m1[i - 1],
            m.m2[i - 1],
            m.m1[i],
            m.m2[i],
        )
    }

    /// Discrete twist at vertex `i` (zero at the endpoints).
    pub fn twist(&self, i: usize) -> f64 {
        if self.is_endpoint(i) {
            return 0.0;
        }
        let t = &self.geometry.tangents;
        discrete_twist(t[i - 1], t[i], self.material.m1[i - 1], self.material.m1[i])
    }

    /// Material curvature of every vertex.
    pub fn curvatures(&self) -> Vec<DVec2> {
        (0..self.vertex_count()).map(|i| self.curvature(i)).collect()
    }

    /// Discrete twist of every vertex.
    pub fn twists(&self) -> Vec<f64> {
        (0..self.vertex_count()).map(|i| self.twist(i)).collect()
    }

    /// Largest orthonormality defect over all reference and material frames.
    pub fn max_frame_error(&self) -> f64 {
        let reference = self.reference.iter().map(Frame::orthonormality_error);
        let material = self
            .reference
            .iter()
            .enumerate()
            .map(|(i, f)| self.material.frame(i, f.tangent).orthonormality_error());
        reference.chain(material).fold(0.0, f64::max)
    }

    /// True when every position, velocity, angle and frame is finite.
    pub fn is_finite(&self) -> bool {
        self.positions.iter().all(|p| p.is_finite())
            && self.velocities.iter().all(|v| v.is_finite())
            && self.thetas.iter().all(|t| t.is_finite())
            && self.theta_rates.iter().all(|w| w.is_finite())
            && self.reference.iter().all(Frame::is_finite)
    }

    /// Total arc length of the current configuration.
    pub fn length(&self) -> f64 {
        self.geometry.total_length()
    }
}
