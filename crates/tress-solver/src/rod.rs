//! A simulated rod: strand state plus everything needed to step it.
//!
//! One step runs `substeps` iterations of:
//!
//! 1. elastic forces from the current configuration
//! 2. velocity/position update of free vertices (gravity, damping)
//!
//! Damping rates are per tick; each substep applies the matching root so
//! the decay over one tick does not depend on the substep count.
//! 3. twist angle update according to the [`TwistMode`]
//! 4. pinned vertices reset to their targets
//! 5. geometry, time transport of reference frames, material frames
//!
//! A non-finite force or frame aborts the step and restores the state
//! from before it; the report is marked unstable.

use std::f64::consts::PI;

use tress_material::{CrossSection, RodMaterial};
use tress_math::DVec3;
use tress_strand::{RestState, Stiffness, Strand};
use tress_types::constants::FRAME_TOLERANCE;
use tress_types::{StrandId, TressError, TressResult};

use crate::boundary::Pinning;
use crate::config::{SolverConfig, TwistMode};
use crate::energy::{elastic_energy, EnergyBreakdown};
use crate::forces::{
    accumulate_elastic_forces, add_bending_forces, add_twisting_forces, elastic_forces,
    twist_hessian_diagonal, RodForces,
};
use crate::integrator::Integrator;
use crate::report::StepReport;

/// Under-relaxation of the quasi-static twist sweep.
const TWIST_RELAXATION: f64 = 0.5;

/// Velocity factor per substep for the given per-tick damping rates.
pub fn substep_retention(config_damping: f64, material_damping: f64, substeps: u32) -> f64 {
    let per_tick = (1.0 - config_damping) * (1.0 - material_damping);
    per_tick.powf(1.0 / substeps.max(1) as f64)
}

/// A strand with its rest state, stiffness, masses and boundary conditions.
#[derive(Debug, Clone)]
pub struct Rod {
    id: StrandId,
    strand: Strand,
    initial: Strand,
    rest: RestState,
    stiffness: Stiffness,
    cross_section: CrossSection,

    // ─── Inertia ───
    masses: Vec<f64>,
    inv_masses: Vec<f64>,
    twist_inertia: Vec<f64>,

    // ─── Boundary conditions ───
    pinned: Vec<bool>,
    locked_edges: Vec<bool>,
    pin_targets: Vec<DVec3>,

    material_damping: f64,
    forces: RodForces,
    step_count: u64,
}

impl Rod {
    /// Builds a rod with the material's uniform cross-section.
    pub fn new(
        id: StrandId,
        points: Vec<DVec3>,
        material: &RodMaterial,
        pinning: &Pinning,
    ) -> TressResult<Self> {
        let edge_count = points.len().saturating_sub(1);
        Self::with_cross_section(
            id,
            points,
            material,
            material.cross_section(edge_count),
            pinning,
        )
    }

    /// Builds a rod with explicit per-edge radii.
    ///
    /// The material supplies moduli, density and damping; its own radii
    /// are ignored.
    pub fn with_cross_section(
        id: StrandId,
        points: Vec<DVec3>,
        material: &RodMaterial,
        cross_section: CrossSection,
        pinning: &Pinning,
    ) -> TressResult<Self> {
        material.validate()?;
        let strand = Strand::new(points)?;
        let n = strand.vertex_count();
        let stiffness = Stiffness::compute(
            &cross_section,
            material.youngs_modulus,
            material.shear_modulus,
            n,
        )?;
        let rest = RestState::compute(&strand);

        let pinned = pinning.mask(n)?;
        let locked_edges = pinned.windows(2).map(|w| w[0] && w[1]).collect();

        let mut masses = vec![0.0; n];
        let mut twist_inertia = vec![0.0; n - 1];
        for (j, &len) in rest.lengths.iter().enumerate() {
            let (a, b) = (cross_section.major[j], cross_section.minor[j]);
            let edge_mass = material.density * PI * a * b * len;
            masses[j] += 0.5 * edge_mass;
            masses[j + 1] += 0.5 * edge_mass;
            twist_inertia[j] = edge_mass * (a * a + b * b) / 4.0;
        }
        let inv_masses = masses
            .iter()
            .zip(&pinned)
            .map(|(&m, &p)| if p || m <= 0.0 { 0.0 } else { 1.0 / m })
            .collect();

        tracing::debug!(
            strand = id.0,
            vertices = n,
            length = rest.total_length(),
            "Rod initialized"
        );

        Ok(Self {
            id,
            pin_targets: strand.positions.clone(),
            initial: strand.clone(),
            strand,
            rest,
            stiffness,
            cross_section,
            masses,
            inv_masses,
            twist_inertia,
            pinned,
            locked_edges,
            material_damping: material.damping,
            forces: RodForces::zeros(n),
            step_count: 0,
        })
    }

    // ─── Accessors ───────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> StrandId {
        self.id
    }

    #[inline]
    pub fn strand(&self) -> &Strand {
        &self.strand
    }

    /// Mutable access to the dynamic state.
    ///
    /// After moving vertices, call [`Strand::update_kinematics`] so that
    /// frames follow.
    #[inline]
    pub fn strand_mut(&mut self) -> &mut Strand {
        &mut self.strand
    }

    #[inline]
    pub fn rest(&self) -> &RestState {
        &self.rest
    }

    #[inline]
    pub fn stiffness(&self) -> &Stiffness {
        &self.stiffness
    }

    #[inline]
    pub fn cross_section(&self) -> &CrossSection {
        &self.cross_section
    }

    /// Lumped vertex masses.
    #[inline]
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    /// Inverse vertex masses (zero for pinned vertices).
    #[inline]
    pub fn inv_masses(&self) -> &[f64] {
        &self.inv_masses
    }

    /// Twist moment of inertia per edge.
    #[inline]
    pub fn twist_inertia(&self) -> &[f64] {
        &self.twist_inertia
    }

    #[inline]
    pub fn pinned(&self) -> &[bool] {
        &self.pinned
    }

    /// Number of completed steps since construction or the last reset.
    #[inline]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Moves the target of pinned vertex `i` (e.g. a moving scalp).
    pub fn set_pin_target(&mut self, i: usize, target: DVec3) -> TressResult<()> {
        if !self.pinned.get(i).copied().unwrap_or(false) {
            return Err(TressError::InvalidConfig(format!(
                "Vertex {i} of strand {} is not pinned",
                self.id
            )));
        }
        self.pin_targets[i] = target;
        Ok(())
    }

    // ─── Evaluation ──────────────────────────────────────────

    /// Elastic and kinetic energy of the current state.
    pub fn energy(&self) -> EnergyBreakdown {
        let translational: f64 = self
            .strand
            .velocities
            .iter()
            .zip(&self.masses)
            .zip(&self.pinned)
            .filter(|(_, &p)| !p)
            .map(|((v, &m), _)| 0.5 * m * v.length_squared())
            .sum();
        let rotational: f64 = self
            .strand
            .theta_rates
            .iter()
            .zip(&self.twist_inertia)
            .map(|(&w, &i)| 0.5 * i * w * w)
            .sum();
        EnergyBreakdown {
            kinetic: translational + rotational,
            ..elastic_energy(&self.strand, &self.rest, &self.stiffness)
        }
    }

    /// Elastic forces of the current state.
    pub fn forces(&self) -> RodForces {
        elastic_forces(&self.strand, &self.rest, &self.stiffness)
    }

    // ─── Stepping ────────────────────────────────────────────

    /// Advances the rod by one tick of `config.dt`.
    pub fn step(&mut self, config: &SolverConfig) -> StepReport {
        let step = self.step_count;
        let backup = self.strand.clone();
        let substeps = config.substeps.max(1);
        let h = config.substep_dt();
        let gravity = DVec3::from_array(config.gravity);
        let damping = substep_retention(config.damping, self.material_damping, substeps);
        let integrator = config.integrator.integrator();
        let mut max_force = 0.0_f64;

        for substep in 0..substeps {
            accumulate_elastic_forces(&self.strand, &self.rest, &self.stiffness, &mut self.forces);
            if !self.forces.is_finite() {
                return self.reject(backup, step, substep, max_force);
            }
            max_force = max_force.max(self.forces.max_force());

            self.integrate_vertices(integrator, gravity, damping, h);
            if config.twist_mode == TwistMode::Dynamic {
                self.integrate_twist(integrator, damping, h);
            }
            self.apply_pins();
            self.strand.update_kinematics();

            if config.twist_mode == TwistMode::QuasiStatic {
                self.relax_twist(config.twist_iterations);
            }
            if !self.strand.is_finite() {
                return self.reject(backup, step, substep, max_force);
            }
        }

        self.step_count += 1;
        let max_frame_error = self.strand.max_frame_error();
        if max_frame_error > FRAME_TOLERANCE {
            tracing::warn!(strand = self.id.0, step, max_frame_error, "Frame drift above tolerance");
        }
        StepReport {
            strand: self.id,
            step,
            substeps,
            stable: true,
            max_force,
            max_frame_error,
        }
    }

    /// Restores the construction state (positions, velocities, twist, frames).
    pub fn reset(&mut self) {
        self.strand = self.initial.clone();
        self.pin_targets = self.initial.positions.clone();
        self.forces.clear();
        self.step_count = 0;
    }

    fn reject(&mut self, backup: Strand, step: u64, substep: u32, max_force: f64) -> StepReport {
        tracing::warn!(strand = self.id.0, step, substep, "Numerical instability, step rejected");
        self.strand = backup;
        StepReport {
            strand: self.id,
            step,
            substeps: substep,
            stable: false,
            max_force,
            max_frame_error: self.strand.max_frame_error(),
        }
    }

    fn integrate_vertices(&mut self, integrator: &dyn Integrator, gravity: DVec3, damping: f64, h: f64) {
        let s = &mut self.strand;
        for i in 0..s.positions.len() {
            if self.pinned[i] {
                continue;
            }
            let a = self.forces.vertex[i] * self.inv_masses[i] + gravity;
            integrator.advance(&mut s.positions[i], &mut s.velocities[i], a, h);
            s.velocities[i] *= damping;
        }
    }

    fn integrate_twist(&mut self, integrator: &dyn Integrator, damping: f64, h: f64) {
        let s = &mut self.strand;
        for j in 0..s.thetas.len() {
            let inertia = self.twist_inertia[j];
            if self.locked_edges[j] || inertia <= 0.0 {
                s.theta_rates[j] = 0.0;
                continue;
            }
            let alpha = self.forces.twist[j] / inertia;
            integrator.advance_angle(&mut s.thetas[j], &mut s.theta_rates[j], alpha, h);
            s.theta_rates[j] *= damping;
        }
    }

    fn apply_pins(&mut self) {
        for (i, _) in self.pinned.iter().enumerate().filter(|(_, &p)| p) {
            self.strand.positions[i] = self.pin_targets[i];
            self.strand.velocities[i] = DVec3::ZERO;
        }
    }

    /// Jacobi–Newton sweeps on θ toward zero twist moment.
    fn relax_twist(&mut self, iterations: u32) {
        for _ in 0..iterations {
            self.forces.clear();
            add_bending_forces(&self.strand, &self.rest, &self.stiffness, &mut self.forces);
            add_twisting_forces(&self.strand, &self.rest, &self.stiffness, &mut self.forces);
            let diag = twist_hessian_diagonal(&self.strand, &self.rest, &self.stiffness);

            for (j, &h) in diag.iter().enumerate() {
                if self.locked_edges[j] || h <= 0.0 {
                    continue;
                }
                self.strand.thetas[j] += TWIST_RELAXATION * self.forces.twist[j] / h;
            }
            self.strand.theta_rates.iter_mut().for_each(|w| *w = 0.0);
            self.strand.update_material_frames();
        }
    }
}
