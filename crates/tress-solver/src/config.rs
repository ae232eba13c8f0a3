//! Solver configuration.
//!
//! Parameters that control time stepping: timestep, substep count,
//! gravity, damping and the integration scheme for positions and twist.

use serde::{Deserialize, Serialize};
use tress_types::constants::{DEFAULT_DAMPING, DEFAULT_DT, DEFAULT_SUBSTEPS, GRAVITY};
use tress_types::{TressError, TressResult};

use crate::integrator::{ExplicitEuler, Integrator, SymplecticEuler};

/// Velocity/position update rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    /// Velocity first, then position with the new velocity.
    #[default]
    SymplecticEuler,
    /// Position with the old velocity, then velocity.
    ExplicitEuler,
}

static SYMPLECTIC_EULER: SymplecticEuler = SymplecticEuler;
static EXPLICIT_EULER: ExplicitEuler = ExplicitEuler;

impl IntegratorKind {
    /// The integrator implementing this scheme.
    pub fn integrator(self) -> &'static dyn Integrator {
        match self {
            Self::SymplecticEuler => &SYMPLECTIC_EULER,
            Self::ExplicitEuler => &EXPLICIT_EULER,
        }
    }
}

/// How the per-edge twist angles θ evolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwistMode {
    /// θ is held at its construction value.
    Frozen,
    /// θ relaxes toward twist equilibrium after every substep.
    #[default]
    QuasiStatic,
    /// θ is integrated with the edge's twist inertia.
    Dynamic,
}

/// Configuration for the rod solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Gravity vector [gx, gy, gz] in m/s².
    pub gravity: [f64; 3],

    /// Timestep of one simulation tick (seconds).
    pub dt: f64,

    /// Substeps per tick. Each substep advances `dt / substeps`.
    pub substeps: u32,

    /// Fraction of velocity removed per tick (0.0 = none, must be < 1.0),
    /// spread evenly over the substeps.
    pub damping: f64,

    /// Integration scheme for positions (and θ in dynamic mode).
    pub integrator: IntegratorKind,

    /// Twist evolution.
    pub twist_mode: TwistMode,

    /// Relaxation sweeps per substep in quasi-static twist mode.
    pub twist_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -GRAVITY, 0.0],
            dt: DEFAULT_DT,
            substeps: DEFAULT_SUBSTEPS,
            damping: DEFAULT_DAMPING,
            integrator: IntegratorKind::default(),
            twist_mode: TwistMode::default(),
            twist_iterations: 4,
        }
    }
}

impl SolverConfig {
    /// Creates a config for debugging (few substeps, no twist dynamics).
    pub fn debug() -> Self {
        Self {
            substeps: 20,
            twist_mode: TwistMode::Frozen,
            ..Default::default()
        }
    }

    /// Creates a high-quality config (many substeps, more twist sweeps).
    pub fn high_quality() -> Self {
        Self {
            substeps: 1000,
            twist_iterations: 10,
            ..Default::default()
        }
    }

    /// Length of one substep.
    #[inline]
    pub fn substep_dt(&self) -> f64 {
        self.dt / self.substeps.max(1) as f64
    }

    /// Checks ranges of every parameter.
    pub fn validate(&self) -> TressResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(TressError::InvalidConfig(format!(
                "dt must be positive and finite, got {}",
                self.dt
            )));
        }
        if self.substeps == 0 {
            return Err(TressError::InvalidConfig("substeps must be at least 1".into()));
        }
        if !(0.0..1.0).contains(&self.damping) {
            return Err(TressError::InvalidConfig(format!(
                "damping must be in [0, 1), got {}",
                self.damping
            )));
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            return Err(TressError::InvalidConfig("gravity must be finite".into()));
        }
        Ok(())
    }
}
