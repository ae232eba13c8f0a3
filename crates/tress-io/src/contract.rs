//! Simulation input/output contract types.
//!
//! These types define the I/O boundary of the Tress engine. They are
//! serializable so a run can be described by a TOML parameter file or a
//! JSON document carrying the strands themselves.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tress_material::CrossSection;
use tress_math::DVec3;
use tress_solver::{EnergyBreakdown, Pinning, SolverConfig};
use tress_types::{TressError, TressResult};

use crate::hair_file::HairFile;

/// Complete input for a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    /// One polyline per strand, root first.
    pub strands: Vec<Vec<DVec3>>,

    /// Simulation parameters.
    #[serde(default)]
    pub params: SimulationParams,

    /// Per-edge radii for every strand. When absent each strand gets the
    /// material's uniform cross-section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_sections: Option<Vec<CrossSection>>,
}

impl SimulationInput {
    /// Takes the strands of a HAIR file.
    pub fn from_hair_file(file: &HairFile, params: SimulationParams) -> TressResult<Self> {
        Ok(Self {
            strands: file.strands()?,
            params,
            cross_sections: None,
        })
    }

    pub fn from_json(text: &str) -> TressResult<Self> {
        serde_json::from_str(text).map_err(|e| TressError::Serialization(e.to_string()))
    }

    pub fn to_json(&self) -> TressResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TressError::Serialization(e.to_string()))
    }

    /// Total vertex count over all strands.
    pub fn vertex_count(&self) -> usize {
        self.strands.iter().map(Vec::len).sum()
    }
}

/// Physics and run parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Total simulated time in seconds.
    pub duration: f64,
    /// Material name looked up in the material database.
    pub material_name: String,
    /// Which vertices of every strand are held.
    pub pinning: Pinning,
    /// Resample every strand to this many vertices before simulating.
    pub resample: Option<usize>,
    /// Solver settings.
    pub solver: SolverConfig,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            duration: 1.0,
            material_name: "soft_fiber".to_string(),
            pinning: Pinning::Root,
            resample: None,
            solver: SolverConfig::default(),
        }
    }
}

impl SimulationParams {
    /// Number of ticks covering `duration`, at least one.
    pub fn timestep_count(&self) -> u64 {
        // Tolerance keeps 0.5 s at 1/60 s from rounding up to 31 ticks.
        let ticks = (self.duration / self.solver.dt - 1e-9).ceil();
        ticks.max(1.0) as u64
    }

    pub fn from_toml(text: &str) -> TressResult<Self> {
        toml::from_str(text).map_err(|e| TressError::Serialization(e.to_string()))
    }

    pub fn to_toml(&self) -> TressResult<String> {
        toml::to_string_pretty(self).map_err(|e| TressError::Serialization(e.to_string()))
    }

    pub fn from_json(text: &str) -> TressResult<Self> {
        serde_json::from_str(text).map_err(|e| TressError::Serialization(e.to_string()))
    }

    pub fn to_json(&self) -> TressResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TressError::Serialization(e.to_string()))
    }

    /// Reads parameters from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> TressResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&text),
            Some("json") => Self::from_json(&text),
            other => Err(TressError::InvalidConfig(format!(
                "Unsupported parameter file extension {other:?} (expected .toml or .json)"
            ))),
        }
    }
}

/// Output from a completed simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    /// Final strand positions.
    pub strands: Vec<Vec<DVec3>>,

    /// Run-wide metrics.
    pub metrics: SimulationMetrics,
}

/// Aggregate metrics from a simulation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Total wall-clock time (seconds).
    pub wall_time_seconds: f64,
    /// Number of ticks executed.
    pub timestep_count: u64,
    /// Simulated time reached (seconds).
    pub sim_time: f64,
    /// Energy at the final tick.
    pub final_energy: EnergyBreakdown,
    /// Strand steps rolled back because of non-finite state.
    pub unstable_steps: u32,
    /// Largest single-vertex force magnitude seen.
    pub max_force: f64,
}

impl SimulationMetrics {
    /// Folds one tick into the running totals.
    pub fn record(&mut self, tick: &tress_solver::TickReport) {
        self.timestep_count += 1;
        self.sim_time = tick.sim_time;
        self.final_energy = tick.energy;
        self.wall_time_seconds += tick.wall_time;
        for report in &tick.strands {
            if !report.stable {
                self.unstable_steps += 1;
            }
            self.max_force = self.max_force.max(report.max_force);
        }
    }
}
