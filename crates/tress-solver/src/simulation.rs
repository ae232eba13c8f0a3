//! Multi-strand simulation.
//!
//! Rods are independent: each tick steps every rod in parallel on the
//! rayon pool and joins before returning. The configuration is shared
//! read-only.

use std::time::Instant;

use rayon::prelude::*;
use tress_material::RodMaterial;
use tress_math::DVec3;
use tress_types::{StrandId, TressError, TressResult};

use crate::boundary::Pinning;
use crate::config::SolverConfig;
use crate::energy::EnergyBreakdown;
use crate::report::TickReport;
use crate::rod::Rod;

/// A set of rods advanced together.
#[derive(Debug, Clone)]
pub struct HairSimulation {
    config: SolverConfig,
    rods: Vec<Rod>,
    timestep: u64,
    sim_time: f64,
}

impl HairSimulation {
    /// Creates an empty simulation.
    pub fn new(config: SolverConfig) -> TressResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rods: Vec::new(),
            timestep: 0,
            sim_time: 0.0,
        })
    }

    /// Builds one rod per polyline, numbered in input order.
    pub fn from_strands(
        strands: Vec<Vec<DVec3>>,
        material: &RodMaterial,
        pinning: &Pinning,
        config: SolverConfig,
    ) -> TressResult<Self> {
        let mut sim = Self::new(config)?;
        for (i, points) in strands.into_iter().enumerate() {
            sim.add_rod(Rod::new(StrandId(i as u32), points, material, pinning)?);
        }
        tracing::info!(
            strands = sim.rod_count(),
            vertices = sim.vertex_count(),
            "Hair simulation initialized"
        );
        Ok(sim)
    }

    /// Appends a rod.
    pub fn add_rod(&mut self, rod: Rod) {
        self.rods.push(rod);
    }

    // ─── Accessors ───────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    #[inline]
    pub fn rods(&self) -> &[Rod] {
        &self.rods
    }

    #[inline]
    pub fn rods_mut(&mut self) -> &mut [Rod] {
        &mut self.rods
    }

    /// Rod with the given id.
    pub fn rod(&self, id: StrandId) -> Option<&Rod> {
        self.rods.iter().find(|r| r.id() == id)
    }

    #[inline]
    pub fn rod_count(&self) -> usize {
        self.rods.len()
    }

    /// Total vertex count over all rods.
    pub fn vertex_count(&self) -> usize {
        self.rods.iter().map(|r| r.strand().vertex_count()).sum()
    }

    /// Number of completed ticks.
    #[inline]
    pub fn timestep(&self) -> u64 {
        self.timestep
    }

    /// Simulated time in seconds.
    #[inline]
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Rewinds or advances the clock, e.g. when restoring saved state.
    pub fn set_clock(&mut self, timestep: u64, sim_time: f64) {
        self.timestep = timestep;
        self.sim_time = sim_time;
    }

    /// Current vertex positions of every rod.
    pub fn positions(&self) -> Vec<Vec<DVec3>> {
        self.rods.iter().map(|r| r.strand().positions.clone()).collect()
    }

    /// Energy summed over every rod.
    pub fn energy(&self) -> EnergyBreakdown {
        self.rods
            .par_iter()
            .map(Rod::energy)
            .reduce(EnergyBreakdown::default, |a, b| a + b)
    }

    // ─── Stepping ────────────────────────────────────────────

    /// Advances every rod by one tick.
    pub fn step(&mut self) -> TickReport {
        let start = Instant::now();
        let config = &self.config;
        let strands: Vec<_> = self.rods.par_iter_mut().map(|rod| rod.step(config)).collect();

        self.timestep += 1;
        self.sim_time += self.config.dt;
        let energy = self.energy();
        let report = TickReport {
            timestep: self.timestep,
            sim_time: self.sim_time,
            strands,
            energy,
            wall_time: start.elapsed().as_secs_f64(),
        };

        let unstable = report.unstable_strands().len();
        if unstable > 0 {
            tracing::warn!(timestep = self.timestep, unstable, "Unstable strands this tick");
        }
        tracing::debug!(
            timestep = self.timestep,
            elastic = energy.elastic(),
            kinetic = energy.kinetic,
            "Tick complete"
        );
        report
    }

    /// Restores one rod to its construction state.
    pub fn reset_strand(&mut self, id: StrandId) -> TressResult<()> {
        let rod = self
            .rods
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| TressError::InvalidConfig(format!("No strand with id {id}")))?;
        rod.reset();
        Ok(())
    }

    /// Restores every rod and rewinds the clock.
    pub fn reset(&mut self) {
        self.rods.iter_mut().for_each(Rod::reset);
        self.timestep = 0;
        self.sim_time = 0.0;
    }
}
