//! Benchmark runner: executes scenarios and collects metrics.

use std::time::Instant;

use tress_solver::HairSimulation;
use tress_types::TressResult;

use crate::metrics::BenchmarkMetrics;
use crate::scenarios::{Scenario, ScenarioKind};

/// Runs benchmark scenarios and collects metrics.
pub struct BenchmarkRunner;

impl BenchmarkRunner {
    /// Run a single scenario.
    pub fn run(scenario: &Scenario) -> TressResult<BenchmarkMetrics> {
        let mut sim = HairSimulation::from_strands(
            scenario.strands.clone(),
            &scenario.material,
            &scenario.pinning,
            scenario.config.clone(),
        )?;
        let initial = sim.positions();

        let mut step_times: Vec<f64> = Vec::with_capacity(scenario.timesteps as usize);
        let mut unstable_steps = 0u32;

        let total_start = Instant::now();
        for _ in 0..scenario.timesteps {
            let tick = sim.step();
            step_times.push(tick.wall_time);
            unstable_steps += tick.unstable_strands().len() as u32;
        }
        let total_wall_time = total_start.elapsed().as_secs_f64();

        let energy = sim.energy();
        let max_displacement = sim
            .positions()
            .iter()
            .flatten()
            .zip(initial.iter().flatten())
            .map(|(p, q)| p.distance(*q))
            .fold(0.0, f64::max);

        let avg_step = if step_times.is_empty() {
            0.0
        } else {
            step_times.iter().sum::<f64>() / step_times.len() as f64
        };
        let min_step = step_times.iter().copied().fold(f64::MAX, f64::min);
        let max_step = step_times.iter().copied().fold(0.0, f64::max);

        Ok(BenchmarkMetrics {
            scenario: scenario.kind.name().to_string(),
            strand_count: sim.rod_count(),
            vertex_count: sim.vertex_count(),
            timesteps: scenario.timesteps,
            substeps: scenario.config.substeps,
            total_wall_time,
            avg_step_time: avg_step,
            min_step_time: min_step,
            max_step_time: max_step,
            final_kinetic_energy: energy.kinetic,
            final_elastic_energy: energy.elastic(),
            max_displacement,
            unstable_steps,
        })
    }

    /// Run all scenarios and return metrics for each.
    pub fn run_all() -> TressResult<Vec<BenchmarkMetrics>> {
        let mut results = Vec::new();
        for &kind in ScenarioKind::all() {
            let scenario = Scenario::from_kind(kind);
            let metrics = Self::run(&scenario)?;
            tracing::info!(
                scenario = kind.name(),
                wall_time = metrics.total_wall_time,
                unstable = metrics.unstable_steps,
                "Benchmark finished"
            );
            results.push(metrics);
        }
        Ok(results)
    }
}
