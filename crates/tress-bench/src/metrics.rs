//! Benchmark metrics: data collected during a benchmark run.

use serde::{Deserialize, Serialize};

/// Metrics collected from a benchmark scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    /// Scenario name.
    pub scenario: String,
    /// Number of strands.
    pub strand_count: usize,
    /// Total vertex count over all strands.
    pub vertex_count: usize,
    /// Number of ticks executed.
    pub timesteps: u32,
    /// Substeps per tick.
    pub substeps: u32,
    /// Total wall-clock time (seconds).
    pub total_wall_time: f64,
    /// Average wall-clock time per tick (seconds).
    pub avg_step_time: f64,
    /// Minimum tick time.
    pub min_step_time: f64,
    /// Maximum tick time.
    pub max_step_time: f64,
    /// Final kinetic energy.
    pub final_kinetic_energy: f64,
    /// Final elastic (stretching + bending + twisting) energy.
    pub final_elastic_energy: f64,
    /// Largest vertex displacement from the initial shape.
    pub max_displacement: f64,
    /// Strand steps that were rolled back.
    pub unstable_steps: u32,
}

impl BenchmarkMetrics {
    /// CSV header matching [`to_csv_row`](Self::to_csv_row).
    pub fn to_csv_header() -> String {
        "scenario,strands,vertices,timesteps,substeps,total_wall_time_s,avg_step_ms,min_step_ms,max_step_ms,final_ke,final_elastic,max_displacement,unstable_steps".to_string()
    }

    /// Format this metrics instance as a CSV data row.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{:.6},{:.4},{:.4},{:.4},{:.6e},{:.6e},{:.6},{}",
            self.scenario,
            self.strand_count,
            self.vertex_count,
            self.timesteps,
            self.substeps,
            self.total_wall_time,
            self.avg_step_time * 1000.0,
            self.min_step_time * 1000.0,
            self.max_step_time * 1000.0,
            self.final_kinetic_energy,
            self.final_elastic_energy,
            self.max_displacement,
            self.unstable_steps,
        )
    }

    /// Format multiple metrics as a complete CSV string.
    pub fn to_csv(metrics: &[BenchmarkMetrics]) -> String {
        let mut csv = Self::to_csv_header();
        for m in metrics {
            csv.push('\n');
            csv.push_str(&m.to_csv_row());
        }
        csv
    }
}
