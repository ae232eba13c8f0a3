//! Per-step diagnostics.

use tress_types::{StrandId, TressError, TressResult};

use crate::energy::EnergyBreakdown;

/// Outcome of advancing one rod by one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Rod that was stepped.
    pub strand: StrandId,
    /// Tick index (the rod's step counter before this step).
    pub step: u64,
    /// Substeps completed. Less than configured when the step was rejected.
    pub substeps: u32,
    /// False when a non-finite force, moment or frame appeared. The rod
    /// keeps its state from before the step.
    pub stable: bool,
    /// Largest elastic force magnitude seen during the step.
    pub max_force: f64,
    /// Worst frame orthonormality defect after the step.
    pub max_frame_error: f64,
}

impl StepReport {
    /// True when the step completed without numerical blow-up.
    #[inline]
    pub fn is_stable(&self) -> bool {
        self.stable
    }

    /// Converts an unstable report into [`TressError::NumericalInstability`].
    pub fn check(&self) -> TressResult<()> {
        if self.stable {
            Ok(())
        } else {
            Err(TressError::NumericalInstability {
                strand: self.strand.0,
                step: self.step,
            })
        }
    }
}

/// Outcome of one simulation tick across every rod.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Tick index.
    pub timestep: u64,
    /// Simulated time after the tick (seconds).
    pub sim_time: f64,
    /// One report per rod, in rod order.
    pub strands: Vec<StepReport>,
    /// Energy summed over every rod after the tick.
    pub energy: EnergyBreakdown,
    /// Wall-clock time for this tick (seconds).
    pub wall_time: f64,
}

impl TickReport {
    /// Ids of rods that blew up this tick.
    pub fn unstable_strands(&self) -> Vec<StrandId> {
        self.strands
            .iter()
            .filter(|r| !r.stable)
            .map(|r| r.strand)
            .collect()
    }

    /// Fails on the first unstable rod.
    pub fn check(&self) -> TressResult<()> {
        self.strands.iter().try_for_each(StepReport::check)
    }
}
