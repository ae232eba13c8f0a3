//! State snapshot serialization for replay and debugging.
//!
//! Snapshots capture the dynamic state of every strand at one tick,
//! including the time-parallel reference frames. Restoring a snapshot
//! installs those frames directly so twist and curvature match the
//! captured tick exactly.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tress_math::{DVec3, Frame};
use tress_solver::HairSimulation;
use tress_strand::Strand;
use tress_types::{StrandId, TressError, TressResult};

/// Dynamic state of one strand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrandSnapshot {
    /// Strand index.
    pub strand: u32,
    /// Vertex positions (flat: [x0, y0, z0, x1, y1, z1, ...]).
    pub positions: Vec<f64>,
    /// Vertex velocities (flat, same layout).
    pub velocities: Vec<f64>,
    /// Twist angle per edge.
    pub thetas: Vec<f64>,
    /// Twist rate per edge.
    pub theta_rates: Vec<f64>,
    /// Reference frame per edge.
    pub frames: Vec<Frame>,
}

impl StrandSnapshot {
    /// Copies the dynamic state of a strand.
    pub fn capture(id: StrandId, strand: &Strand) -> Self {
        Self {
            strand: id.0,
            positions: flatten(&strand.positions),
            velocities: flatten(&strand.velocities),
            thetas: strand.thetas.clone(),
            theta_rates: strand.theta_rates.clone(),
            frames: strand.reference_frames().to_vec(),
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Position of vertex `i`.
    pub fn position(&self, i: usize) -> DVec3 {
        DVec3::from_slice(&self.positions[3 * i..3 * i + 3])
    }

    fn write_into(&self, strand: &mut Strand) -> TressResult<()> {
        let n = strand.vertex_count();
        if self.vertex_count() != n
            || self.velocities.len() != 3 * n
            || self.thetas.len() != n - 1
            || self.theta_rates.len() != n - 1
            || self.frames.len() != n - 1
        {
            return Err(TressError::InvalidConfig(format!(
                "Snapshot of strand {} has {} vertices, simulation has {n}",
                self.strand,
                self.vertex_count()
            )));
        }
        strand.positions = unflatten(&self.positions);
        strand.velocities = unflatten(&self.velocities);
        strand.thetas.copy_from_slice(&self.thetas);
        strand.theta_rates.copy_from_slice(&self.theta_rates);
        strand.set_reference_frames(self.frames.clone())
    }
}

/// A complete simulation state snapshot.
///
/// Serialized with `bincode` for compact binary output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// Tick index when this snapshot was taken.
    pub timestep: u64,
    /// Simulation time in seconds.
    pub sim_time: f64,
    /// One entry per strand, in simulation order.
    pub strands: Vec<StrandSnapshot>,
}

impl SimulationSnapshot {
    /// Captures every rod of a simulation.
    pub fn capture(sim: &HairSimulation) -> Self {
        Self {
            timestep: sim.timestep(),
            sim_time: sim.sim_time(),
            strands: sim
                .rods()
                .iter()
                .map(|rod| StrandSnapshot::capture(rod.id(), rod.strand()))
                .collect(),
        }
    }

    /// Total vertex count.
    pub fn vertex_count(&self) -> usize {
        self.strands.iter().map(StrandSnapshot::vertex_count).sum()
    }

    /// Writes the stored strand states and the clock back into a
    /// simulation with the same layout.
    pub fn restore(&self, sim: &mut HairSimulation) -> TressResult<()> {
        if self.strands.len() != sim.rod_count() {
            return Err(TressError::InvalidConfig(format!(
                "Snapshot has {} strands, simulation has {}",
                self.strands.len(),
                sim.rod_count()
            )));
        }
        for (snap, rod) in self.strands.iter().zip(sim.rods_mut()) {
            snap.write_into(rod.strand_mut())?;
        }
        sim.set_clock(self.timestep, self.sim_time);
        Ok(())
    }

    /// Largest vertex distance between two snapshots of the same layout.
    ///
    /// Returns `None` when the layouts differ.
    pub fn max_displacement(&self, other: &Self) -> Option<f64> {
        if self.strands.len() != other.strands.len() {
            return None;
        }
        let mut max = 0.0_f64;
        for (a, b) in self.strands.iter().zip(&other.strands) {
            if a.positions.len() != b.positions.len() {
                return None;
            }
            for i in 0..a.vertex_count() {
                max = max.max(a.position(i).distance(b.position(i)));
            }
        }
        Some(max)
    }

    /// Serializes to compact binary format.
    pub fn to_bytes(&self) -> TressResult<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| TressError::Serialization(format!("Snapshot serialization failed: {e}")))
    }

    /// Deserializes from binary format.
    pub fn from_bytes(data: &[u8]) -> TressResult<Self> {
        bincode::deserialize(data)
            .map_err(|e| TressError::Serialization(format!("Snapshot deserialization failed: {e}")))
    }

    /// Writes the snapshot to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> TressResult<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Reads a snapshot from a file.
    pub fn load(path: impl AsRef<Path>) -> TressResult<Self> {
        Self::from_bytes(&fs::read(path)?)
    }
}

fn flatten(v: &[DVec3]) -> Vec<f64> {
    v.iter().flat_map(|p| p.to_array()).collect()
}

fn unflatten(flat: &[f64]) -> Vec<DVec3> {
    flat.chunks_exact(3).map(DVec3::from_slice).collect()
}
