//! Simulation event types.
//!
//! Structured events emitted once per tick. Events are lightweight value
//! types that carry just enough data to be useful for monitoring.

use serde::{Deserialize, Serialize};

/// A simulation event emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Tick number.
    pub timestep: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Tick started.
    TimestepBegin {
        /// Simulated time at the start of the tick (seconds).
        sim_time: f64,
    },

    /// Tick completed.
    TimestepEnd {
        /// Wall-clock time for the whole tick (seconds).
        wall_time: f64,
    },

    /// Energy summed over every strand after the tick.
    Energy {
        stretching: f64,
        bending: f64,
        twisting: f64,
        kinetic: f64,
    },

    /// A strand produced non-finite forces or frames and was not advanced.
    StrandInstability {
        /// Strand index.
        strand: u32,
        /// Substep at which the blow-up was detected.
        substep: u32,
    },

    /// Custom event for extensibility.
    Custom {
        /// Arbitrary label.
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

impl SimulationEvent {
    /// Creates a new event for the given tick.
    pub fn new(timestep: u64, kind: EventKind) -> Self {
        Self { timestep, kind }
    }

    /// True for events that signal a problem.
    pub fn is_warning(&self) -> bool {
        matches!(self.kind, EventKind::StrandInstability { .. })
    }
}
