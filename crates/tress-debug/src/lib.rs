//! # tress-debug
//!
//! Inspection hooks and state snapshots for debugging simulation issues.
//! Snapshots serialize every strand's dynamic state to binary for replay
//! and diffing; hooks observe the tick loop without touching the solver.

pub mod hooks;
pub mod snapshot;

pub use hooks::{step_with_hooks, InspectionHook, TelemetryHook};
pub use snapshot::{SimulationSnapshot, StrandSnapshot};
