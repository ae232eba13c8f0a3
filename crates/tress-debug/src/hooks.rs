//! Inspection hooks for live debugging.
//!
//! Hooks observe the tick loop at fixed points and can capture metrics
//! or events. They never modify simulation state.

use std::sync::mpsc;

use tress_solver::{HairSimulation, TickReport};
use tress_telemetry::events::{EventKind, SimulationEvent};

/// Trait for simulation inspection hooks.
///
/// # Lifecycle
///
/// ```text
/// for each tick:
///   hook.on_timestep_begin(...)
///   hook.on_tick(report)
///   hook.on_timestep_end(...)
/// hook.on_simulation_end()
/// ```
pub trait InspectionHook: Send {
    /// Called before a tick runs.
    fn on_timestep_begin(&mut self, timestep: u64, sim_time: f64) {
        let _ = (timestep, sim_time);
    }

    /// Called with the report of the completed tick.
    fn on_tick(&mut self, report: &TickReport) {
        let _ = report;
    }

    /// Called at the end of each tick.
    fn on_timestep_end(&mut self, timestep: u64, wall_time: f64) {
        let _ = (timestep, wall_time);
    }

    /// Called when the simulation completes.
    fn on_simulation_end(&mut self) {}

    /// Returns the hook's name for logging.
    fn name(&self) -> &str;
}

/// Runs one tick, calling every hook around it.
///
/// Hooks receive the index of the tick being run, which matches
/// `report.timestep`.
pub fn step_with_hooks(sim: &mut HairSimulation, hooks: &mut [Box<dyn InspectionHook>]) -> TickReport {
    let timestep = sim.timestep() + 1;
    for hook in hooks.iter_mut() {
        hook.on_timestep_begin(timestep, sim.sim_time());
    }
    let report = sim.step();
    for hook in hooks.iter_mut() {
        hook.on_tick(&report);
        hook.on_timestep_end(timestep, report.wall_time);
    }
    report
}

/// Hook that translates the tick loop into telemetry events.
///
/// Events are buffered until [`drain_events`](Self::drain_events), or sent
/// straight to an event bus when built with [`forwarding`](Self::forwarding).
#[derive(Debug, Default)]
pub struct TelemetryHook {
    events: Vec<SimulationEvent>,
    sender: Option<mpsc::Sender<SimulationEvent>>,
}

impl TelemetryHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// A hook that sends every event through `sender` (see `EventBus::sender`).
    pub fn forwarding(sender: mpsc::Sender<SimulationEvent>) -> Self {
        Self {
            events: Vec::new(),
            sender: Some(sender),
        }
    }

    /// Drains collected events for dispatch.
    pub fn drain_events(&mut self) -> Vec<SimulationEvent> {
        std::mem::take(&mut self.events)
    }

    fn push(&mut self, event: SimulationEvent) {
        match &self.sender {
            // A dropped bus only loses telemetry.
            Some(sender) => {
                let _ = sender.send(event);
            }
            None => self.events.push(event),
        }
    }
}

impl InspectionHook for TelemetryHook {
    fn on_timestep_begin(&mut self, timestep: u64, sim_time: f64) {
        self.push(SimulationEvent::new(timestep, EventKind::TimestepBegin { sim_time }));
    }

    fn on_tick(&mut self, report: &TickReport) {
        let e = report.energy;
        self.push(SimulationEvent::new(
            report.timestep,
            EventKind::Energy {
                stretching: e.stretching,
                bending: e.bending,
                twisting: e.twisting,
                kinetic: e.kinetic,
            },
        ));
        for strand in report.strands.iter().filter(|s| !s.is_stable()) {
            self.push(SimulationEvent::new(
                report.timestep,
                EventKind::StrandInstability {
                    strand: strand.strand.0,
                    substep: strand.substeps,
                },
            ));
        }
    }

    fn on_timestep_end(&mut self, timestep: u64, wall_time: f64) {
        self.push(SimulationEvent::new(timestep, EventKind::TimestepEnd { wall_time }));
    }

    fn name(&self) -> &str {
        "telemetry_hook"
    }
}
