//! # tress-solver
//!
//! Energy evaluation, force assembly and time integration for discrete
//! elastic rods.
//!
//! ## Key Types
//!
//! - [`Rod`]: a strand bundled with its rest state, stiffness, masses and
//!   boundary conditions; advances itself one step at a time
//! - [`HairSimulation`]: many independent rods stepped in parallel
//! - [`SolverConfig`]: timestep, substeps, gravity, damping, integrator
//! - [`Integrator`]: pluggable velocity/position update rule
//! - [`StepReport`]: per-rod diagnostics, including numerical blow-up

pub mod boundary;
pub mod config;
pub mod energy;
pub mod forces;
pub mod integrator;
pub mod report;
pub mod rod;
pub mod simulation;

pub use boundary::Pinning;
pub use config::{IntegratorKind, SolverConfig, TwistMode};
pub use energy::EnergyBreakdown;
pub use forces::RodForces;
pub use integrator::{ExplicitEuler, Integrator, SymplecticEuler};
pub use report::{StepReport, TickReport};
pub use rod::{substep_retention, Rod};
pub use simulation::HairSimulation;
