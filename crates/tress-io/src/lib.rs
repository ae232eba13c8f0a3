//! # tress-io
//!
//! Boundary types between the simulation core and the outside world:
//!
//! - [`HairFile`]: the little-endian `HAIR` binary strand format
//! - [`contract`]: serializable simulation input, parameters and output
//! - [`validator`]: input checks run before any rod is built
//! - [`loader`]: turns validated input into a [`tress_solver::HairSimulation`]

pub mod contract;
pub mod hair_file;
pub mod loader;
pub mod validator;

pub use contract::{SimulationInput, SimulationMetrics, SimulationOutput, SimulationParams};
pub use hair_file::{HairFile, HairHeader};
