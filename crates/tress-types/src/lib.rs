//! # tress-types
//!
//! Shared types, identifiers, error types, and physical constants
//! for the Tress hair simulation engine.
//!
//! This crate has zero domain logic: it defines the vocabulary
//! that all other Tress crates share.

pub mod constants;
pub mod error;
pub mod ids;
pub mod scalar;

pub use error::{TressError, TressResult};
pub use ids::{EdgeId, StrandId, VertexId};
pub use scalar::Scalar;
