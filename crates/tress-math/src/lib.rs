//! # tress-math
//!
//! Linear algebra primitives for the Tress simulation engine.
//!
//! Provides:
//! - Re-exports of double-precision `glam` types (`DVec3`, `DQuat`, etc.)
//! - Minimal-rotation parallel transport between unit vectors
//! - The orthonormal adapted [`Frame`] carried by every rod edge

pub mod frame;
pub mod transport;

pub use frame::Frame;
pub use transport::{minimal_rotation, parallel_transport, signed_angle};

// Re-export glam types as the canonical math types for Tress.
pub use glam::{DMat2, DQuat, DVec2, DVec3};
