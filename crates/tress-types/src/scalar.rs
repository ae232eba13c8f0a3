//! Scalar type alias for the simulation.
//!
//! Rod kinematics (parallel transport, discrete twist) accumulate
//! rounding error quickly, so the whole core runs in double precision.
//! Conversion to `f32` only happens at the HAIR file boundary.

/// The floating-point type used throughout the simulation.
pub type Scalar = f64;
