//! Physical constants and simulation defaults.

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Default simulation timestep (seconds). 1/60th of a second.
pub const DEFAULT_DT: f64 = 1.0 / 60.0;

/// Default number of integration substeps per timestep.
pub const DEFAULT_SUBSTEPS: u32 = 200;

/// Default velocity damping per tick.
pub const DEFAULT_DAMPING: f64 = 1.0e-3;

/// Edges shorter than this are treated as degenerate: their tangent
/// is not renormalized and they contribute no elastic force.
pub const DEGENERATE_EDGE_LENGTH: f64 = 1.0e-12;

/// Cross products shorter than this are treated as parallel vectors.
pub const PARALLEL_EPSILON: f64 = 1.0e-12;

/// Threshold used when choosing the world axis that seeds the first
/// reference director.
pub const SEED_AXIS_EPSILON: f64 = 1.0e-9;

/// Tolerance for orthonormality checks on frames.
pub const FRAME_TOLERANCE: f64 = 1.0e-9;
