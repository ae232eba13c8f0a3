//! Error types for the Tress engine.
//!
//! All crates return `TressResult<T>` from fallible operations.
//! Degenerate geometry (zero-length edges, antiparallel tangents) is
//! resolved locally by convention and never surfaces here.

use thiserror::Error;

/// Unified error type for the Tress engine.
#[derive(Debug, Error)]
pub enum TressError {
    /// Strand data is malformed (too few vertices, non-finite points,
    /// cross-section arrays of the wrong length).
    #[error("Invalid strand: {0}")]
    InvalidStrand(String),

    /// Material parameter is out of valid range.
    #[error("Invalid material parameter: {0}")]
    InvalidMaterial(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// HAIR file header is not recognized.
    #[error("Invalid hair file: {0}")]
    InvalidHairFile(String),

    /// A HAIR file section declared in the header could not be fully read.
    #[error("Truncated hair file: {section} needs {expected} bytes, {available} available")]
    TruncatedHairFile {
        section: &'static str,
        expected: usize,
        available: usize,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Forces or frames of a strand became NaN/Inf.
    #[error("Numerical instability in strand {strand} at step {step}")]
    NumericalInstability {
        strand: u32,
        step: u64,
    },

    /// A simulation invariant was violated.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Convenience alias for `Result<T, TressError>`.
pub type TressResult<T> = Result<T, TressError>;
