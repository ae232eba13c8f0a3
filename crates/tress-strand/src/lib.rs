//! # tress-strand
//!
//! The discrete rod: a polyline of vertices with per-edge adapted frames.
//!
//! ## Key Types
//!
//! - [`Strand`]: vertices, velocities, twist angles and every derived
//!   per-edge array (edges, tangents, reference and material frames)
//! - [`EdgeGeometry`]: edge vectors, lengths and unit tangents
//! - [`MaterialFrames`]: reference frames rotated by the twist angles
//! - [`RestState`] / [`Stiffness`]: immutable bundles computed once
//!   from the initial configuration
//! - Procedural strand generators and arc-length resampling
//!
//! ## Indexing
//!
//! Vertex-indexed arrays have `N` entries and edge-indexed arrays `N − 1`.
//! Edge `i` joins vertex `i` and vertex `i + 1`. Quantities undefined at
//! the two end vertices (curvature, twist, Voronoi length) are stored as
//! zero so that index `i` always refers to vertex `i`.

pub mod curvature;
pub mod frames;
pub mod generators;
pub mod geometry;
pub mod rest;
pub mod stiffness;
pub mod strand;
pub mod subdivide;

pub use frames::MaterialFrames;
pub use geometry::EdgeGeometry;
pub use rest::RestState;
pub use stiffness::Stiffness;
pub use strand::Strand;
