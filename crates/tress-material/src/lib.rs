//! # tress-material
//!
//! Rod materials and cross-sections.
//!
//! ## Design
//!
//! A [`RodMaterial`] holds rod-wide constants (Young's modulus, shear
//! modulus, density) together with default elliptical radii. A
//! [`CrossSection`] carries the per-edge semi-axes `(a_i, b_i)` the
//! stiffness precomputation consumes.
//!
//! The [`MaterialDatabase`] stores named presets for human hair and a few
//! softer fibers that are convenient for interactive timesteps.

pub mod cross_section;
pub mod database;
pub mod properties;

pub use cross_section::CrossSection;
pub use database::MaterialDatabase;
pub use properties::RodMaterial;
