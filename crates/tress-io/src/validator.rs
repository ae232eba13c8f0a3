//! Input validation.
//!
//! Checks simulation inputs before any rod is built, so that bad data is
//! reported with a clear message instead of surfacing as a solver error.

use tress_material::MaterialDatabase;
use tress_solver::Pinning;
use tress_types::{TressError, TressResult};

use crate::contract::{SimulationInput, SimulationParams};
use crate::hair_file::HairFile;

/// Validates a complete simulation input.
///
/// Checks:
/// - At least one strand, each with ≥ 2 finite vertices
/// - Explicit pin indices exist on every strand
/// - Cross-sections, when given, cover every edge of every strand
/// - Parameters are in range and the material is known
pub fn validate_input(input: &SimulationInput, materials: &MaterialDatabase) -> TressResult<()> {
    if input.strands.is_empty() {
        return Err(TressError::InvalidStrand("Input contains no strands".into()));
    }
    for (i, strand) in input.strands.iter().enumerate() {
        if strand.len() < 2 {
            return Err(TressError::InvalidStrand(format!(
                "Strand {i} has {} vertices, needs at least 2",
                strand.len()
            )));
        }
        if let Some(v) = strand.iter().position(|p| !p.is_finite()) {
            return Err(TressError::InvalidStrand(format!(
                "Strand {i} vertex {v} is not finite"
            )));
        }
    }

    if let Some(sections) = &input.cross_sections {
        if sections.len() != input.strands.len() {
            return Err(TressError::InvalidStrand(format!(
                "{} cross-sections given for {} strands",
                sections.len(),
                input.strands.len()
            )));
        }
        for (i, (section, strand)) in sections.iter().zip(&input.strands).enumerate() {
            if section.edge_count() != strand.len() - 1 {
                return Err(TressError::InvalidStrand(format!(
                    "Cross-section of strand {i} has {} edges, strand has {}",
                    section.edge_count(),
                    strand.len() - 1
                )));
            }
            section.validate()?;
        }
    }

    validate_params(&input.params, materials)?;

    if let Pinning::Indices(indices) = &input.params.pinning {
        let shortest = match input.params.resample {
            Some(n) => n,
            None => input.strands.iter().map(Vec::len).min().unwrap_or(0),
        };
        if let Some(&bad) = indices.iter().find(|&&i| i >= shortest) {
            return Err(TressError::InvalidConfig(format!(
                "Pinned vertex {bad} out of range for a strand of {shortest} vertices"
            )));
        }
    }

    Ok(())
}

/// Validates run parameters.
pub fn validate_params(params: &SimulationParams, materials: &MaterialDatabase) -> TressResult<()> {
    if !params.duration.is_finite() || params.duration <= 0.0 {
        return Err(TressError::InvalidConfig(
            "Duration must be positive".into(),
        ));
    }
    if let Some(n) = params.resample {
        if n < 2 {
            return Err(TressError::InvalidConfig(format!(
                "Resample count must be at least 2, got {n}"
            )));
        }
    }
    params.solver.validate()?;

    let material = materials.get(&params.material_name).ok_or_else(|| {
        TressError::InvalidConfig(format!(
            "Unknown material '{}' (available: {})",
            params.material_name,
            materials.names().join(", ")
        ))
    })?;
    material.validate()?;

    Ok(())
}

/// Checks that the arrays of a HAIR file agree with its header.
pub fn validate_hair_file(file: &HairFile) -> TressResult<()> {
    file.check_arrays()?;
    let points = file.point_count();

    let counted: usize = file.segment_counts().iter().map(|s| s + 1).sum();
    if counted != points {
        return Err(TressError::InvalidHairFile(format!(
            "Segments describe {counted} points, header has {points}"
        )));
    }
    if file.segment_counts().contains(&0) {
        return Err(TressError::InvalidHairFile(
            "Strands with zero segments cannot be simulated".into(),
        ));
    }
    if file.points().iter().any(|v| !v.is_finite()) {
        return Err(TressError::InvalidHairFile("Points array contains non-finite values".into()));
    }
    Ok(())
}
