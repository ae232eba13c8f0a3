//! Builds a ready-to-step simulation from validated input.

use tress_material::{CrossSection, MaterialDatabase};
use tress_math::DVec3;
use tress_solver::{HairSimulation, Rod};
use tress_strand::subdivide::subdivide;
use tress_types::{StrandId, TressError, TressResult};

use crate::contract::SimulationInput;
use crate::validator::validate_input;

/// Applies the optional resampling to every strand.
pub fn prepare_strands(strands: &[Vec<DVec3>], resample: Option<usize>) -> TressResult<Vec<Vec<DVec3>>> {
    match resample {
        Some(n) => strands.iter().map(|s| subdivide(s, n)).collect(),
        None => Ok(strands.to_vec()),
    }
}

/// Carries per-edge radii over to a resampled strand.
///
/// Each new edge takes the radii of the input edge containing its
/// arc-length midpoint.
pub fn resample_cross_section(
    points: &[DVec3],
    section: &CrossSection,
    vertex_count: usize,
) -> TressResult<CrossSection> {
    if vertex_count < 2 {
        return Err(TressError::InvalidConfig(format!(
            "Resampled strand needs at least 2 vertices, got {vertex_count}"
        )));
    }
    if section.edge_count() + 1 != points.len() {
        return Err(TressError::InvalidStrand(format!(
            "Cross-section has {} edges, strand has {}",
            section.edge_count(),
            points.len().saturating_sub(1)
        )));
    }

    // Arc length at the end of every input edge.
    let ends: Vec<f64> = points
        .windows(2)
        .scan(0.0, |walked, w| {
            *walked += (w[1] - w[0]).length();
            Some(*walked)
        })
        .collect();
    let total = ends.last().copied().unwrap_or(0.0);
    let edges = vertex_count - 1;
    let spacing = total / edges as f64;

    let mut major = Vec::with_capacity(edges);
    let mut minor = Vec::with_capacity(edges);
    let mut source = 0;
    for k in 0..edges {
        let mid = (k as f64 + 0.5) * spacing;
        while source + 1 < ends.len() && ends[source] < mid {
            source += 1;
        }
        major.push(section.major[source]);
        minor.push(section.minor[source]);
    }
    CrossSection::new(major, minor)
}

/// Validates `input`, resamples its strands and creates one rod per strand.
pub fn build_simulation(input: &SimulationInput, materials: &MaterialDatabase) -> TressResult<HairSimulation> {
    validate_input(input, materials)?;

    let params = &input.params;
    let material = materials.get(&params.material_name).ok_or_else(|| {
        TressError::InvalidConfig(format!("Unknown material '{}'", params.material_name))
    })?;
    let strands = prepare_strands(&input.strands, params.resample)?;

    tracing::debug!(
        strands = strands.len(),
        material = %material.name,
        resample = ?params.resample,
        cross_sections = input.cross_sections.is_some(),
        "Building simulation"
    );
    let Some(sections) = &input.cross_sections else {
        return HairSimulation::from_strands(strands, material, &params.pinning, params.solver.clone());
    };

    let mut sim = HairSimulation::new(params.solver.clone())?;
    for (i, (points, (original, section))) in strands
        .into_iter()
        .zip(input.strands.iter().zip(sections))
        .enumerate()
    {
        let section = match params.resample {
            Some(n) => resample_cross_section(original, section, n)?,
            None => section.clone(),
        };
        sim.add_rod(Rod::with_cross_section(
            StrandId(i as u32),
            points,
            material,
            section,
            &params.pinning,
        )?);
    }
    tracing::info!(
        strands = sim.rod_count(),
        vertices = sim.vertex_count(),
        "Hair simulation initialized with per-edge cross-sections"
    );
    Ok(sim)
}
