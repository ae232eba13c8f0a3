//! Benchmark scenarios: procedural strands + pinning + config for each case.
//!
//! Three canonical scenarios for regression testing:
//! 1. **Hanging strand**: Straight strand held at the root, swinging down
//! 2. **Curly strand**: Helical strand with a clamped root edge
//! 3. **Strand bundle**: 4×4 grid of wavy strands stepped in parallel

use serde::{Deserialize, Serialize};

use tress_material::database::soft_fiber;
use tress_material::RodMaterial;
use tress_math::DVec3;
use tress_solver::{Pinning, SolverConfig};
use tress_strand::generators::{bundle_roots, helix, straight, wavy};

/// Which benchmark scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// Horizontal strand pinned at the root, falling under gravity.
    HangingStrand,
    /// Helix with root edge clamped, bouncing under gravity.
    CurlyStrand,
    /// Many wavy strands, exercising the parallel tick.
    StrandBundle,
}

impl ScenarioKind {
    /// Returns all scenario kinds.
    pub fn all() -> &'static [ScenarioKind] {
        &[
            ScenarioKind::HangingStrand,
            ScenarioKind::CurlyStrand,
            ScenarioKind::StrandBundle,
        ]
    }

    /// Returns a human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::HangingStrand => "hanging_strand",
            ScenarioKind::CurlyStrand => "curly_strand",
            ScenarioKind::StrandBundle => "strand_bundle",
        }
    }

    /// Parses a name produced by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.name() == name)
    }
}

/// A fully specified benchmark scenario.
pub struct Scenario {
    /// Scenario type.
    pub kind: ScenarioKind,
    /// Initial polylines, one per strand.
    pub strands: Vec<Vec<DVec3>>,
    /// Material shared by every strand.
    pub material: RodMaterial,
    /// Vertex pinning applied to every strand.
    pub pinning: Pinning,
    /// Solver configuration.
    pub config: SolverConfig,
    /// Number of ticks to simulate.
    pub timesteps: u32,
}

impl Scenario {
    /// A 0.5 m strand at 32 vertices, held horizontally by its root,
    /// falling for 1 second at 60 fps.
    pub fn hanging_strand() -> Self {
        Self {
            kind: ScenarioKind::HangingStrand,
            strands: vec![straight(32, 0.5, DVec3::new(0.0, 1.0, 0.0), DVec3::X)],
            material: soft_fiber(),
            pinning: Pinning::Root,
            config: SolverConfig::default(),
            timesteps: 60,
        }
    }

    /// A 4-turn helix of radius 2 cm with its root edge clamped.
    pub fn curly_strand() -> Self {
        Self {
            kind: ScenarioKind::CurlyStrand,
            strands: vec![helix(40, 0.02, 0.05, 4.0, DVec3::new(0.0, 1.0, 0.0))],
            material: soft_fiber(),
            pinning: Pinning::RootEdge,
            config: SolverConfig::default(),
            timesteps: 60,
        }
    }

    /// 16 wavy 0.4 m strands on a 1 cm grid.
    pub fn strand_bundle() -> Self {
        let strands = bundle_roots(4, 0.01, DVec3::new(0.0, 1.0, 0.0))
            .into_iter()
            .map(|root| wavy(24, 0.4, 0.01, 2.0, root))
            .collect();
        Self {
            kind: ScenarioKind::StrandBundle,
            strands,
            material: soft_fiber(),
            pinning: Pinning::Root,
            config: SolverConfig::default(),
            timesteps: 60,
        }
    }

    /// Create a scenario by kind.
    pub fn from_kind(kind: ScenarioKind) -> Self {
        match kind {
            ScenarioKind::HangingStrand => Self::hanging_strand(),
            ScenarioKind::CurlyStrand => Self::curly_strand(),
            ScenarioKind::StrandBundle => Self::strand_bundle(),
        }
    }

    /// Replace the material of every strand.
    pub fn with_material(mut self, material: RodMaterial) -> Self {
        self.material = material;
        self
    }
}
