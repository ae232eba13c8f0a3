//! Physical rod properties.

use serde::{Deserialize, Serialize};
use tress_types::{TressError, TressResult};

use crate::cross_section::CrossSection;

/// Physical properties of a rod (hair fiber) material.
///
/// | Field | Unit | Used for |
/// |---|---|---|
/// | `youngs_modulus` | Pa | stretching and bending stiffness |
/// | `shear_modulus` | Pa | twisting stiffness |
/// | `density` | kg/m³ | lumped vertex mass and twist inertia |
/// | `major_radius`, `minor_radius` | m | default elliptical cross-section |
/// | `damping` | 1/tick | velocity damping factor |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RodMaterial {
    /// Preset name (e.g., "human_hair").
    pub name: String,

    /// Young's modulus E.
    pub youngs_modulus: f64,

    /// Shear modulus G.
    pub shear_modulus: f64,

    /// Volumetric density.
    pub density: f64,

    /// Semi-axis a of the elliptical cross-section.
    pub major_radius: f64,

    /// Semi-axis b of the elliptical cross-section.
    pub minor_radius: f64,

    /// Damping coefficient (0.0–1.0). Higher = more energy dissipation.
    pub damping: f64,
}

impl RodMaterial {
    /// Checks that every parameter is finite and physically meaningful.
    pub fn validate(&self) -> TressResult<()> {
        let positive = [
            ("youngs_modulus", self.youngs_modulus),
            ("shear_modulus", self.shear_modulus),
            ("density", self.density),
            ("major_radius", self.major_radius),
            ("minor_radius", self.minor_radius),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TressError::InvalidMaterial(format!(
                    "{}: {field} must be positive and finite, got {value}",
                    self.name
                )));
            }
        }
        if !(0.0..1.0).contains(&self.damping) {
            return Err(TressError::InvalidMaterial(format!(
                "{}: damping must be in [0, 1), got {}",
                self.name, self.damping
            )));
        }
        Ok(())
    }

    /// Uniform cross-section with this material's radii for `edge_count` edges.
    pub fn cross_section(&self, edge_count: usize) -> CrossSection {
        CrossSection::uniform(edge_count, self.major_radius, self.minor_radius)
    }

    /// Poisson ratio implied by E and G for an isotropic solid.
    pub fn poisson_ratio(&self) -> f64 {
        self.youngs_modulus / (2.0 * self.shear_modulus) - 1.0
    }

    /// Mass per unit length of the default cross-section (kg/m).
    pub fn linear_density(&self) -> f64 {
        self.density * std::f64::consts::PI * self.major_radius * self.minor_radius
    }
}
