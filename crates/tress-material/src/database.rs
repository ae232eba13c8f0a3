//! Material database with hair and fiber presets.
//!
//! Hair values follow published single-fiber tensile measurements
//! (E ≈ 3.5–4.2 GPa, ρ ≈ 1.3 g/cm³). The soft presets are not physical
//! hair; they keep explicit integration stable at display framerates.

use std::collections::HashMap;

use crate::properties::RodMaterial;

/// A named collection of rod material presets.
///
/// Materials are looked up by name (e.g., "human_hair", "soft_fiber").
/// Custom materials can be registered at runtime.
#[derive(Debug, Clone)]
pub struct MaterialDatabase {
    materials: HashMap<String, RodMaterial>,
}

impl MaterialDatabase {
    /// Creates a new database with the built-in presets.
    pub fn with_defaults() -> Self {
        let mut db = Self::empty();

        db.register(human_hair());
        db.register(fine_hair());
        db.register(coarse_hair());
        db.register(soft_fiber());
        db.register(test_rod());

        db
    }

    /// Creates an empty database.
    pub fn empty() -> Self {
        Self {
            materials: HashMap::new(),
        }
    }

    /// Registers a material. Overwrites if the name already exists.
    pub fn register(&mut self, material: RodMaterial) {
        self.materials.insert(material.name.clone(), material);
    }

    /// Looks up a material by name. Returns `None` if not found.
    pub fn get(&self, name: &str) -> Option<&RodMaterial> {
        self.materials.get(name)
    }

    /// Returns all registered material names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.materials.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered materials.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Returns true if the database is empty.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl Default for MaterialDatabase {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ─── Built-in Presets ─────────────────────────────────────────────────

/// Average human scalp hair, slightly elliptical (~80 µm diameter).
pub fn human_hair() -> RodMaterial {
    RodMaterial {
        name: "human_hair".into(),
        youngs_modulus: 3.89e9,
        shear_modulus: 1.31e9,
        density: 1320.0,
        major_radius: 4.0e-5,
        minor_radius: 3.5e-5,
        damping: 0.02,
    }
}

/// Thin, nearly round hair.
pub fn fine_hair() -> RodMaterial {
    RodMaterial {
        name: "fine_hair".into(),
        youngs_modulus: 3.5e9,
        shear_modulus: 1.18e9,
        density: 1300.0,
        major_radius: 2.5e-5,
        minor_radius: 2.2e-5,
        damping: 0.02,
    }
}

/// Thick, strongly elliptical hair.
pub fn coarse_hair() -> RodMaterial {
    RodMaterial {
        name: "coarse_hair".into(),
        youngs_modulus: 4.2e9,
        shear_modulus: 1.42e9,
        density: 1320.0,
        major_radius: 6.0e-5,
        minor_radius: 4.5e-5,
        damping: 0.02,
    }
}

/// Soft synthetic fiber, stable at 1/60 s with modest substepping.
pub fn soft_fiber() -> RodMaterial {
    RodMaterial {
        name: "soft_fiber".into(),
        youngs_modulus: 1.0e7,
        shear_modulus: 3.4e6,
        density: 1100.0,
        major_radius: 5.0e-4,
        minor_radius: 5.0e-4,
        damping: 0.02,
    }
}

/// Round millimetre rod used by tests and benchmarks.
pub fn test_rod() -> RodMaterial {
    RodMaterial {
        name: "test_rod".into(),
        youngs_modulus: 1.0e6,
        shear_modulus: 4.0e5,
        density: 1000.0,
        major_radius: 1.0e-3,
        minor_radius: 1.0e-3,
        damping: 0.01,
    }
}
