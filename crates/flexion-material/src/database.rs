//! Material database with named parameter presets.

use std::collections::HashMap;

use crate::properties::MaterialProperties;

/// A named collection of material presets.
///
/// Materials are looked up by name (e.g., "natural_rubber", "tendon").
/// Custom materials can be registered at runtime.
#[derive(Debug, Clone)]
pub struct MaterialDatabase {
    materials: HashMap<String, MaterialProperties>,
}

impl MaterialDatabase {
    /// Creates a new database with the built-in presets.
    pub fn with_defaults() -> Self {
        let mut db = Self::empty();
        db.register(natural_rubber());
        db.register(soft_tissue());
        db.register(polyurethane_foam());
        db.register(tendon());
        db
    }

    /// Creates an empty database.
    pub fn empty() -> Self {
        Self {
            materials: HashMap::new(),
        }
    }

    /// Registers a material. Overwrites if the name already exists.
    pub fn register(&mut self, props: MaterialProperties) {
        self.materials.insert(props.name.clone(), props);
    }

    /// Looks up a material by name. Returns `None` if not found.
    pub fn get(&self, name: &str) -> Option<&MaterialProperties> {
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

/// Natural rubber: soft, strongly hardening at large strain.
fn natural_rubber() -> MaterialProperties {
    MaterialProperties {
        name: "natural_rubber".into(),
        youngs_modulus: 1.5e6,
        anisotropy: [1.0, 1.0, 1.0],
        viscosity: 1.0e3,
        hardening: 4.0e6,
    }
}

/// Soft tissue: very compliant, noticeably viscous.
fn soft_tissue() -> MaterialProperties {
    MaterialProperties {
        name: "soft_tissue".into(),
        youngs_modulus: 3.0e3,
        anisotropy: [1.0, 1.0, 1.0],
        viscosity: 50.0,
        hardening: 1.0e4,
    }
}

/// Polyurethane foam: linear and lightly damped.
fn polyurethane_foam() -> MaterialProperties {
    MaterialProperties {
        name: "polyurethane_foam".into(),
        youngs_modulus: 5.0e4,
        anisotropy: [1.0, 1.0, 1.0],
        viscosity: 10.0,
        hardening: 0.0,
    }
}

/// Tendon: stiff along the fiber axis (x), soft across it.
fn tendon() -> MaterialProperties {
    MaterialProperties {
        name: "tendon".into(),
        youngs_modulus: 1.2e9,
        anisotropy: [1.0, 0.01, 0.01],
        viscosity: 1.0e4,
        hardening: 0.0,
    }
}
