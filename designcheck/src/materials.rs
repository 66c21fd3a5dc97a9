//! Material property registry.
//!
//! Impact figures come from a name-keyed library of densities, prices and
//! emission factors. The embedded library covers common prototyping
//! materials; deployments load their own JSON to match procurement data.
//! A material the registry does not know yields no figures rather than an
//! error, because the snapshot itself may still be perfectly compliant.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

const EMBEDDED_MATERIALS: &str = include_str!("../data/materials.json");

/// Physical and commercial properties of one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Density in grams per cubic centimetre.
    pub density_g_cm3: f64,
    /// Raw material price in USD per kilogram.
    pub cost_per_kg: f64,
    /// Kilograms of CO2 equivalent emitted per kilogram produced.
    #[serde(default)]
    pub co2_kg_per_kg: f64,
}

/// Name-keyed material library.
pub struct MaterialRegistry {
    materials: BTreeMap<String, MaterialProperties>,
}

impl MaterialRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        MaterialRegistry {
            materials: BTreeMap::new(),
        }
    }

    /// Registry preloaded with the embedded material library.
    pub fn with_default_materials() -> Self {
        match Self::from_json_str(EMBEDDED_MATERIALS) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::warn!("Failed to parse embedded material library: {}", e);
                MaterialRegistry::new()
            }
        }
    }

    /// Parse a library from a JSON object mapping names to properties.
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let materials: BTreeMap<String, MaterialProperties> =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse JSON: {}", e))?;
        Ok(MaterialRegistry { materials })
    }

    /// Load a library from a JSON file.
    pub fn load_materials_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read file: {}", e))?;
        let registry = Self::from_json_str(&content)?;
        tracing::info!("Loaded {} materials from {:?}", registry.len(), path);
        Ok(registry)
    }

    /// Add or replace one material.
    pub fn insert(&mut self, name: impl Into<String>, properties: MaterialProperties) {
        self.materials.insert(name.into(), properties);
    }

    /// Properties for a material name, if known. Lookup is exact; there is
    /// no fuzzy matching between "Aluminium" and "Aluminium 6061".
    pub fn lookup(&self, name: &str) -> Option<&MaterialProperties> {
        self.materials.get(name)
    }

    /// Number of materials in the registry.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        MaterialRegistry::with_default_materials()
    }
}
