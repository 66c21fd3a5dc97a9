//! Cost and sustainability impact estimation.
//!
//! Derives a part's mass from its volume and material density, then prices
//! it with a flat manufacturing surcharge and converts it to a carbon
//! figure via the material's emission factor. The numbers are coarse
//! sourcing estimates for reviewer context, not a quote.

use serde::{Deserialize, Serialize};

use crate::materials::MaterialRegistry;

/// Derived cost and carbon figures for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactEstimate {
    /// Material plus manufacturing cost in USD, rounded to cents.
    pub cost_usd: f64,
    /// Production carbon footprint in kg CO2 equivalent, rounded to two
    /// decimal places.
    pub carbon_kg: f64,
}

/// Estimation tunables.
#[derive(Debug, Clone, Copy)]
pub struct ImpactConfig {
    /// Manufacturing cost modeled as this multiple of the raw material
    /// cost. 3.0 approximates CNC machining of small aluminium parts.
    pub surcharge_multiplier: f64,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        ImpactConfig {
            surcharge_multiplier: 3.0,
        }
    }
}

/// Estimate cost and carbon footprint for `volume_mm3` of `material`.
///
/// Returns `None` when the registry does not know the material; callers
/// treat missing figures as unavailable rather than failing the analysis.
pub fn estimate_impact(
    registry: &MaterialRegistry,
    material: &str,
    volume_mm3: f64,
    config: &ImpactConfig,
) -> Option<ImpactEstimate> {
    let properties = registry.lookup(material)?;

    let volume_cm3 = volume_mm3 / 1000.0;
    let mass_kg = volume_cm3 * properties.density_g_cm3 / 1000.0;

    let material_cost = mass_kg * properties.cost_per_kg;
    let manufacturing_cost = material_cost * config.surcharge_multiplier;

    Some(ImpactEstimate {
        cost_usd: round_cents(material_cost + manufacturing_cost),
        carbon_kg: round_cents(mass_kg * properties.co2_kg_per_kg),
    })
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
