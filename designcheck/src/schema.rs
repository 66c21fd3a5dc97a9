//! Shared data contracts for snapshots and design intents.
//!
//! Snapshot and intent schemas are declared once here so that the analysis
//! pipeline, the CLI, and any upstream intent producer deserialize the same
//! types. CAD connectors export snapshots as plain JSON matching
//! [`CadSnapshot`]; a connector for another CAD system only has to emit the
//! same shape.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar parameter value. CAD exports mix numeric parameters with text
/// settings, so both deserialize from the same JSON field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// Numeric view of the value, if it is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Text(_) => None,
        }
    }

    /// Text view of the value, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Number(_) => None,
            ParamValue::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

/// Flattened snapshot view handed to the rule engine.
///
/// A `BTreeMap` keeps iteration order stable, so serialized results are
/// byte-identical across repeated runs on the same snapshot.
pub type ParameterSet = BTreeMap<String, ParamValue>;

/// Document-level settings captured from the CAD application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSettings {
    /// Unit system, e.g. "MMGS" or "IPS".
    pub unit_system: String,
    /// Tolerance standard, e.g. "ISO" or "ANSI".
    pub tolerance_standard: String,
    /// Render quality setting, e.g. "High" or "Draft".
    pub image_quality: String,
}

/// One design state as exported by a CAD connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadSnapshot {
    /// Named model dimensions and the material selection.
    pub design_parameters: BTreeMap<String, ParamValue>,
    /// Computed mass properties such as `weight_g` and `volume_mm3`.
    pub mass_properties: BTreeMap<String, f64>,
    /// Document configuration at capture time.
    pub document_properties: DocumentSettings,
    /// Feature tree census, e.g. extrudes, cuts, fillets.
    #[serde(default)]
    pub feature_counts: BTreeMap<String, u32>,
    /// Optional simulation results attached by an FEA run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fea_summary: Option<BTreeMap<String, f64>>,
}

impl CadSnapshot {
    /// Flatten the snapshot into one name/value map for rule evaluation.
    ///
    /// Sections merge in the order design parameters, mass properties,
    /// document settings; on a key collision the later section wins.
    pub fn parameter_set(&self) -> ParameterSet {
        let mut params = ParameterSet::new();
        for (name, value) in &self.design_parameters {
            params.insert(name.clone(), value.clone());
        }
        for (name, value) in &self.mass_properties {
            params.insert(name.clone(), ParamValue::Number(*value));
        }
        let doc = &self.document_properties;
        params.insert(
            "unit_system".to_string(),
            ParamValue::Text(doc.unit_system.clone()),
        );
        params.insert(
            "tolerance_standard".to_string(),
            ParamValue::Text(doc.tolerance_standard.clone()),
        );
        params.insert(
            "image_quality".to_string(),
            ParamValue::Text(doc.image_quality.clone()),
        );
        params
    }

    /// Material named in the design parameters, if any.
    pub fn material(&self) -> Option<&str> {
        self.design_parameters
            .get("material")
            .and_then(ParamValue::as_text)
    }

    /// Part volume in cubic millimetres from the mass properties, if present.
    pub fn volume_mm3(&self) -> Option<f64> {
        self.mass_properties.get("volume_mm3").copied()
    }

    /// Simulated SolidWorks export used by demos and tests: a drone arm
    /// that is over its weight budget, has a 1 mm fillet too sharp for CNC
    /// tooling and is still set to inch units.
    pub fn sample_drone_arm() -> Self {
        let mut design_parameters = BTreeMap::new();
        design_parameters.insert("wall_thickness_mm".to_string(), ParamValue::Number(3.0));
        design_parameters.insert("fillet_radius_mm".to_string(), ParamValue::Number(1.0));
        design_parameters.insert(
            "material".to_string(),
            ParamValue::Text("Aluminium 6061".to_string()),
        );

        let mut mass_properties = BTreeMap::new();
        mass_properties.insert("weight_g".to_string(), 520.0);
        mass_properties.insert("volume_mm3".to_string(), 192_000.0);

        let mut feature_counts = BTreeMap::new();
        feature_counts.insert("extrudes".to_string(), 2);
        feature_counts.insert("cuts".to_string(), 4);
        feature_counts.insert("fillets".to_string(), 8);

        CadSnapshot {
            design_parameters,
            mass_properties,
            document_properties: DocumentSettings {
                unit_system: "IPS".to_string(),
                tolerance_standard: "ISO".to_string(),
                image_quality: "High".to_string(),
            },
            feature_counts,
            fea_summary: None,
        }
    }
}

/// Structured requirements captured upstream of CAD work.
///
/// The analysis pipeline treats the section maps as opaque context: they are
/// echoed into reasoning prompts but never interpreted by the rule engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignIntent {
    /// Stable identifier for the design this intent describes.
    pub design_id: String,
    /// Intent revision, e.g. "1.0".
    pub version: String,
    /// Part family, e.g. "drone_arm" or "bracket".
    pub part_class: String,
    #[serde(default)]
    pub functional_requirements: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub constraints: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub interfaces: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub design_parameters: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub acceptance_criteria: BTreeMap<String, serde_json::Value>,
}

impl DesignIntent {
    /// Fresh intent with a generated design id and empty sections.
    pub fn new(part_class: &str) -> Self {
        DesignIntent {
            design_id: uuid::Uuid::new_v4().to_string(),
            version: "1.0".to_string(),
            part_class: part_class.to_string(),
            ..Default::default()
        }
    }
}
