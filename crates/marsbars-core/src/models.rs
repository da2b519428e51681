//! Domain models for Mars Bars

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Material types offered by the analysis form
pub const MATERIAL_TYPES: &[&str] = &[
    "Aluminum",
    "Polymer Composites",
    "Foam Packaging",
    "Fabrics",
    "EVA Waste",
    "Plastics (PET)",
    "Plastics (HDPE)",
    "Plastics (PP)",
    "Glass Fiber",
    "Carbon Fiber",
    "Food Waste",
    "Paper/Cardboard",
    "Electronics",
    "Metal Alloys",
];

/// Habitat areas waste can originate from
pub const SOURCE_CATEGORIES: &[&str] = &[
    "Residence Renovations",
    "Cosmic Celebrations",
    "Daring Discoveries",
    "Life Support Systems",
    "Research Equipment",
];

/// Largest batch, in kilograms, a single analysis accepts
///
/// Keeps every derived figure (energy, water, hours) finite.
pub const MAX_TOTAL_QUANTITY_KG: f64 = 1.0e9;

/// One user-specified batch of waste submitted for analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteEntry {
    /// Opaque client-generated token
    #[serde(default)]
    pub id: String,
    pub material_type: String,
    /// Kilograms
    pub quantity: f64,
    pub source_category: String,
    /// Free-text notes about the material's condition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Contamination percentage (0-100)
    #[serde(
        default,
        deserialize_with = "deserialize_percent",
        skip_serializing_if = "Option::is_none"
    )]
    pub contamination: Option<f64>,
    /// Carried through for export, never used in analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moisture_level: Option<String>,
}

impl WasteEntry {
    pub fn new(
        id: impl Into<String>,
        material_type: impl Into<String>,
        quantity: f64,
        source_category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            material_type: material_type.into(),
            quantity,
            source_category: source_category.into(),
            description: None,
            contamination: None,
            moisture_level: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_contamination(mut self, percent: f64) -> Self {
        self.contamination = Some(percent);
        self
    }

    /// Whether the material type is one of the form's known options
    pub fn is_known_material(&self) -> bool {
        MATERIAL_TYPES.contains(&self.material_type.as_str())
    }

    /// Whether the source category is one of the form's known options
    pub fn is_known_source(&self) -> bool {
        SOURCE_CATEGORIES.contains(&self.source_category.as_str())
    }
}

/// Accept contamination as a number, a numeric string, or an empty string
///
/// The web form submits text fields, so `"12"` and `""` both show up.
fn deserialize_percent<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Percent {
        Number(f64),
        Text(String),
    }

    match Option::<Percent>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Percent::Number(n)) => Ok(Some(n)),
        Some(Percent::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Percent::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid contamination value: {}", s))),
    }
}

/// Sum of all entry quantities in kilograms
pub fn total_quantity(entries: &[WasteEntry]) -> f64 {
    entries.iter().map(|e| e.quantity).sum()
}

/// Check that an entry list can be submitted for analysis
///
/// Mirrors the form rules: at least one entry, every entry has a material
/// type and a positive quantity. Unknown material or source names are
/// accepted and only logged.
pub fn validate_entries(entries: &[WasteEntry]) -> Result<()> {
    if entries.is_empty() {
        return Err(Error::InvalidEntries("at least one waste entry is required".into()));
    }

    for (i, entry) in entries.iter().enumerate() {
        if entry.material_type.trim().is_empty() {
            return Err(Error::InvalidEntries(format!(
                "entry {} is missing a material type",
                i + 1
            )));
        }
        if !entry.quantity.is_finite() || entry.quantity <= 0.0 {
            return Err(Error::InvalidEntries(format!(
                "entry {} ({}) must have a quantity greater than zero",
                i + 1,
                entry.material_type
            )));
        }
        if let Some(c) = entry.contamination {
            if !(0.0..=100.0).contains(&c) {
                return Err(Error::InvalidEntries(format!(
                    "entry {} ({}) contamination must be between 0 and 100",
                    i + 1,
                    entry.material_type
                )));
            }
        }
        if !entry.is_known_material() {
            tracing::debug!(material = %entry.material_type, "Unlisted material type");
        }
        if !entry.is_known_source() {
            tracing::debug!(source = %entry.source_category, "Unlisted source category");
        }
    }

    let total = total_quantity(entries);
    if !total.is_finite() || total > MAX_TOTAL_QUANTITY_KG {
        return Err(Error::InvalidEntries(format!(
            "total quantity {} kg exceeds the {} kg limit per analysis",
            total, MAX_TOTAL_QUANTITY_KG
        )));
    }

    Ok(())
}

/// A product recovered from the recycling process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecyclingOutput {
    pub product_type: String,
    pub quantity: f64,
    /// "kg" or "units"
    pub unit: String,
    #[serde(default)]
    pub suggested_uses: Vec<String>,
}

/// Resources consumed by processing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUsage {
    /// kWh
    pub energy: f64,
    /// Liters
    pub water: f64,
    /// Hours
    pub processing_time: f64,
}

/// Structured recycling report shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecyclingResult {
    pub outputs: Vec<RecyclingOutput>,
    pub resource_usage: ResourceUsage,
    pub benefits: Vec<String>,
    pub drawbacks: Vec<String>,
    /// 0-100
    pub efficiency: f64,
    /// 0-100
    pub sustainability: f64,
}

impl RecyclingResult {
    /// Clamp scores to 0-100 and quantities to be non-negative
    ///
    /// Model replies are free-form, so numbers outside the displayable
    /// ranges are pulled back in rather than rejected.
    pub fn normalized(mut self) -> Self {
        self.efficiency = clamp_score(self.efficiency);
        self.sustainability = clamp_score(self.sustainability);
        for output in &mut self.outputs {
            output.quantity = non_negative(output.quantity);
        }
        self.resource_usage.energy = non_negative(self.resource_usage.energy);
        self.resource_usage.water = non_negative(self.resource_usage.water);
        self.resource_usage.processing_time = non_negative(self.resource_usage.processing_time);
        self
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Which path produced an analysis result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    /// Returned from the session cache without a network call
    Cache,
    /// Parsed from the chat-completion model's reply
    Model,
    /// Produced by the deterministic fallback generator
    Fallback,
}

impl ResultSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Model => "model",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for ResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
