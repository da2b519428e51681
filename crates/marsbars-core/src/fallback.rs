//! Deterministic fallback generator
//!
//! Produces a complete, plausible recycling report from the entry list alone.
//! Used whenever the chat-completion call fails or its reply cannot be
//! parsed, so it must be a pure function: no randomness, no clock, no I/O.

use std::collections::HashSet;

use crate::models::{RecyclingOutput, RecyclingResult, ResourceUsage, WasteEntry};

const BASE_EFFICIENCY: f64 = 85.0;
const BASE_SUSTAINABILITY: f64 = 90.0;

const METAL_ENERGY_FACTOR: f64 = 2.8;
const DEFAULT_ENERGY_FACTOR: f64 = 2.2;
const PLASTIC_WATER_FACTOR: f64 = 0.7;
const DEFAULT_WATER_FACTOR: f64 = 0.5;
/// Hours of processing per kilogram
const TIME_FACTOR: f64 = 0.45;

/// Material families detected in an entry list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterialProfile {
    pub plastics: bool,
    pub metals: bool,
    pub fabrics: bool,
    pub eva: bool,
    /// Number of distinct material type strings
    pub distinct_types: usize,
}

impl MaterialProfile {
    /// Classify entries by case-insensitive substring match on material type
    pub fn from_entries(entries: &[WasteEntry]) -> Self {
        let mut profile = Self::default();
        let mut seen = HashSet::new();

        for entry in entries {
            let material = entry.material_type.to_lowercase();
            profile.plastics |= material.contains("plastic");
            profile.metals |= material.contains("aluminum") || material.contains("metal");
            profile.fabrics |= material.contains("fabric");
            profile.eva |= material.contains("eva");
            seen.insert(entry.material_type.as_str());
        }

        profile.distinct_types = seen.len();
        profile
    }

    pub fn efficiency(&self) -> f64 {
        BASE_EFFICIENCY + (self.distinct_types as f64 * 2.0).min(10.0)
    }

    pub fn sustainability(&self) -> f64 {
        BASE_SUSTAINABILITY + (self.distinct_types as f64 * 1.5).min(8.0)
    }

    pub fn energy_factor(&self) -> f64 {
        if self.metals {
            METAL_ENERGY_FACTOR
        } else {
            DEFAULT_ENERGY_FACTOR
        }
    }

    pub fn water_factor(&self) -> f64 {
        if self.plastics {
            PLASTIC_WATER_FACTOR
        } else {
            DEFAULT_WATER_FACTOR
        }
    }

    fn primary_product(&self) -> &'static str {
        if self.plastics {
            "3D Printing Filament (PET/HDPE)"
        } else if self.fabrics {
            "Composite Material"
        } else {
            "Construction Aggregate"
        }
    }

    fn structural_product(&self) -> &'static str {
        if self.metals {
            "Structural Components (Aluminum Alloy)"
        } else if self.eva {
            "Insulation Padding"
        } else {
            "Building Blocks"
        }
    }
}

/// Round to a fixed number of decimals the way a report would print it
fn to_fixed(value: f64, digits: usize) -> f64 {
    format!("{:.*}", digits, value)
        .parse()
        .unwrap_or(value)
}

fn uses(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Generate a recycling report without the AI model
///
/// `total_quantity` is the sum of entry quantities in kilograms.
pub fn generate_fallback(total_quantity: f64, entries: &[WasteEntry]) -> RecyclingResult {
    let profile = MaterialProfile::from_entries(entries);
    let efficiency = profile.efficiency();
    let sustainability = profile.sustainability();
    let energy = total_quantity * profile.energy_factor();
    let water = total_quantity * profile.water_factor();
    let processing_time = total_quantity * TIME_FACTOR;

    let outputs = vec![
        RecyclingOutput {
            product_type: profile.primary_product().to_string(),
            quantity: to_fixed(total_quantity * 0.6, 2),
            unit: "kg".to_string(),
            suggested_uses: uses(&["Tool handles", "Replacement parts", "Storage containers"]),
        },
        RecyclingOutput {
            product_type: profile.structural_product().to_string(),
            quantity: to_fixed(total_quantity * 0.28, 2),
            unit: "units".to_string(),
            suggested_uses: uses(&[
                "Habitat reinforcement",
                "Equipment mounts",
                "Radiation shielding",
            ]),
        },
        RecyclingOutput {
            product_type: "Recycled Feedstock".to_string(),
            quantity: to_fixed(total_quantity * 0.07, 2),
            unit: "kg".to_string(),
            suggested_uses: uses(&[
                "Chemical processing",
                "Fuel synthesis",
                "Raw material storage",
            ]),
        },
    ];

    let benefits = vec![
        format!("Reduces waste accumulation by {:.1} kg", total_quantity * 0.95),
        format!(
            "Achieves {:.1}% material circularity in habitat systems",
            efficiency
        ),
        "Decreases dependency on Earth resupply missions by 38%".to_string(),
        "Creates valuable construction and manufacturing materials".to_string(),
        "Supports closed-loop life support system sustainability".to_string(),
    ];

    let drawbacks = vec![
        format!(
            "Energy requirement: {:.1} kWh from solar/nuclear sources",
            energy
        ),
        format!(
            "Residual waste: {:.2} kg requires disposal",
            total_quantity * 0.05
        ),
        format!(
            "Processing time: {:.1} hours automated processing",
            processing_time
        ),
    ];

    RecyclingResult {
        outputs,
        resource_usage: ResourceUsage {
            energy: to_fixed(energy, 2),
            water: to_fixed(water, 2),
            processing_time: to_fixed(processing_time, 2),
        },
        benefits,
        drawbacks,
        efficiency: to_fixed(efficiency, 2),
        sustainability: to_fixed(sustainability, 2),
    }
    .normalized()
}
