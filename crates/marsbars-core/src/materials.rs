//! Catalog of specific material solutions
//!
//! A fixed table of real-world mission waste items, what each can be turned
//! into on Mars, and how sustainable that route is.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One input material and the product it becomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSolution {
    pub input_material: &'static str,
    pub input_description: &'static str,
    pub output_product: &'static str,
    pub output_description: &'static str,
    /// Percent
    pub sustainability: u8,
    pub rationale: &'static str,
    pub source: &'static str,
}

impl MaterialSolution {
    pub fn level(&self) -> SustainabilityLevel {
        match self.sustainability {
            80.. => SustainabilityLevel::High,
            60..=79 => SustainabilityLevel::Medium,
            _ => SustainabilityLevel::Low,
        }
    }

    fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [self.input_material, self.output_product, self.input_description]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Sustainability band filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SustainabilityLevel {
    #[default]
    All,
    /// 80% and above
    High,
    /// 60% up to 80%
    Medium,
    /// Below 60%
    Low,
}

impl SustainabilityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    fn admits(&self, solution: &MaterialSolution) -> bool {
        *self == Self::All || solution.level() == *self
    }
}

impl FromStr for SustainabilityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(Error::InvalidData(format!(
                "unknown sustainability level '{}' (expected all, high, medium or low)",
                other
            ))),
        }
    }
}

impl fmt::Display for SustainabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full catalog in display order
pub fn catalog() -> &'static [MaterialSolution] {
    CATALOG
}

/// Case-insensitive substring search over input material, output product
/// and input description, narrowed to a sustainability band
pub fn search(query: &str, level: SustainabilityLevel) -> Vec<&'static MaterialSolution> {
    CATALOG
        .iter()
        .filter(|m| m.matches_query(query) && level.admits(m))
        .collect()
}

const CATALOG: &[MaterialSolution] = &[
    MaterialSolution {
        input_material: "Uline Air Pillow Film",
        input_description: "Thin, lightweight packaging made of medium- to high-density polyethylene (MDPE/HDPE), designed to trap air in sealed pockets for protective cushioning.",
        output_product: "Insulation blankets",
        output_description: "Use trapped air chambers to provide lightweight thermal insulation and reduce conductive heat transfer in habitats.",
        sustainability: 88,
        rationale: "Reused with low-energy mechanical processing. Useful for habitat insulation on Mars.",
        source: "NASA Glenn Research Center, Advanced Materials for Space Structures (2020)",
    },
    MaterialSolution {
        input_material: "Aluminum Steam Table Pans",
        input_description: "Lightweight, disposable containers made from thin-gauge aluminum foil.",
        output_product: "Reflective heat shields",
        output_description: "Aluminum's high infrared reflectivity and thermal conductivity protects habitats and rovers by deflecting radiant heat.",
        sustainability: 92,
        rationale: "Aluminum re-melted with low loss.",
        source: "The Aluminum Association, Recycling Facts (2021)",
    },
    MaterialSolution {
        input_material: "Anti-static Bubble Bags",
        input_description: "Low-density polyethylene film embedded with antistatic agents for cushioning electronic components and dissipating static charges.",
        output_product: "Padded tool wraps",
        output_description: "Provide mechanical shock absorption and reduce electrostatic buildup protecting sensitive instruments.",
        sustainability: 75,
        rationale: "Reused LDPE bubble bags.",
        source: "EPA, Plastics Recycling Facts (2020)",
    },
    MaterialSolution {
        input_material: "Carbon Fiber Sheet + Epoxy Resin",
        input_description: "Composite of high-strength carbon fibers embedded in epoxy matrix, non-remeltable.",
        output_product: "Tool handles & repair patches",
        output_description: "Mechanically reshaped for repairs; strong adhesive bonding but requires handling safety precautions.",
        sustainability: 40,
        rationale: "Epoxy cannot be remelted; mechanical reuse only.",
        source: "ScienceDirect, Recycling of CFRP Composites (2022)",
    },
    MaterialSolution {
        input_material: "CEL Kynar Gas Sampling Bags",
        input_description: "Flexible polyvinylidene fluoride (PVDF) fluoropolymer bags with excellent gas barrier and chemical resistance.",
        output_product: "Flexible containment bladders",
        output_description: "Used for safe storage and transport of fluids or gases under variable conditions.",
        sustainability: 65,
        rationale: "PVDF durable; moderately recyclable.",
        source: "Arkema, PVDF Technical Recycling Data (2021)",
    },
    MaterialSolution {
        input_material: "Mixed Cotton Clothing",
        input_description: "Textile blend of natural cotton and synthetic polymers like polyester, durable and breathable.",
        output_product: "Patch kits",
        output_description: "Fabric reinforcements for clothing and equipment, extending their life.",
        sustainability: 85,
        rationale: "Cotton reused with low processing.",
        source: "Textile Recycling Association Report (2020)",
    },
    MaterialSolution {
        input_material: "Glenroy White Ready Seal 225",
        input_description: "Multi-layer flexible film with PET, LDPE, Surlyn sealant providing high barrier and sealing.",
        output_product: "Lightproof pouches",
        output_description: "Protect samples and food from light exposure and contamination.",
        sustainability: 60,
        rationale: "Multi-layer film reused, moderate sustainability.",
        source: "Flexible Packaging Association (2021)",
    },
    MaterialSolution {
        input_material: "Magid NOM10 White Hood",
        input_description: "Flame-resistant aramid Nomex fiber with thermal stability and high strength.",
        output_product: "Heat-shield patches & filter pre-covers",
        output_description: "Flame-resistant, thermally stable fabric patches and pre-filters protecting habitat and equipment.",
        sustainability: 78,
        rationale: "Durable, flame-resistant Nomex reused for protective patches.",
        source: "DuPont, Nomex Technical Guide (2020)",
    },
    MaterialSolution {
        input_material: "Nitrile Gloves",
        input_description: "Disposable synthetic rubber gloves (NBR) with puncture and chemical resistance, hypoallergenic.",
        output_product: "3D-printable pallets/filaments",
        output_description: "Processed into 3D-printable feeds after devulcanization for extrusion-grade materials.",
        sustainability: 58,
        rationale: "Challenging to recycle but grindable to feedstock.",
        source: "Scientific Reports, Recycling Nitrile Gloves (2023)",
    },
    MaterialSolution {
        input_material: "Mixed Cotton Clothing (Thermal insulation)",
        input_description: "Cotton/polyester blend used for insulation panels and spacesuit layers.",
        output_product: "Thermal insulation panels & suits",
        output_description: "Panels and layers with high sustainability and insulation properties for Mars habitats.",
        sustainability: 85,
        rationale: "Highly sustainable insulation and spacesuit layers.",
        source: "Journal of Industrial Textiles, Cotton Fiber Recycling (2021)",
    },
    MaterialSolution {
        input_material: "Mixed Cotton Clothing (Biochar)",
        input_description: "Cotton textiles pyrolyzed in oxygen-limited conditions to produce biochar.",
        output_product: "Biochar",
        output_description: "Biochar used for filtration and soil amendment applications on Mars.",
        sustainability: 80,
        rationale: "Pyrolyzed cotton transforms waste into useful biochar for soil and filtration.",
        source: "Scientific Reports, Biochar from Textile Waste (2022)",
    },
    MaterialSolution {
        input_material: "Zotefoams Plastazote LD45FR",
        input_description: "Flame-retardant, closed-cell polyethylene foam with shock absorption and insulation.",
        output_product: "Thermal insulation panels",
        output_description: "Lightweight fire-retardant panels used to insulate walls and spacesuits.",
        sustainability: 86,
        rationale: "Mechanically repurposed polyethylene foam for insulation.",
        source: "Zotefoams, Recycling and Technical Data (2020)",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_size() {
        assert_eq!(catalog().len(), 12);
    }

    #[test]
    fn test_empty_query_all_levels() {
        assert_eq!(search("", SustainabilityLevel::All).len(), 12);
        assert_eq!(search("", SustainabilityLevel::High).len(), 6);
        assert_eq!(search("", SustainabilityLevel::Medium).len(), 4);
        assert_eq!(search("", SustainabilityLevel::Low).len(), 2);
    }

    #[test]
    fn test_band_boundaries() {
        let biochar = search("biochar", SustainabilityLevel::All);
        assert_eq!(biochar.len(), 1);
        assert_eq!(biochar[0].level(), SustainabilityLevel::High);

        let pouches = search("lightproof", SustainabilityLevel::All);
        assert_eq!(pouches[0].sustainability, 60);
        assert_eq!(pouches[0].level(), SustainabilityLevel::Medium);
    }

    #[test]
    fn test_query_matches_description_case_insensitively() {
        let hits = search("POLYETHYLENE", SustainabilityLevel::All);
        let names: Vec<_> = hits.iter().map(|m| m.input_material).collect();
        assert!(names.contains(&"Uline Air Pillow Film"));
        assert!(names.contains(&"Zotefoams Plastazote LD45FR"));
    }

    #[test]
    fn test_query_and_level_combine() {
        let hits = search("cotton", SustainabilityLevel::High);
        assert_eq!(hits.len(), 3);
        assert!(search("cotton", SustainabilityLevel::Low).is_empty());
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("HIGH".parse::<SustainabilityLevel>().unwrap(), SustainabilityLevel::High);
        assert_eq!("".parse::<SustainabilityLevel>().unwrap(), SustainabilityLevel::All);
        assert!("extreme".parse::<SustainabilityLevel>().is_err());
    }
}
