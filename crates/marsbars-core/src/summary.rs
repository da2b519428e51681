//! Report summary figures
//!
//! Aggregates behind the results view: how much waste came from each
//! material and source, what the outputs add up to, and a rating band for
//! the two scores.

use serde::Serialize;

use crate::models::{RecyclingResult, WasteEntry};

/// Rating band for an efficiency or sustainability score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreRating {
    /// 90 and above
    Excellent,
    /// 70 up to 90
    Good,
    /// Below 70
    Poor,
}

impl ScoreRating {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Excellent
        } else if score >= 70.0 {
            Self::Good
        } else {
            Self::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Poor => "poor",
        }
    }
}

/// A labelled quantity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantityShare {
    pub label: String,
    pub quantity: f64,
}

/// Figures derived from a batch and its result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// First-seen order
    pub by_material: Vec<QuantityShare>,
    /// First-seen order
    pub by_source: Vec<QuantityShare>,
    pub outputs: Vec<QuantityShare>,
    pub efficiency_rating: ScoreRating,
    pub sustainability_rating: ScoreRating,
}

impl ReportSummary {
    pub fn build(entries: &[WasteEntry], result: &RecyclingResult) -> Self {
        Self {
            by_material: group(entries.iter().map(|e| (e.material_type.as_str(), e.quantity))),
            by_source: group(entries.iter().map(|e| (e.source_category.as_str(), e.quantity))),
            outputs: result
                .outputs
                .iter()
                .map(|o| QuantityShare {
                    label: format!("{} ({})", o.product_type, o.unit),
                    quantity: o.quantity,
                })
                .collect(),
            efficiency_rating: ScoreRating::from_score(result.efficiency),
            sustainability_rating: ScoreRating::from_score(result.sustainability),
        }
    }
}

fn group<'a>(items: impl Iterator<Item = (&'a str, f64)>) -> Vec<QuantityShare> {
    let mut shares: Vec<QuantityShare> = Vec::new();
    for (label, quantity) in items {
        match shares.iter_mut().find(|s| s.label == label) {
            Some(share) => share.quantity += quantity,
            None => shares.push(QuantityShare {
                label: label.to_string(),
                quantity,
            }),
        }
    }
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::generate_fallback;
    use crate::models::total_quantity;

    #[test]
    fn test_grouping_keeps_first_seen_order() {
        let entries = vec![
            WasteEntry::new("1", "Fabrics", 2.0, "Cosmic Celebrations"),
            WasteEntry::new("2", "Aluminum", 5.0, "Research Equipment"),
            WasteEntry::new("3", "Fabrics", 1.5, "Research Equipment"),
        ];
        let result = generate_fallback(total_quantity(&entries), &entries);
        let summary = ReportSummary::build(&entries, &result);

        assert_eq!(summary.by_material.len(), 2);
        assert_eq!(summary.by_material[0].label, "Fabrics");
        assert_eq!(summary.by_material[0].quantity, 3.5);
        assert_eq!(summary.by_source[0].label, "Cosmic Celebrations");
        assert_eq!(summary.by_source[1].quantity, 6.5);
        assert_eq!(summary.outputs.len(), 3);
        assert!(summary.outputs[1].label.ends_with("(units)"));
    }

    #[test]
    fn test_score_rating_bands() {
        assert_eq!(ScoreRating::from_score(95.0), ScoreRating::Excellent);
        assert_eq!(ScoreRating::from_score(90.0), ScoreRating::Excellent);
        assert_eq!(ScoreRating::from_score(89.9), ScoreRating::Good);
        assert_eq!(ScoreRating::from_score(70.0), ScoreRating::Good);
        assert_eq!(ScoreRating::from_score(12.0), ScoreRating::Poor);
    }
}
