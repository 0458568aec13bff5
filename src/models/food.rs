//! Food records returned by a nutrient lookup

use serde::{Deserialize, Serialize};

use super::Nutrition;

/// Per-100g nutrient values for a matched food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientBaseline {
    pub display_name: String,
    pub per_100g: Nutrition,
}

/// Food-specific weight of a non-mass unit, e.g. "1 slice" = 28g
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortionHint {
    pub description: String,
    pub gram_weight: f64,
}

impl PortionHint {
    pub fn new(description: impl Into<String>, gram_weight: f64) -> Self {
        Self {
            description: description.into(),
            gram_weight,
        }
    }
}

/// Best match for a food query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub baseline: NutrientBaseline,
    /// Portion hints in source order
    #[serde(default)]
    pub portions: Vec<PortionHint>,
}

impl FoodRecord {
    pub fn new(display_name: impl Into<String>, per_100g: Nutrition) -> Self {
        Self {
            baseline: NutrientBaseline {
                display_name: display_name.into(),
                per_100g,
            },
            portions: Vec::new(),
        }
    }

    pub fn with_portion(mut self, description: impl Into<String>, gram_weight: f64) -> Self {
        self.portions.push(PortionHint::new(description, gram_weight));
        self
    }

    pub fn display_name(&self) -> &str {
        &self.baseline.display_name
    }
}
