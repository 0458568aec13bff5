//! Per-item result of the tally pipeline

use serde::Serialize;

use super::RoundedNutrition;

/// Where an item's gram amount came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MassSource {
    /// Fixed unit table factor
    Table,
    /// Food-specific portion hint from the lookup
    Portion,
    /// Default grams per unit
    Default,
}

/// A resolved food item, scaled to its gram amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledResult {
    pub name: String,
    pub grams: f64,
    pub mass_source: MassSource,
    #[serde(flatten)]
    pub nutrition: RoundedNutrition,
}
