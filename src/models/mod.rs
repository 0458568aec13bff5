//! Data models
//!
//! Values passed between the lookup, the scaler and the report.

mod food;
mod nutrition;
mod scaled;

pub use food::{FoodRecord, NutrientBaseline, PortionHint};
pub use nutrition::{NutrientKind, Nutrition, RoundedNutrition};
pub use scaled::{MassSource, ScaledResult};
