//! Nutrient lookup
//!
//! The external source of per-100g baselines and portion hints.

pub mod usda;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::FoodRecord;

pub use usda::UsdaClient;

/// Failure of the lookup call itself. "No match" is not an error.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("lookup service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid lookup URL: {0}")]
    InvalidUrl(String),
}

/// Source of nutrient data for a food query
#[async_trait]
pub trait NutrientLookup: Send + Sync {
    /// Best match for `query`, or `None` when nothing matches
    async fn find(&self, query: &str) -> Result<Option<FoodRecord>, LookupError>;
}
