//! Tally aggregation
//!
//! Runs parse, lookup, mass resolution and scaling for each item in input
//! order. A failing item is recorded in place and never stops its siblings.
//! Totals are summed from the rounded per-item values.

use serde::Serialize;
use thiserror::Error;

use crate::lookup::{LookupError, NutrientLookup};
use crate::models::{FoodRecord, RoundedNutrition, ScaledResult};

use super::converter::resolve_mass;
use super::parser::{parse_item, split_items, ParseError, ParsedItem};

/// Running sum of resolved items
pub type Totals = RoundedNutrition;

/// Largest gram amount accepted for a single item (1000 tonnes)
pub const MAX_ITEM_GRAMS: f64 = 1e9;

/// Per-item failure
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("{grams}g is more than the {max}g allowed for one item", max = MAX_ITEM_GRAMS)]
    MassTooLarge { grams: f64 },
}

/// Result for one input segment
#[derive(Debug)]
pub enum ItemOutcome {
    Resolved(ScaledResult),
    /// The lookup had no match for the food name
    NotFound { query: String },
    Failed { input: String, error: ItemError },
}

impl ItemOutcome {
    pub fn as_resolved(&self) -> Option<&ScaledResult> {
        match self {
            ItemOutcome::Resolved(result) => Some(result),
            _ => None,
        }
    }
}

/// Outcome of a whole run
#[derive(Debug, Default)]
pub struct Tally {
    pub items: Vec<ItemOutcome>,
    sum: Totals,
    resolved: usize,
}

impl Tally {
    fn push(&mut self, outcome: ItemOutcome) {
        if let ItemOutcome::Resolved(result) = &outcome {
            self.sum += result.nutrition;
            self.resolved += 1;
        }
        self.items.push(outcome);
    }

    /// Number of items that resolved to nutrition values
    pub fn resolved_count(&self) -> usize {
        self.resolved
    }

    /// Totals, present only when more than one item resolved
    pub fn totals(&self) -> Option<Totals> {
        (self.resolved > 1).then_some(self.sum)
    }
}

/// JSON shape of a tally item
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemSummary<'a> {
    Resolved(&'a ScaledResult),
    NotFound { query: &'a str },
    Error { input: &'a str, message: String },
}

impl<'a> From<&'a ItemOutcome> for ItemSummary<'a> {
    fn from(outcome: &'a ItemOutcome) -> Self {
        match outcome {
            ItemOutcome::Resolved(result) => ItemSummary::Resolved(result),
            ItemOutcome::NotFound { query } => ItemSummary::NotFound { query },
            ItemOutcome::Failed { input, error } => ItemSummary::Error {
                input,
                message: error.to_string(),
            },
        }
    }
}

/// Scale a matched record to the parsed quantity
pub fn scale_record(
    item: &ParsedItem,
    record: FoodRecord,
    default_grams: f64,
) -> Result<ScaledResult, ItemError> {
    let mass = resolve_mass(item.quantity, &item.unit, &record.portions, default_grams);
    if mass.grams.is_nan() || mass.grams > MAX_ITEM_GRAMS {
        return Err(ItemError::MassTooLarge { grams: mass.grams });
    }

    Ok(ScaledResult {
        nutrition: record.baseline.per_100g.scale_to_grams(mass.grams),
        name: record.baseline.display_name,
        grams: mass.grams,
        mass_source: mass.source,
    })
}

async fn resolve_segment<L>(segment: &str, lookup: &L, default_grams: f64) -> ItemOutcome
where
    L: NutrientLookup + ?Sized,
{
    let item = match parse_item(segment) {
        Ok(item) => item,
        Err(error) => {
            tracing::debug!(segment, %error, "could not parse item");
            return ItemOutcome::Failed {
                input: segment.to_string(),
                error: error.into(),
            };
        }
    };

    match lookup.find(&item.food_name).await {
        Ok(Some(record)) => match scale_record(&item, record, default_grams) {
            Ok(result) => ItemOutcome::Resolved(result),
            Err(error) => ItemOutcome::Failed {
                input: segment.to_string(),
                error,
            },
        },
        Ok(None) => ItemOutcome::NotFound {
            query: item.food_name,
        },
        Err(error) => {
            tracing::warn!(query = %item.food_name, %error, "lookup failed");
            ItemOutcome::Failed {
                input: segment.to_string(),
                error: error.into(),
            }
        }
    }
}

/// Resolve each segment in order, one lookup at a time
pub async fn tally_segments<L, S>(segments: &[S], lookup: &L, default_grams: f64) -> Tally
where
    L: NutrientLookup + ?Sized,
    S: AsRef<str>,
{
    let mut tally = Tally::default();
    for segment in segments {
        let outcome = resolve_segment(segment.as_ref(), lookup, default_grams).await;
        tally.push(outcome);
    }
    tally
}

/// Split comma-separated input and tally it
pub async fn tally<L>(input: &str, lookup: &L, default_grams: f64) -> Tally
where
    L: NutrientLookup + ?Sized,
{
    tally_segments(&split_items(input), lookup, default_grams).await
}
