//! Nutrition calculation module
//!
//! Parsing, unit conversion, scaling and aggregation of food items.

pub mod aggregator;
pub mod converter;
pub mod parser;
pub mod units;

pub use aggregator::{
    scale_record, tally, tally_segments, ItemError, ItemOutcome, Tally, Totals, MAX_ITEM_GRAMS,
};
pub use converter::{match_portion, resolve_mass, ResolvedMass};
pub use parser::{parse_item, split_items, ParseError, ParsedItem, UnitSpec};
pub use units::{grams_per_unit, lookup_unit, UnitDef, UNIT_TABLE};
