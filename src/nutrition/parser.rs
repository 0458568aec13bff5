//! Item parser
//!
//! Turns raw input such as `"1 lb ground beef, 500 eggs"` into one
//! [`ParsedItem`] per comma-separated segment.
//!
//! Grammar of a segment:
//!
//! ```text
//! segment  := quantity sep? unit? food | food
//! quantity := digits ("." digits)? | "." digits
//! ```
//!
//! A unit is only recognized when it is a unit table alias. Anything else
//! after the number stays in the food name and is kept as an opaque unit
//! token for portion matching.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::units::{lookup_unit, UnitDef};

static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(?P<qty>\d+(?:\.\d+)?|\.\d+)(?P<sep>\s*)(?P<rest>.*)$")
        .expect("quantity pattern is valid")
});

/// Reason a segment could not be parsed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("no food name given")]
    EmptyFoodName,

    #[error("quantity must be greater than zero (got {0})")]
    NonPositiveQuantity(f64),

    #[error("invalid quantity '{0}'")]
    InvalidQuantity(String),
}

/// The unit part of a parsed item
#[derive(Debug, Clone, PartialEq)]
pub enum UnitSpec {
    /// A unit table entry
    Table(&'static UnitDef),
    /// First token after the quantity, not in the unit table. Also part of
    /// the food name.
    Opaque(String),
    /// No quantity was written; the default portion applies
    Implicit,
}

impl UnitSpec {
    /// Unit as written for display, if any
    pub fn label(&self) -> Option<&str> {
        match self {
            UnitSpec::Table(def) => Some(def.canonical),
            UnitSpec::Opaque(token) => Some(token.as_str()),
            UnitSpec::Implicit => None,
        }
    }
}

/// One food item from the input
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedItem {
    pub quantity: f64,
    pub unit: UnitSpec,
    pub food_name: String,
}

/// Split raw input into item segments.
///
/// Commas are item boundaries; surrounding whitespace is trimmed and empty
/// segments are dropped.
pub fn split_items(input: &str) -> Vec<&str> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a single segment into quantity, unit and food name
pub fn parse_item(segment: &str) -> Result<ParsedItem, ParseError> {
    let segment = segment.trim();

    let Some(caps) = QUANTITY_RE.captures(segment) else {
        return bare_item(segment);
    };

    let qty_text = &caps["qty"];
    let tokens: Vec<&str> = caps["rest"].split_whitespace().collect();

    // "7up" is a name, "100g rice" is a quantity with a unit
    let glued = caps["sep"].is_empty() && !caps["rest"].is_empty();
    if glued && tokens.first().and_then(|t| lookup_unit(t)).is_none() {
        return bare_item(segment);
    }

    let quantity: f64 = qty_text
        .parse()
        .map_err(|_| ParseError::InvalidQuantity(qty_text.to_string()))?;
    if !quantity.is_finite() {
        return Err(ParseError::InvalidQuantity(qty_text.to_string()));
    }
    if quantity <= 0.0 {
        return Err(ParseError::NonPositiveQuantity(quantity));
    }

    let Some((first, remaining)) = tokens.split_first() else {
        return Err(ParseError::EmptyFoodName);
    };

    if let Some(def) = lookup_unit(first) {
        // "500 eggs": the unit doubles as the thing being counted
        let food_name = if remaining.is_empty() {
            first.to_string()
        } else {
            remaining.join(" ")
        };
        return Ok(ParsedItem {
            quantity,
            unit: UnitSpec::Table(def),
            food_name,
        });
    }

    Ok(ParsedItem {
        quantity,
        unit: UnitSpec::Opaque(first.to_lowercase()),
        food_name: tokens.join(" "),
    })
}

fn bare_item(segment: &str) -> Result<ParsedItem, ParseError> {
    let food_name = segment.split_whitespace().collect::<Vec<_>>().join(" ");
    if food_name.is_empty() {
        return Err(ParseError::EmptyFoodName);
    }
    Ok(ParsedItem {
        quantity: 1.0,
        unit: UnitSpec::Implicit,
        food_name,
    })
}
