//! Mass resolution
//!
//! Converts a parsed quantity and unit into grams. Table units convert
//! exactly; other units are matched against the food's portion hints and
//! finally fall back to a default weight per unit. Resolution never fails.

use crate::models::{MassSource, PortionHint};

use super::parser::UnitSpec;

/// Gram amount for an item and how it was obtained
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMass {
    pub grams: f64,
    pub source: MassSource,
}

/// Convert `quantity` of `unit` to grams.
///
/// `portions` are consulted only for opaque units, in source order; the first
/// hint whose description contains `"1 <unit>"` or equals `<unit>` wins.
/// Unmatched and implicit units use `default_grams` per unit of quantity.
pub fn resolve_mass(
    quantity: f64,
    unit: &UnitSpec,
    portions: &[PortionHint],
    default_grams: f64,
) -> ResolvedMass {
    match unit {
        UnitSpec::Table(def) => ResolvedMass {
            grams: quantity * def.grams,
            source: MassSource::Table,
        },
        UnitSpec::Implicit => ResolvedMass {
            grams: quantity * default_grams,
            source: MassSource::Default,
        },
        UnitSpec::Opaque(token) => match match_portion(token, portions) {
            Some(hint) => ResolvedMass {
                grams: quantity * hint.gram_weight,
                source: MassSource::Portion,
            },
            None => {
                tracing::warn!(
                    "No portion matches '{}'. Treating {} {} as {}g each.",
                    token,
                    quantity,
                    token,
                    default_grams
                );
                ResolvedMass {
                    grams: quantity * default_grams,
                    source: MassSource::Default,
                }
            }
        },
    }
}

/// Find the first portion hint describing one `unit`
pub fn match_portion<'a>(unit: &str, portions: &'a [PortionHint]) -> Option<&'a PortionHint> {
    let candidates = unit_spellings(unit);
    if candidates.is_empty() {
        return None;
    }

    portions.iter().find(|hint| {
        let description = hint.description.trim().to_lowercase();
        hint.gram_weight > 0.0
            && candidates
                .iter()
                .any(|candidate| description == *candidate || mentions_one(&description, candidate))
    })
}

/// Whether `description` contains "1 <unit>" as whole words, so "1 slice"
/// matches "1 slice, thin" but not "11 slices" or "1 slicer"
fn mentions_one(description: &str, unit: &str) -> bool {
    let needle = format!("1 {unit}");
    description.match_indices(&needle).any(|(start, _)| {
        let before = description[..start].chars().next_back();
        let after = description[start + needle.len()..].chars().next();
        !before.map_or(false, |c| c.is_ascii_digit() || c == '.' || c == '/')
            && !after.map_or(false, char::is_alphanumeric)
    })
}

/// The unit as written plus its singular form ("slices" -> "slice",
/// "boxes" -> "box")
fn unit_spellings(unit: &str) -> Vec<String> {
    let lower = unit.trim().to_lowercase();
    if lower.is_empty() {
        return Vec::new();
    }

    let singular = singular_form(&lower);
    let mut spellings = vec![lower];
    spellings.extend(singular);
    spellings
}

fn singular_form(word: &str) -> Option<String> {
    // "-es" is only a plural ending after a sibilant
    if let Some(stem) = word.strip_suffix("es") {
        if ["s", "x", "z", "ch", "sh"].iter().any(|end| stem.ends_with(end)) {
            return Some(stem.to_string());
        }
    }
    let stem = word.strip_suffix('s')?;
    if stem.is_empty() || stem.ends_with('s') {
        return None;
    }
    Some(stem.to_string())
}
