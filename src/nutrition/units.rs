//! Unit table and conversion constants
//!
//! Maps every accepted unit spelling to a gram-equivalent factor. Volume units
//! are water-equivalent (1 ml = 1 g); there is no per-food density.

// ============================================================================
// Weight Conversion Constants (to grams)
// ============================================================================

/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Grams per pound
pub const G_PER_LB: f64 = 453.592;

// ============================================================================
// Volume Conversion Constants (to milliliters, taken as grams of water)
// ============================================================================

/// Milliliters per teaspoon
pub const ML_PER_TSP: f64 = 4.92892;
/// Milliliters per tablespoon
pub const ML_PER_TBSP: f64 = 14.7868;
/// Milliliters per fluid ounce
pub const ML_PER_FL_OZ: f64 = 29.5735;
/// Milliliters per cup (US)
pub const ML_PER_CUP: f64 = 236.588;
/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;

// ============================================================================
// Count Units
// ============================================================================

/// Grams per large egg
pub const G_PER_EGG: f64 = 50.0;

/// One row of the unit table
#[derive(Debug, PartialEq)]
pub struct UnitDef {
    /// Canonical spelling, also the first alias
    pub canonical: &'static str,
    /// Lowercase spellings that resolve to this unit
    pub aliases: &'static [&'static str],
    /// Grams per one of this unit
    pub grams: f64,
}

/// The process-wide unit table
pub static UNIT_TABLE: &[UnitDef] = &[
    UnitDef {
        canonical: "g",
        aliases: &["g", "gram", "grams", "gr"],
        grams: 1.0,
    },
    UnitDef {
        canonical: "mg",
        aliases: &["mg", "milligram", "milligrams"],
        grams: G_PER_MG,
    },
    UnitDef {
        canonical: "kg",
        aliases: &["kg", "kilogram", "kilograms", "kilo", "kilos"],
        grams: G_PER_KG,
    },
    UnitDef {
        canonical: "oz",
        aliases: &["oz", "ounce", "ounces"],
        grams: G_PER_OZ,
    },
    UnitDef {
        canonical: "lb",
        aliases: &["lb", "lbs", "pound", "pounds"],
        grams: G_PER_LB,
    },
    UnitDef {
        canonical: "ml",
        aliases: &["ml", "milliliter", "milliliters", "millilitre", "millilitres"],
        grams: 1.0,
    },
    UnitDef {
        canonical: "l",
        aliases: &["l", "liter", "liters", "litre", "litres"],
        grams: ML_PER_LITER,
    },
    UnitDef {
        canonical: "tsp",
        aliases: &["tsp", "teaspoon", "teaspoons"],
        grams: ML_PER_TSP,
    },
    UnitDef {
        canonical: "tbsp",
        aliases: &["tbsp", "tablespoon", "tablespoons"],
        grams: ML_PER_TBSP,
    },
    UnitDef {
        canonical: "floz",
        aliases: &["floz", "fl.oz"],
        grams: ML_PER_FL_OZ,
    },
    UnitDef {
        canonical: "cup",
        aliases: &["cup", "cups"],
        grams: ML_PER_CUP,
    },
    UnitDef {
        canonical: "egg",
        aliases: &["egg", "eggs"],
        grams: G_PER_EGG,
    },
];

/// Find the table entry for a unit spelling (case-insensitive)
pub fn lookup_unit(unit: &str) -> Option<&'static UnitDef> {
    let lower = unit.trim().to_lowercase();
    UNIT_TABLE
        .iter()
        .find(|def| def.aliases.contains(&lower.as_str()))
}

/// Get the conversion factor to grams for a table unit
pub fn grams_per_unit(unit: &str) -> Option<f64> {
    lookup_unit(unit).map(|def| def.grams)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_units() {
        assert_eq!(grams_per_unit("g"), Some(1.0));
        assert_eq!(grams_per_unit("oz"), Some(G_PER_OZ));
        assert_eq!(grams_per_unit("lb"), Some(G_PER_LB));
        assert_eq!(grams_per_unit("kg"), Some(G_PER_KG));
    }

    #[test]
    fn test_volume_units_are_water_equivalent() {
        assert_eq!(grams_per_unit("ml"), Some(1.0));
        assert_eq!(grams_per_unit("cup"), Some(ML_PER_CUP));
        assert_eq!(grams_per_unit("tbsp"), Some(ML_PER_TBSP));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(grams_per_unit("LB"), Some(G_PER_LB));
        assert_eq!(grams_per_unit(" Cups "), Some(ML_PER_CUP));
        assert_eq!(lookup_unit("Eggs").map(|def| def.canonical), Some("egg"));
    }

    #[test]
    fn test_unknown_units() {
        assert_eq!(grams_per_unit("slice"), None);
        assert_eq!(grams_per_unit("scoop"), None);
        assert_eq!(grams_per_unit(""), None);
    }

    #[test]
    fn test_aliases_resolve_to_canonical_factor() {
        for def in UNIT_TABLE {
            assert_eq!(def.aliases[0], def.canonical);
            assert!(def.grams > 0.0);
            for alias in def.aliases {
                assert_eq!(grams_per_unit(alias), grams_per_unit(def.canonical));
                assert_eq!(lookup_unit(alias).map(|def| def.canonical), Some(def.canonical));
            }
        }
    }

    #[test]
    fn test_aliases_are_unique_and_lowercase() {
        let mut seen = std::collections::HashSet::new();
        for def in UNIT_TABLE {
            for alias in def.aliases {
                assert_eq!(*alias, alias.to_lowercase());
                assert!(seen.insert(*alias), "duplicate alias {alias}");
            }
        }
    }
}
