//! Shared nutrition data structures
//!
//! Per-100g baselines, rounded per-item values and running totals.

use serde::{Deserialize, Serialize};

/// Macronutrients tracked by the tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientKind {
    /// Food energy in kcal
    Energy,
    Protein,
    Carbohydrate,
    Fat,
}

impl NutrientKind {
    pub const ALL: [NutrientKind; 4] = [
        NutrientKind::Energy,
        NutrientKind::Protein,
        NutrientKind::Carbohydrate,
        NutrientKind::Fat,
    ];
}

/// Nutritional values as reported by the lookup (per 100g for baselines)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64, // grams
    pub carbs: f64,   // grams
    pub fat: f64,     // grams
}

impl Nutrition {
    /// Create a new Nutrition with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: NutrientKind) -> f64 {
        match kind {
            NutrientKind::Energy => self.calories,
            NutrientKind::Protein => self.protein,
            NutrientKind::Carbohydrate => self.carbs,
            NutrientKind::Fat => self.fat,
        }
    }

    pub fn set(&mut self, kind: NutrientKind, value: f64) {
        match kind {
            NutrientKind::Energy => self.calories = value,
            NutrientKind::Protein => self.protein = value,
            NutrientKind::Carbohydrate => self.carbs = value,
            NutrientKind::Fat => self.fat = value,
        }
    }

    /// Scale nutrition values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fat: self.fat * multiplier,
        }
    }

    /// Scale a per-100g baseline to `grams` and round each field on its own.
    ///
    /// Fields are rounded half away from zero before anything is summed, so a
    /// total built from these values is the sum of what was displayed.
    pub fn scale_to_grams(&self, grams: f64) -> RoundedNutrition {
        let scaled = self.scale(grams / 100.0);
        RoundedNutrition {
            calories: round_field(scaled.calories),
            protein: round_field(scaled.protein),
            carbs: round_field(scaled.carbs),
            fat: round_field(scaled.fat),
        }
    }
}

// `as` saturates at the i64 bounds; NaN becomes 0
fn round_field(value: f64) -> i64 {
    value.round() as i64
}

/// Whole-unit nutrition values, as displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundedNutrition {
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

impl RoundedNutrition {
    pub fn get(&self, kind: NutrientKind) -> i64 {
        match kind {
            NutrientKind::Energy => self.calories,
            NutrientKind::Protein => self.protein,
            NutrientKind::Carbohydrate => self.carbs,
            NutrientKind::Fat => self.fat,
        }
    }
}

/// Field-wise sum, saturating at `i64::MAX` so a running total never wraps
impl std::ops::Add for RoundedNutrition {
    type Output = RoundedNutrition;

    fn add(self, other: RoundedNutrition) -> RoundedNutrition {
        RoundedNutrition {
            calories: self.calories.saturating_add(other.calories),
            protein: self.protein.saturating_add(other.protein),
            carbs: self.carbs.saturating_add(other.carbs),
            fat: self.fat.saturating_add(other.fat),
        }
    }
}

impl std::ops::AddAssign for RoundedNutrition {
    fn add_assign(&mut self, other: RoundedNutrition) {
        *self = *self + other;
    }
}

impl std::iter::Sum for RoundedNutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(RoundedNutrition::default(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground_beef() -> Nutrition {
        Nutrition {
            calories: 254.0,
            protein: 26.0,
            carbs: 0.0,
            fat: 20.0,
        }
    }

    #[test]
    fn test_scale_one_pound_ground_beef() {
        let scaled = ground_beef().scale_to_grams(453.592);
        assert_eq!(scaled.protein, 118);
        assert_eq!(scaled.carbs, 0);
        assert_eq!(scaled.fat, 91);
        assert_eq!(scaled.calories, 1152);
    }

    #[test]
    fn test_scale_500_eggs() {
        let eggs = Nutrition {
            calories: 143.0,
            protein: 13.0,
            carbs: 1.1,
            fat: 11.0,
        };
        let scaled = eggs.scale_to_grams(25000.0);
        assert_eq!(scaled.protein, 3250);
        assert_eq!(scaled.carbs, 275);
        assert_eq!(scaled.fat, 2750);
    }

    #[test]
    fn test_small_values_round_to_zero() {
        let apple = Nutrition {
            calories: 52.0,
            protein: 0.3,
            carbs: 14.0,
            fat: 0.2,
        };
        let scaled = apple.scale_to_grams(100.0);
        assert_eq!(scaled.protein, 0);
        assert_eq!(scaled.carbs, 14);
        assert_eq!(scaled.fat, 0);
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        let base = Nutrition {
            calories: 2.5,
            protein: 0.5,
            carbs: 1.5,
            fat: 0.49,
        };
        let scaled = base.scale_to_grams(100.0);
        assert_eq!(scaled.calories, 3);
        assert_eq!(scaled.protein, 1);
        assert_eq!(scaled.carbs, 2);
        assert_eq!(scaled.fat, 0);
    }

    #[test]
    fn test_scaling_is_monotonic() {
        let base = ground_beef();
        let mut previous = base.scale(0.0);
        for grams in [1.0, 10.0, 55.5, 100.0, 250.0, 1000.0] {
            let current = base.scale(grams / 100.0);
            for kind in NutrientKind::ALL {
                if base.get(kind) > 0.0 {
                    assert!(current.get(kind) > previous.get(kind));
                } else {
                    assert_eq!(current.get(kind), 0.0);
                }
            }
            previous = current;
        }
    }

    #[test]
    fn test_rounded_never_decreases_with_more_grams() {
        let base = ground_beef();
        let mut previous = base.scale_to_grams(0.0);
        for grams in [1.0, 3.0, 50.0, 453.592, 1000.0] {
            let current = base.scale_to_grams(grams);
            for kind in NutrientKind::ALL {
                assert!(current.get(kind) >= previous.get(kind));
            }
            previous = current;
        }
    }

    #[test]
    fn test_sum_of_rounded_values() {
        let a = RoundedNutrition {
            calories: 100,
            protein: 10,
            carbs: 5,
            fat: 1,
        };
        let b = RoundedNutrition {
            calories: 50,
            protein: 0,
            carbs: 14,
            fat: 0,
        };
        let total: RoundedNutrition = [a, b].into_iter().sum();
        assert_eq!(total, a + b);
        assert_eq!(total.calories, 150);
        assert_eq!(total.carbs, 19);
    }

    #[test]
    fn test_sum_saturates_instead_of_wrapping() {
        let huge = Nutrition {
            calories: 360.0,
            protein: 7.0,
            carbs: 80.0,
            fat: 0.6,
        }
        .scale_to_grams(1e30);
        assert_eq!(huge.calories, i64::MAX);

        let total = huge + huge;
        for kind in NutrientKind::ALL {
            assert!(total.get(kind) >= huge.get(kind));
        }
        assert_eq!(total.calories, i64::MAX);
    }

    #[test]
    fn test_set_and_get_by_kind() {
        let mut n = Nutrition::zero();
        n.set(NutrientKind::Fat, 3.5);
        n.set(NutrientKind::Energy, 40.0);
        assert_eq!(n.get(NutrientKind::Fat), 3.5);
        assert_eq!(n.calories, 40.0);
        assert_eq!(n.protein, 0.0);
    }
}
