//! USDA FoodData Central client
//!
//! Searches `/foods/search` and maps the top hit into a [`FoodRecord`].
//! Nutrients are identified by id, number or name and mapped to
//! [`NutrientKind`] here, so nothing downstream sees raw field names.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{LookupError, NutrientLookup};
use crate::config::Settings;
use crate::models::{FoodRecord, NutrientKind, Nutrition, PortionHint};

const USER_AGENT: &str = concat!("macrotally/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<FoodDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodDto {
    description: String,
    #[serde(default)]
    food_nutrients: Vec<NutrientDto>,
    #[serde(default)]
    food_measures: Vec<MeasureDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NutrientDto {
    #[serde(default)]
    nutrient_id: Option<u32>,
    #[serde(default)]
    nutrient_number: Option<String>,
    #[serde(default)]
    nutrient_name: Option<String>,
    #[serde(default)]
    unit_name: Option<String>,
    #[serde(default)]
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeasureDto {
    #[serde(default)]
    dissemination_text: Option<String>,
    #[serde(default)]
    gram_weight: Option<f64>,
}

/// Which raw nutrient a [`NutrientKind`] was read from. Lower rank wins.
fn classify(nutrient: &NutrientDto) -> Option<(NutrientKind, u8)> {
    if let Some(id) = nutrient.nutrient_id {
        let mapped = match id {
            1008 => Some((NutrientKind::Energy, 0)),
            // Atwater energy, reported for Foundation foods without 1008
            2047 => Some((NutrientKind::Energy, 1)),
            2048 => Some((NutrientKind::Energy, 2)),
            1003 => Some((NutrientKind::Protein, 0)),
            1005 => Some((NutrientKind::Carbohydrate, 0)),
            1004 => Some((NutrientKind::Fat, 0)),
            _ => None,
        };
        if mapped.is_some() {
            return mapped;
        }
    }

    if let Some(number) = nutrient.nutrient_number.as_deref() {
        let mapped = match number.trim() {
            "208" => Some((NutrientKind::Energy, 0)),
            "203" => Some((NutrientKind::Protein, 0)),
            "205" => Some((NutrientKind::Carbohydrate, 0)),
            "204" => Some((NutrientKind::Fat, 0)),
            _ => None,
        };
        if mapped.is_some() {
            return mapped;
        }
    }

    let name = nutrient.nutrient_name.as_deref()?.trim().to_lowercase();
    match name.as_str() {
        "energy" if is_kcal(nutrient) => Some((NutrientKind::Energy, 3)),
        "protein" => Some((NutrientKind::Protein, 1)),
        "carbohydrate, by difference" => Some((NutrientKind::Carbohydrate, 1)),
        "total lipid (fat)" => Some((NutrientKind::Fat, 1)),
        _ => None,
    }
}

fn is_kcal(nutrient: &NutrientDto) -> bool {
    nutrient
        .unit_name
        .as_deref()
        .map(|unit| unit.eq_ignore_ascii_case("kcal"))
        .unwrap_or(true)
}

fn baseline_nutrition(nutrients: &[NutrientDto]) -> Nutrition {
    let mut nutrition = Nutrition::zero();
    let mut ranks: [Option<u8>; 4] = [None; 4];

    for nutrient in nutrients {
        let Some((kind, rank)) = classify(nutrient) else {
            continue;
        };
        let Some(value) = nutrient.value.filter(|v| v.is_finite()) else {
            continue;
        };
        let slot = &mut ranks[kind_index(kind)];
        if slot.map_or(true, |best| rank < best) {
            *slot = Some(rank);
            nutrition.set(kind, value.max(0.0));
        }
    }

    nutrition
}

fn kind_index(kind: NutrientKind) -> usize {
    match kind {
        NutrientKind::Energy => 0,
        NutrientKind::Protein => 1,
        NutrientKind::Carbohydrate => 2,
        NutrientKind::Fat => 3,
    }
}

impl From<FoodDto> for FoodRecord {
    fn from(dto: FoodDto) -> Self {
        let nutrition = baseline_nutrition(&dto.food_nutrients);
        let mut record = FoodRecord::new(dto.description, nutrition);
        record.portions = dto
            .food_measures
            .into_iter()
            .filter_map(|measure| {
                let description = measure.dissemination_text?;
                let gram_weight = measure.gram_weight.filter(|g| *g > 0.0)?;
                Some(PortionHint::new(description, gram_weight))
            })
            .collect();
        record
    }
}

fn best_match(response: SearchResponse) -> Option<FoodRecord> {
    response.foods.into_iter().next().map(FoodRecord::from)
}

/// FoodData Central search client
#[derive(Clone)]
pub struct UsdaClient {
    http: Client,
    search_url: Url,
    api_key: String,
    data_types: String,
}

impl UsdaClient {
    pub fn new(api_key: impl Into<String>, settings: &Settings) -> Result<Self, LookupError> {
        let base = settings.base_url.trim_end_matches('/');
        let search_url = Url::parse(&format!("{base}/foods/search"))
            .map_err(|e| LookupError::InvalidUrl(format!("{base}: {e}")))?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            search_url,
            api_key: api_key.into(),
            data_types: settings.data_types.join(","),
        })
    }
}

#[async_trait]
impl NutrientLookup for UsdaClient {
    async fn find(&self, query: &str) -> Result<Option<FoodRecord>, LookupError> {
        tracing::debug!(query, url = %self.search_url, "searching FoodData Central");

        let mut request = self.http.get(self.search_url.clone()).query(&[
            ("api_key", self.api_key.as_str()),
            ("query", query),
            ("pageSize", "1"),
        ]);
        if !self.data_types.is_empty() {
            request = request.query(&[("dataType", self.data_types.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: SearchResponse = response.json().await?;
        let record = best_match(payload);
        match &record {
            Some(found) => tracing::debug!(query, matched = found.display_name(), "lookup hit"),
            None => tracing::debug!(query, "lookup miss"),
        }
        Ok(record)
    }
}
