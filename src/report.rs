//! Tally output
//!
//! Plain text lines for the terminal and a JSON document for `--json`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::build_info::BuildInfo;
use crate::models::{RoundedNutrition, ScaledResult};
use crate::nutrition::aggregator::{ItemOutcome, ItemSummary, Tally, Totals};

fn format_grams(grams: f64) -> String {
    if (grams - grams.round()).abs() < 0.05 {
        format!("{:.0}", grams)
    } else {
        format!("{:.1}", grams)
    }
}

fn format_macros(n: &RoundedNutrition) -> String {
    format!(
        "{} kcal, {}g protein, {}g carbs, {}g fat",
        n.calories, n.protein, n.carbs, n.fat
    )
}

/// One display line for a resolved item
pub fn result_line(result: &ScaledResult) -> String {
    format!(
        "{} ({}g): {}",
        result.name,
        format_grams(result.grams),
        format_macros(&result.nutrition)
    )
}

/// One display line for any outcome
pub fn outcome_line(outcome: &ItemOutcome) -> String {
    match outcome {
        ItemOutcome::Resolved(result) => result_line(result),
        ItemOutcome::NotFound { query } => format!("{}: Not found", query),
        ItemOutcome::Failed { input, error } => format!("{}: Error: {}", input, error),
    }
}

/// Text report: one line per item, then a total when more than one resolved
pub fn render_text(tally: &Tally) -> String {
    let mut lines: Vec<String> = tally.items.iter().map(outcome_line).collect();
    if let Some(totals) = tally.totals() {
        lines.push(format!("Total: {}", format_macros(&totals)));
    }
    lines.join("\n")
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    build: BuildInfo,
    items: Vec<ItemSummary<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    totals: Option<Totals>,
}

/// JSON report stamped with `now`
pub fn render_json_at(tally: &Tally, now: DateTime<Utc>) -> Result<String, serde_json::Error> {
    let report = JsonReport {
        generated_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        build: BuildInfo::current(),
        items: tally.items.iter().map(ItemSummary::from).collect(),
        totals: tally.totals(),
    };
    serde_json::to_string_pretty(&report)
}

pub fn render_json(tally: &Tally) -> Result<String, serde_json::Error> {
    render_json_at(tally, Utc::now())
}
