//! Macrotally
//!
//! Command-line front end: `macrotally 1 lb ground beef, 500 eggs`.

use std::error::Error;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use macrotally::build_info;
use macrotally::config::{self, Config, ConfigError};
use macrotally::lookup::{LookupError, NutrientLookup, UsdaClient};
use macrotally::nutrition::{split_items, tally_segments};
use macrotally::report;

const USAGE_EXIT: u8 = 2;

#[derive(Parser)]
#[command(
    name = "macrotally",
    about = "Macronutrient totals for free-form food descriptions",
    long_about = "Looks up foods in USDA FoodData Central and scales them to the amounts given.\n\n\
                  Examples:\n  macrotally 1 lb ground beef, 500 eggs\n  macrotally apple \"peanut butter\"",
    version,
    long_version = concat!(
        env!("CARGO_PKG_VERSION"),
        " (build ",
        env!("MACROTALLY_BUILD_NUMBER"),
        ", ",
        env!("MACROTALLY_BUILD_TIMESTAMP"),
        ")"
    )
)]
struct Cli {
    /// Foods, as comma-separated `<quantity> <unit> <food>` items or bare names
    foods: Vec<String>,

    /// Store a FoodData Central API key and exit
    #[arg(long, value_name = "API_KEY")]
    setup: Option<String>,

    /// Print the tally as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Turn command-line words into item segments.
///
/// Input with a comma or a leading number is one comma-separated list;
/// otherwise every argument is its own bare food name.
fn segments_from_args(args: &[String]) -> Vec<String> {
    let joined = args.join(" ");
    let leading_number = joined
        .trim_start()
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_digit() || c == '.');

    if joined.contains(',') || leading_number {
        return split_items(&joined).into_iter().map(String::from).collect();
    }

    args.iter()
        .map(|arg| arg.trim())
        .filter(|arg| !arg.is_empty())
        .map(String::from)
        .collect()
}

fn usage_error(message: impl std::fmt::Display) -> ExitCode {
    eprintln!("error: {message}");
    ExitCode::from(USAGE_EXIT)
}

/// Tally the foods on the command line and write the report to `out`.
///
/// A missing or invalid config ends the run with a usage error before any
/// input is parsed or `connect` is called.
async fn run<L, F>(
    cli: &Cli,
    config: Result<Config, ConfigError>,
    connect: F,
    out: &mut impl Write,
) -> Result<ExitCode, Box<dyn Error>>
where
    L: NutrientLookup,
    F: FnOnce(&Config) -> Result<L, LookupError>,
{
    let config = match config {
        Ok(config) => config,
        Err(e) if e.is_usage_error() => return Ok(usage_error(e)),
        Err(e) => return Err(e.into()),
    };

    let segments = segments_from_args(&cli.foods);
    if segments.is_empty() {
        return Ok(usage_error(
            "no foods given; try `macrotally 1 lb ground beef, 500 eggs`",
        ));
    }

    let lookup = connect(&config)?;
    let tally = tally_segments(&segments, &lookup, config.settings.default_grams).await;
    tracing::debug!(
        items = tally.items.len(),
        resolved = tally.resolved_count(),
        "tally complete"
    );

    if cli.json {
        writeln!(out, "{}", report::render_json(&tally)?)?;
    } else {
        writeln!(out, "{}", report::render_text(&tally))?;
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for the report
    let directive = if cli.verbose { "macrotally=debug" } else { "macrotally=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(io::stderr)
        .init();

    if cli.verbose {
        build_info::print_startup_banner();
    }

    let config_path = config::config_path()?;

    if let Some(api_key) = cli.setup.as_deref() {
        return match config::save_api_key(&config_path, api_key) {
            Ok(_) => {
                println!("API key saved to {}", config_path.display());
                Ok(ExitCode::SUCCESS)
            }
            Err(e) if e.is_usage_error() => Ok(usage_error("the API key must not be empty")),
            Err(e) => Err(e.into()),
        };
    }

    run(
        &cli,
        Config::load(&config_path),
        |config: &Config| UsdaClient::new(config.api_key.as_str(), &config.settings),
        &mut io::stdout().lock(),
    )
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use macrotally::models::{FoodRecord, Nutrition};

    use super::*;

    /// Knows only white rice and counts every query
    struct CountingLookup {
        queries: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl NutrientLookup for CountingLookup {
        async fn find(&self, query: &str) -> Result<Option<FoodRecord>, LookupError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            if query != "rice" {
                return Ok(None);
            }
            Ok(Some(FoodRecord::new(
                "Rice, white, cooked",
                Nutrition {
                    calories: 130.0,
                    protein: 2.7,
                    carbs: 28.0,
                    fat: 0.3,
                },
            )))
        }
    }

    fn test_config() -> Result<Config, ConfigError> {
        Config::resolve(None, Some("TEST_KEY".to_string()))
    }

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_comma_input_is_joined() {
        let segments = segments_from_args(&args(&["1", "lb", "ground", "beef,", "500", "eggs"]));
        assert_eq!(segments, vec!["1 lb ground beef", "500 eggs"]);
    }

    #[test]
    fn test_leading_number_is_one_item() {
        let segments = segments_from_args(&args(&["2", "cups", "milk"]));
        assert_eq!(segments, vec!["2 cups milk"]);
    }

    #[test]
    fn test_bare_names_are_separate_items() {
        let segments = segments_from_args(&args(&["apple", "peanut butter", " "]));
        assert_eq!(segments, vec!["apple", "peanut butter"]);
    }

    #[test]
    fn test_no_args() {
        assert!(segments_from_args(&[]).is_empty());
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from(["macrotally", "--json", "-v", "apple"]).unwrap();
        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(cli.foods, vec!["apple"]);
        assert_eq!(cli.setup, None);

        let cli = Cli::try_parse_from(["macrotally", "--setup", "KEY"]).unwrap();
        assert_eq!(cli.setup.as_deref(), Some("KEY"));
        assert!(cli.foods.is_empty());
    }

    #[tokio::test]
    async fn test_missing_api_key_stops_before_parsing() {
        let cli = Cli::try_parse_from(["macrotally", "100", "g", "rice"]).unwrap();
        let queries = Arc::new(AtomicUsize::new(0));
        let mut connected = false;
        let mut out = Vec::new();

        let lookup = CountingLookup {
            queries: Arc::clone(&queries),
        };
        let code = run(
            &cli,
            Config::resolve(None, None),
            |_: &Config| {
                connected = true;
                Ok(lookup)
            },
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(code, ExitCode::from(USAGE_EXIT));
        assert!(!connected);
        assert_eq!(queries.load(Ordering::SeqCst), 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_no_foods_is_a_usage_error() {
        let cli = Cli::try_parse_from(["macrotally"]).unwrap();
        let queries = Arc::new(AtomicUsize::new(0));
        let mut out = Vec::new();

        let lookup = CountingLookup {
            queries: Arc::clone(&queries),
        };
        let code = run(&cli, test_config(), |_: &Config| Ok(lookup), &mut out)
            .await
            .unwrap();

        assert_eq!(code, ExitCode::from(USAGE_EXIT));
        assert_eq!(queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_writes_report() {
        let cli = Cli::try_parse_from(["macrotally", "100", "g", "rice,", "1", "apple"]).unwrap();
        let queries = Arc::new(AtomicUsize::new(0));
        let mut out = Vec::new();

        let lookup = CountingLookup {
            queries: Arc::clone(&queries),
        };
        let code = run(&cli, test_config(), |_: &Config| Ok(lookup), &mut out)
            .await
            .unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(queries.load(Ordering::SeqCst), 2);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Rice, white, cooked"));
        assert!(text.contains("130 kcal"));
        assert!(text.contains("apple"));
    }

    #[tokio::test]
    async fn test_run_writes_json() {
        let cli = Cli::try_parse_from(["macrotally", "--json", "100 g rice"]).unwrap();
        let mut out = Vec::new();

        let lookup = CountingLookup {
            queries: Arc::new(AtomicUsize::new(0)),
        };
        run(&cli, test_config(), |_: &Config| Ok(lookup), &mut out)
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["items"][0]["status"], "resolved");
        assert_eq!(value["items"][0]["name"], "Rice, white, cooked");
    }
}
