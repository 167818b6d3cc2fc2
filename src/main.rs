use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use orderscope::analysis;
use orderscope::dataset;
use orderscope::models::{Config, DateSelection};
use orderscope::ui::DashboardApp;

#[derive(Parser)]
#[command(
    name = "orderscope",
    about = "📊 Terminal dashboard for an e-commerce order dataset",
    long_about = "Loads the order CSV once, filters by purchase date range and renders \
                  sales trend, top categories, payment mix, delivery times and customer \
                  segments. Run without options for the interactive dashboard."
)]
struct Cli {
    /// Path to the order CSV (overrides DATA_PATH)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Print the computed views as JSON instead of starting the TUI
    #[arg(long)]
    dump_views: bool,

    /// Filter start date (YYYY-MM-DD), only with --dump-views
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Filter end date (YYYY-MM-DD), only with --dump-views
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Show detailed progress information
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Suppress most logs while the TUI owns the screen
    let level = if cli.verbose { Level::INFO } else { Level::ERROR };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_env_filter(format!("orderscope={}", level))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let config = Config::from_env()?;
    let data_path = cli
        .data
        .unwrap_or_else(|| PathBuf::from(&config.data_path));

    // Missing or unparsable source data is fatal, there is no recovery path
    let data = match dataset::load(&data_path) {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to load dataset: {}", e);
            eprintln!("❌ Dataset Error: {}", e);
            eprintln!("Set DATA_PATH or pass --data to point at the order CSV.");
            std::process::exit(1);
        }
    };

    if cli.dump_views {
        return dump_views(data, cli.from, cli.to);
    }

    let mut app = DashboardApp::new(data, &config);
    app.run()
}

/// Headless mode: run the pipeline once and print the views as JSON
fn dump_views(
    data: &dataset::Dataset,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let selection = match (from, to) {
        (None, None) => match data.full_range() {
            Some(range) => DateSelection::Complete(range),
            None => DateSelection::Empty,
        },
        (start, end) => DateSelection::from_dates(start, end),
    };

    let output = analysis::build_views(data, &selection);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
