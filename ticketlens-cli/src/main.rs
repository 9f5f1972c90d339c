//! TicketLens CLI — summary, filter, facets and report commands.
//!
//! Commands:
//! - `summary` — print the data summary for the current filters
//! - `filter` — print the filtered listings as a table, CSV or JSON
//! - `facets` — list sections, rows and the price span available to filter on
//! - `report` — write JSON/CSV/Markdown artifacts for the current filters

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticketlens_core::criteria::{FilterCriteria, PriceRange, Selection};
use ticketlens_core::data::{load_listings, Dataset};
use ticketlens_core::domain::Listing;
use ticketlens_core::facets::{default_criteria, Facets};
use ticketlens_core::report::{
    export_listings_csv, render_summary_markdown, save_report, DashboardReport,
};
use ticketlens_core::{run, DashboardConfig};

#[derive(Parser)]
#[command(
    name = "ticketlens",
    about = "TicketLens CLI — explore ticket listing prices, grades and availability"
)]
struct Cli {
    /// Path to a TOML config file with dashboard defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Listing file (gzip or plain JSON). Overrides `data_path` from the config.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print record count and average/max/min price for the filtered listings.
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Print the filtered listings.
    Filter {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Maximum rows to print. Defaults to `table_limit` from the config.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List the sections, rows and price span present in the data.
    Facets,
    /// Write report.json, listings.csv, distribution.csv and summary.md.
    Report {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output directory for the report artifacts.
        #[arg(long, default_value = "report")]
        output_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

/// Filter flags shared by every command that runs the pipeline.
#[derive(Args)]
struct FilterArgs {
    /// Section label to match exactly. The literal "All" means no filter,
    /// so a section actually labelled "All" cannot be selected on its own.
    #[arg(long)]
    section: Option<String>,

    /// Ignore the configured default section.
    #[arg(long, default_value_t = false, conflicts_with = "section")]
    all_sections: bool,

    /// Row label to match exactly. The literal "All" means no filter, as for `--section`.
    #[arg(long)]
    row: Option<String>,

    /// Case-insensitive substring of the listing id.
    #[arg(long, default_value = "")]
    id: String,

    /// Lowest price to include (inclusive). Defaults to the cheapest listing.
    #[arg(long)]
    min_price: Option<f64>,

    /// Highest price to include (inclusive). Defaults to the configured ceiling.
    #[arg(long)]
    max_price: Option<f64>,
}

impl FilterArgs {
    /// Start from the session defaults and apply the flags on top.
    ///
    /// A single explicit price bound keeps the default on the other side
    /// unless the two would cross; that side is then left open. Only an
    /// inverted pair given on the command line is rejected.
    fn to_criteria(&self, listings: &[Listing], config: &DashboardConfig) -> Result<FilterCriteria> {
        let defaults = default_criteria(listings, config);

        let section = if self.all_sections {
            Selection::All
        } else {
            match &self.section {
                Some(s) => Selection::from_option(Some(s.as_str())),
                None => defaults.section,
            }
        };
        let row = match &self.row {
            Some(r) => Selection::from_option(Some(r.as_str())),
            None => defaults.row,
        };

        let (min, max) = match (self.min_price, self.max_price) {
            (Some(min), Some(max)) => (min, max),
            (Some(min), None) => {
                let ceiling = defaults.price.max();
                (min, if min > ceiling { f64::INFINITY } else { ceiling })
            }
            (None, Some(max)) => {
                let floor = defaults.price.min();
                (if max < floor { f64::NEG_INFINITY } else { floor }, max)
            }
            (None, None) => (defaults.price.min(), defaults.price.max()),
        };
        let price = PriceRange::new(min, max).context("invalid price range")?;

        Ok(FilterCriteria {
            section,
            row,
            id_substring: self.id.clone(),
            price,
        })
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    tracing::debug!(?config, "resolved config");

    let dataset = load_listings(&config.data_path)
        .with_context(|| format!("failed to load listings from {}", config.data_path.display()))?;

    match cli.command {
        Commands::Summary { filters } => run_summary(&dataset, &config, &filters),
        Commands::Filter {
            filters,
            format,
            limit,
        } => run_filter(&dataset, &config, &filters, format, limit),
        Commands::Facets => run_facets(&dataset),
        Commands::Report {
            filters,
            output_dir,
        } => run_report(&dataset, &config, &filters, output_dir),
    }
}

/// Used when `RUST_LOG` is unset: warnings everywhere, load and report
/// events from the core crate.
const DEFAULT_LOG_FILTER: &str = "warn,ticketlens_core=info";

/// Logs go to stderr so stdout stays clean for CSV/JSON output.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();
}

fn run_summary(dataset: &Dataset, config: &DashboardConfig, filters: &FilterArgs) -> Result<()> {
    let criteria = filters.to_criteria(dataset.listings(), config)?;
    let view = run(dataset.listings(), &criteria);
    print!("{}", render_summary_markdown(&view.summary));
    Ok(())
}

fn run_filter(
    dataset: &Dataset,
    config: &DashboardConfig,
    filters: &FilterArgs,
    format: OutputFormat,
    limit: Option<usize>,
) -> Result<()> {
    let criteria = filters.to_criteria(dataset.listings(), config)?;
    let view = run(dataset.listings(), &criteria);

    let limit = limit.or(config.table_limit).unwrap_or(usize::MAX);
    let rows: Vec<&Listing> = view.rows.iter().copied().take(limit).collect();

    match format {
        OutputFormat::Table => print_table(&rows, view.rows.len()),
        OutputFormat::Csv => print!("{}", export_listings_csv(&rows)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }
    Ok(())
}

fn run_facets(dataset: &Dataset) -> Result<()> {
    let facets = Facets::of(dataset.listings());
    println!("{}", serde_json::to_string_pretty(&facets)?);
    Ok(())
}

fn run_report(
    dataset: &Dataset,
    config: &DashboardConfig,
    filters: &FilterArgs,
    output_dir: PathBuf,
) -> Result<()> {
    let criteria = filters.to_criteria(dataset.listings(), config)?;
    let view = run(dataset.listings(), &criteria);
    let report = DashboardReport::from_view(&view, &criteria, dataset.hash());

    let written = save_report(&output_dir, &report, &view.rows)?;

    println!("Records:      {}", report.summary.count);
    println!("Dataset:      {}", dataset.hash().short());
    for path in &written {
        println!("Wrote:        {}", path.display());
    }
    Ok(())
}

fn print_table(rows: &[&Listing], total: usize) {
    println!(
        "{:<16} {:>8} {:>6} {:>10} {:>6}  {:<19}",
        "ID", "SECTION", "ROW", "PRICE", "GRADE", "TIMESTAMP"
    );
    for l in rows {
        println!(
            "{:<16} {:>8} {:>6} {:>10.2} {:>6} {}",
            l.id.as_deref().unwrap_or("-"),
            l.section,
            l.row,
            l.price,
            l.grade,
            l.timestamp.format("%Y-%m-%d %H:%M:%S"),
        );
    }
    if rows.len() < total {
        println!("... {} of {} rows shown", rows.len(), total);
    }
}
