mod report;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use prometheus::{Encoder, Registry, TextEncoder};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seasonwatch_core::{
    load_config, metrics, open_inventory, validate_config, CatalogResolver, EpisodeCatalog,
    InventoryIndexer, Reconciler, SanitizedConfig, TmdbCatalog,
};

/// Command-line arguments for seasonwatch
#[derive(Parser, Debug)]
#[command(name = "seasonwatch")]
#[command(about = "Lists aired TV episodes missing from a Kodi library")]
#[command(version)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "config.toml", env = "SEASONWATCH_CONFIG")]
    config: PathBuf,

    /// Write the report as CSV to this file (overrides report.csv_path)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Also list seasons that are complete
    #[arg(long)]
    all: bool,

    /// Print the full report as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Do not draw the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Dump Prometheus metrics to stderr when done
    #[arg(long)]
    metrics: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging on stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    // Load configuration
    info!("Loading configuration from {:?}", args.config);
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        "Configuration loaded: {}",
        serde_json::to_string(&sanitized).unwrap_or_default()
    );

    // Open the library read-only
    let inventory = open_inventory(&config.inventory, config.catalog.series_id_source)
        .await
        .with_context(|| {
            format!(
                "Failed to open {:?} inventory database",
                config.inventory.dialect
            )
        })?;

    // Create catalog client
    let catalog: Arc<dyn EpisodeCatalog> = Arc::new(
        TmdbCatalog::new(config.catalog.clone()).context("Failed to create TMDB client")?,
    );
    info!(
        "Using TMDB catalog (language {}, series ids from {:?})",
        config.catalog.language, config.catalog.series_id_source
    );

    let resolver = CatalogResolver::new(catalog, config.catalog.language.clone());
    let mut reconciler = Reconciler::new(resolver, config.reconcile.clone());

    let progress = if !args.no_progress && !args.json {
        let bar = report::progress_bar().context("Invalid progress bar template")?;
        reconciler = reconciler.with_progress_callback(report::progress_callback(bar.clone()));
        Some(bar)
    } else {
        None
    };

    info!("Collecting information for TV shows in library");
    let indexer = InventoryIndexer::new(config.inventory.on_invalid_row);
    let outcome = reconciler
        .run_source(inventory.as_ref(), &indexer)
        .await
        .context("Failed to read inventory")?;

    if let Some(bar) = progress {
        bar.finish();
    }

    if !outcome.skipped.is_empty() {
        warn!(
            "{} of {} seasons are not in the report because their catalog lookup failed",
            outcome.skipped.len(),
            outcome.total_seasons
        );
    }

    let include_complete = args.all || config.report.include_complete;
    let listed = report::selected(&outcome, include_complete);

    if args.json {
        let stdout = io::stdout();
        serde_json::to_writer_pretty(stdout.lock(), &outcome)
            .context("Failed to write JSON report")?;
        println!();
    } else if listed.is_empty() {
        println!("No missing episodes found.");
    } else {
        print!("{}", report::render_table(&listed));
    }

    if let Some(csv_path) = args.csv.as_ref().or(config.report.csv_path.as_ref()) {
        let file = File::create(csv_path)
            .with_context(|| format!("Failed to create CSV file {:?}", csv_path))?;
        report::write_csv(BufWriter::new(file), &listed)
            .with_context(|| format!("Failed to write CSV file {:?}", csv_path))?;
        info!("Wrote {} seasons to {:?}", listed.len(), csv_path);
    }

    if args.metrics {
        dump_metrics().context("Failed to encode metrics")?;
    }

    Ok(())
}

/// Write all core metrics to stderr in the Prometheus text format.
fn dump_metrics() -> Result<()> {
    let registry = Registry::new();
    for metric in metrics::all_metrics() {
        registry.register(metric)?;
    }

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    io::stderr().write_all(&buffer)?;
    Ok(())
}
