//! Fetch USGS earthquakes for an administrative boundary.
//!
//! Loads the boundary, queries the event service with its bounding box,
//! keeps only the events inside the boundary itself, and writes them out
//! as a dated GeoJSON file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use quakefence::config::Config;
use quakefence::output::{output_file_name, FilteredCollection};
use quakefence::pip::{load_boundary, Region};
use quakefence::usgs::{EventQuery, UsgsClient};

#[derive(Parser, Debug)]
#[command(name = "fetch")]
#[command(about = "Fetch USGS earthquakes inside an administrative boundary")]
struct Args {
    /// GeoJSON boundary (Polygon or MultiPolygon features)
    #[arg(short, long, default_value = "admin0.json")]
    boundary: PathBuf,

    /// Optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start of the time window (overrides fetch.start_date)
    #[arg(long)]
    start: Option<String>,

    /// End of the time window (defaults to now, UTC)
    #[arg(long)]
    end: Option<String>,

    /// Directory for the output file
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Classify events on all cores
    #[arg(long)]
    parallel: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    info!("Quakefence fetch");

    let geometry = load_boundary(&args.boundary)
        .with_context(|| format!("Failed to load boundary {}", args.boundary.display()))?;
    let region = Region::new(geometry).context("Boundary has no vertices")?;
    info!(
        "Boundary: {} polygons, {} vertices, bbox {}",
        region.polygon_count(),
        region.vertex_count(),
        region.bbox()
    );

    let now = Utc::now();
    let start = args
        .start
        .clone()
        .unwrap_or_else(|| config.fetch.start_date.clone());
    let query = match &args.end {
        Some(end) => EventQuery::new(start.clone(), end.clone(), *region.bbox()),
        None => EventQuery::until(start.clone(), now, *region.bbox()),
    };

    let client = UsgsClient::new(&config.fetch)?;
    let events = client
        .fetch_all(&query)
        .await
        .context("Failed to fetch events")?;

    let outcome = if args.parallel {
        region.par_filter(&events)
    } else {
        region.filter(&events)
    };

    if outcome.skipped > 0 {
        warn!("{} events had no usable coordinates", outcome.skipped);
    }
    info!(
        "{} of {} events fall inside the boundary",
        outcome.accepted_count(),
        outcome.total_seen
    );

    let collection = FilteredCollection::new(
        outcome,
        &config.output,
        Some(query.start_time.as_str()),
        Some(query.end_time.as_str()),
        now,
    );

    std::fs::create_dir_all(&args.output_dir)?;
    let path = args
        .output_dir
        .join(output_file_name(&config.output.prefix, &start, now.date_naive()));
    collection.write_to_file(&path)?;

    info!("Done! Wrote {}", path.display());

    Ok(())
}
