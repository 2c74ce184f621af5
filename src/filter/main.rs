//! Offline filtering of a saved event collection against a boundary.
//!
//! Useful for re-clipping a previous bounding-box download to a different
//! or corrected boundary without hitting the event service again.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use quakefence::config::Config;
use quakefence::models::EventCollection;
use quakefence::output::FilteredCollection;
use quakefence::pip::{load_boundary, Region};

#[derive(Parser, Debug)]
#[command(name = "filter")]
#[command(about = "Clip a saved GeoJSON event collection to a boundary")]
struct Args {
    /// GeoJSON boundary (Polygon or MultiPolygon features)
    #[arg(short, long, default_value = "admin0.json")]
    boundary: PathBuf,

    /// GeoJSON FeatureCollection of events
    #[arg(short, long)]
    events: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "filtered.geojson")]
    output: PathBuf,

    /// Optional TOML config file (output title/source)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Label for metadata.starttime, left out when not given
    #[arg(long)]
    start: Option<String>,

    /// Label for metadata.endtime, left out when not given
    #[arg(long)]
    end: Option<String>,

    /// Classify events on all cores
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<()> {
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

    let geometry = load_boundary(&args.boundary)
        .with_context(|| format!("Failed to load boundary {}", args.boundary.display()))?;
    let region = Region::new(geometry).context("Boundary has no vertices")?;

    info!("Reading events from {}", args.events.display());
    let file = File::open(&args.events).context("Failed to open events file")?;
    let collection: EventCollection =
        serde_json::from_reader(BufReader::new(file)).context("Failed to parse events file")?;

    let outcome = if args.parallel {
        region.par_filter(&collection.features)
    } else {
        region.filter(&collection.features)
    };

    if outcome.skipped > 0 {
        warn!("{} events had no usable coordinates", outcome.skipped);
    }
    info!(
        "{} of {} events fall inside the boundary ({} outside)",
        outcome.accepted_count(),
        outcome.total_seen,
        outcome.rejected_count()
    );

    FilteredCollection::new(
        outcome,
        &config.output,
        args.start.as_deref(),
        args.end.as_deref(),
        Utc::now(),
    )
    .write_to_file(&args.output)?;

    Ok(())
}
