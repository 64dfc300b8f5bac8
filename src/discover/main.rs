//! One-shot discovery from the command line.
//!
//! Prints the places around a point as JSON, as compass groups with
//! `--radar`, or as the nearest-first view ahead of `--heading`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use bearings::direction::{ahead_of, group_by_direction, DEFAULT_TOLERANCE_DEG};
use bearings::discovery::{Delivered, DiscoveryRequest, DEFAULT_LIMIT};
use bearings::overpass::DEFAULT_RADIUS_M;
use bearings::config::FallbackKind;
use bearings::{Config, Coordinate, Overrides, Place};

#[derive(Parser, Debug)]
#[command(name = "discover")]
#[command(about = "Find points of interest around a coordinate")]
struct Args {
    /// Observer latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Observer longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Search radius in meters
    #[arg(short, long, default_value_t = DEFAULT_RADIUS_M)]
    radius: u32,

    /// Free-text name search
    #[arg(short, long)]
    query: Option<String>,

    /// Maximum number of places
    #[arg(short = 'n', long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print places grouped by compass direction
    #[arg(long, conflicts_with = "heading")]
    radar: bool,

    /// Only show places ahead of this heading (degrees from north)
    #[arg(long)]
    heading: Option<f64>,

    /// Half-width of the heading cone in degrees
    #[arg(long, default_value_t = DEFAULT_TOLERANCE_DEG)]
    tolerance: f64,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Overpass endpoint URL; repeat to set the failover order
    #[arg(long = "endpoint")]
    endpoints: Vec<String>,

    /// Fallback strategy when no live data is available
    #[arg(long, value_enum)]
    fallback: Option<FallbackKind>,

    /// Preferred name language (e.g. "en")
    #[arg(long)]
    language: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for results
    let default_level = if args.verbose { "debug" } else { "info" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Some(heading) = args.heading {
        if !heading.is_finite() {
            bail!("--heading must be a finite number");
        }
    }

    let mut config = Config::load(args.config.as_deref())?;
    config.apply(Overrides {
        endpoints: args.endpoints.clone(),
        fallback: args.fallback,
        language: args.language.clone(),
    })?;
    let coordinator = config.build_coordinator()?;

    let center = Coordinate::new(args.lat, args.lon);
    let request = DiscoveryRequest {
        center,
        radius_m: args.radius,
        term: args.query.clone(),
        limit: args.limit,
    };

    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling discovery");
                token.cancel();
            }
        });
    }

    info!("Discovering places around {}, {}", center.lat, center.lon);
    let discovery = coordinator
        .discover(&request, &token)
        .await
        .context("Discovery failed")?;

    if let Delivered::Fallback { reason } = discovery.outcome {
        warn!("No live data ({:?}), showing fallback results", reason);
    }

    if args.radar {
        let groups = group_by_direction(&discovery.places, &center);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&groups)?);
        } else {
            for group in &groups {
                println!("{} {:<2} ({})", group.glyph(), group.direction(), group.count());
                for place in &group.places {
                    print_place(place, "    ");
                }
            }
        }
        return Ok(());
    }

    let places = match args.heading {
        Some(heading) => ahead_of(&discovery, &center, heading, args.tolerance),
        None => discovery.places,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&places)?);
    } else {
        for place in &places {
            print_place(place, "");
        }
    }

    Ok(())
}

fn print_place(place: &Place, indent: &str) {
    println!(
        "{}{:>6} m  {}  [{}]",
        indent, place.distance, place.name, place.main_category
    );
    if !place.location.formatted_address.is_empty() {
        println!("{}          {}", indent, place.location.formatted_address);
    }
    if place.is_synthetic() && !place.description.is_empty() {
        println!("{}          {}", indent, place.description);
    }
}
