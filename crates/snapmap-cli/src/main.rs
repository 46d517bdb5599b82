mod filter_type;
mod map;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use snapmap_core::{AppConfig, DistanceUnit};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "snapmap")]
#[command(about = "SNAP retailer map filtering tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Remove every feature of one store type from a `FeatureCollection`
    FilterType {
        /// Input GeoJSON `FeatureCollection`
        input: PathBuf,
        /// Store type to remove (exact match on `Store_Type`)
        #[arg(long)]
        exclude_type: String,
        /// Output path; the input is overwritten when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Count the retailers matching a selection, per store type
    Summary {
        /// Store type to include (repeatable; none means all)
        #[arg(long = "type")]
        types: Vec<String>,
        /// Ward id to include (repeatable)
        #[arg(long = "ward")]
        wards: Vec<String>,
        /// County id to include (repeatable; needs --include-bordering)
        #[arg(long = "county", requires = "include_bordering")]
        counties: Vec<String>,
        /// Add the bordering-area retailers to the working set
        #[arg(long)]
        include_bordering: bool,
    },
    /// Nearest retailer of each store type to a point
    Nearest {
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Distance unit (mi or km); defaults to the configured unit
        #[arg(long)]
        unit: Option<DistanceUnit>,
        /// Add the bordering-area retailers to the working set
        #[arg(long)]
        include_bordering: bool,
    },
    /// List ward ids and labels
    Regions {
        /// List counties instead of wards
        #[arg(long)]
        counties: bool,
    },
    /// Write the outside-the-boundary mask and the boundary outline as GeoJSON
    Mask {
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::FilterType {
            input,
            exclude_type,
            out,
        }) => {
            init_tracing(DEFAULT_LOG_LEVEL)?;
            let message = filter_type::run_filter_type(&input, &exclude_type, out.as_deref())?;
            println!("{message}");
        }
        Some(Commands::Summary {
            types,
            wards,
            counties,
            include_bordering,
        }) => map::run_summary(&load_config()?, types, wards, counties, include_bordering)?,
        Some(Commands::Nearest {
            lon,
            lat,
            unit,
            include_bordering,
        }) => map::run_nearest(&load_config()?, lon, lat, unit, include_bordering)?,
        Some(Commands::Regions { counties }) => map::run_regions(&load_config()?, counties)?,
        Some(Commands::Mask { out }) => map::run_mask(&load_config()?, &out)?,
        None => Cli::command().print_help()?,
    }

    Ok(())
}

const DEFAULT_LOG_LEVEL: &str = "info";

/// Load `.env` and the `SNAPMAP_*` settings, then start logging at the
/// configured level. Only the map commands need this.
fn load_config() -> anyhow::Result<AppConfig> {
    let config = snapmap_core::load_app_config()?;
    init_tracing(&config.log_level)?;
    Ok(config)
}

/// `RUST_LOG` wins over `fallback`. A subscriber that is already installed
/// is left in place.
fn init_tracing(fallback: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;
    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
