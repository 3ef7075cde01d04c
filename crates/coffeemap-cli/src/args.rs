use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for coffeemap
#[derive(Debug, Parser)]
#[command(
    name = "coffeemap",
    version,
    about = "Match coffee trade statistics to world map regions"
)]
pub struct CliArgs {
    /// JSON config file (default: built-in layout under ./data)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the CSV tables and the boundary file
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// GeoJSON boundary file (.geojson, .json or .gz)
    #[arg(long = "boundary", global = true)]
    pub boundary: Option<PathBuf>,

    /// Minimum fuzzy score within [0, 1]
    #[arg(long = "cutoff", global = true)]
    pub cutoff: Option<f64>,

    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG wins.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which table to read: a configured metric or a CSV path.
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct DatasetArgs {
    /// Metric name from the config (e.g. Production, Export)
    #[arg(short = 'm', long = "metric")]
    pub metric: Option<String>,

    /// Any CSV with a country column and year columns
    #[arg(long = "csv")]
    pub csv: Option<PathBuf>,
}

/// Year and coffee type of a view.
#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    /// Year column label (default: the latest year)
    #[arg(short = 'y', long = "year")]
    pub year: Option<String>,

    /// Coffee type, or "All"
    #[arg(short = 't', long = "coffee-type", default_value = "All")]
    pub coffee_type: String,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the normalized key of each name
    Normalize {
        /// Raw country names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Show how each country of a view maps to a boundary region
    Match {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Print the render-ready rows of a view
    Map {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Emit JSON instead of a table
        #[arg(long = "json")]
        json: bool,
    },

    /// List the year labels of a dataset
    Years {
        #[command(flatten)]
        dataset: DatasetArgs,
    },

    /// List the coffee type selectors of a dataset
    Types {
        #[command(flatten)]
        dataset: DatasetArgs,
    },

    /// List boundary region names
    Regions {
        /// Only keys shared by more than one region
        #[arg(long = "collisions")]
        collisions: bool,
    },
}
