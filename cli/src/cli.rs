use std::path::PathBuf;

use countysplit::DEFAULT_THRESHOLD;

/// County-split metrics CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "countysplit", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Score one or more plans from county-district population tables
    Score(ScoreArgs),

    /// Drop sliver intersections and write the cleaned table
    Filter(FilterArgs),
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, clap::ValueEnum)]
pub enum OutputFormat { Text, Json }

/// Column names in the intersection table.
#[derive(clap::Args, Debug, Clone)]
pub struct ColumnArgs {
    /// Column holding county identifiers
    #[arg(long, default_value = "county")]
    pub county_column: String,

    /// Column holding district identifiers
    #[arg(long, default_value = "district")]
    pub district_column: String,

    /// Column holding intersection populations
    #[arg(long, default_value = "population")]
    pub population_column: String,
}

#[derive(clap::Args, Debug)]
pub struct ScoreArgs {
    /// Intersection tables (CSV, one row per county-district intersection)
    #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
    pub inputs: Vec<PathBuf>,

    /// Drop intersections with population below this value
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub columns: ColumnArgs,
}

#[derive(clap::Args, Debug)]
pub struct FilterArgs {
    /// Intersection table to clean (CSV)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output CSV file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Drop intersections with population below this value
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u64,

    /// Overwrite if the output file exists
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub columns: ColumnArgs,
}
