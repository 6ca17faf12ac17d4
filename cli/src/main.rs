mod cli;
mod commands;
mod io;

use cli::{Cli, Commands};
use commands::{filter, score};
use log::LevelFilter;

/// Map `-v` occurrences to a log level; `RUST_LOG` still takes precedence.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);
    match &cli.command {
        Commands::Score(args) => score::run(&cli, args),
        Commands::Filter(args) => filter::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
