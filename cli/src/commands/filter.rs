use anyhow::{Result, ensure};
use log::info;

use crate::{
    cli::FilterArgs,
    io::{read_intersections, write_intersections},
};

pub fn run(_cli: &crate::cli::Cli, args: &FilterArgs) -> Result<()> {
    ensure!(args.force || !args.output.exists(),
        "[filter] Output file {} already exists (use --force to overwrite)", args.output.display());

    info!("[filter] reading intersections from {}", args.input.display());
    let mut pops = read_intersections(&args.input, &args.columns)?;

    let removed = pops.retain_at_least(args.threshold);
    info!("[filter] removed {} intersections below {}, writing {} to {}",
        removed, args.threshold, pops.len(), args.output.display());

    write_intersections(&pops, &args.columns, &args.output)
}
