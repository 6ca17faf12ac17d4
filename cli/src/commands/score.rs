use std::{collections::BTreeMap, fmt, path::Path};

use anyhow::{Context, Result, ensure};
use countysplit::{CountyIndex, FilterOptions, Metric, MetricError, MetricValue, RegionId, SplitReport};
use log::{error, info, warn};
use serde::Serialize;

use crate::{
    cli::{ColumnArgs, OutputFormat, ScoreArgs},
    io::read_intersections,
};

/// Scores for one input table.
#[derive(Serialize)]
struct PlanReport<'a> {
    path: &'a Path,
    threshold: u64,
    removed: usize,
    #[serde(flatten)]
    scores: Scores,
}

/// Full report, or whatever statistics are defined when some are not.
#[derive(Serialize)]
#[serde(untagged)]
enum Scores {
    Complete(SplitReport),
    Partial {
        values: BTreeMap<Metric, MetricValue>,
        undefined: BTreeMap<Metric, String>,
    },
}

impl Scores {
    /// Evaluate every metric on its own, keeping the ones that succeed.
    fn partial<C: RegionId>(index: &CountyIndex<'_, C>) -> Self {
        let (mut values, mut undefined) = (BTreeMap::new(), BTreeMap::new());
        for metric in Metric::ALL {
            match metric.compute_indexed(index) {
                Ok(value) => { values.insert(metric, value); }
                Err(err) => { undefined.insert(metric, err.to_string()); }
            }
        }
        Scores::Partial { values, undefined }
    }
}

impl fmt::Display for Scores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scores::Complete(report) => write!(f, "{report}"),
            Scores::Partial { values, undefined } => {
                for metric in Metric::ALL {
                    match (values.get(&metric), undefined.get(&metric)) {
                        (Some(value), _) => writeln!(f, "{:<22}{}", metric, value)?,
                        (None, Some(reason)) => writeln!(f, "{:<22}- ({})", metric, reason)?,
                        (None, None) => {}
                    }
                }
                Ok(())
            }
        }
    }
}

/// Score every input, reporting failures per file; errors only after all
/// inputs have been tried.
pub fn run(_cli: &crate::cli::Cli, args: &ScoreArgs) -> Result<()> {
    let options = FilterOptions { threshold: args.threshold };

    let mut reports = Vec::with_capacity(args.inputs.len());
    let mut failed = 0;
    for path in &args.inputs {
        match score_plan(path, &args.columns, &options) {
            Ok(plan) => reports.push(plan),
            Err(err) => {
                error!("{err:#}");
                failed += 1;
            }
        }
    }

    match args.format {
        OutputFormat::Text => {
            for plan in &reports {
                println!("== {} (threshold {}, {} removed)", plan.path.display(), plan.threshold, plan.removed);
                println!("{}", plan.scores);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    ensure!(failed == 0, "[score] {} of {} inputs could not be scored", failed, args.inputs.len());
    Ok(())
}

fn score_plan<'a>(path: &'a Path, columns: &ColumnArgs, options: &FilterOptions) -> Result<PlanReport<'a>> {
    info!("[score] reading intersections from {}", path.display());
    let pops = read_intersections(path, columns)?;

    let filtered = pops.filter_with(options);
    let removed = pops.len() - filtered.len();
    info!("[score] {} intersections kept, {} below threshold {}", filtered.len(), removed, options.threshold);

    let scores = match SplitReport::compute(&filtered) {
        Ok(report) => Scores::Complete(report),
        Err(err @ MetricError::Degenerate { .. }) => {
            warn!("[score] {}: {}", path.display(), err);
            Scores::partial(&filtered.county_index())
        }
        Err(err) => return Err(err).with_context(|| format!("[score] Cannot score {}", path.display())),
    };

    Ok(PlanReport { path, threshold: options.threshold, removed, scores })
}
