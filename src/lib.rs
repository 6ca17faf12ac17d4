#![doc = "County-split metrics for redistricting plans"]
mod error;
mod metrics;
mod pops;
mod report;

#[doc(inline)]
pub use error::{MetricError, Result};

#[doc(inline)]
pub use pops::{CountyIndex, CountyTally, FilterOptions, IntersectionPopulations, RegionId, DEFAULT_THRESHOLD};

#[doc(inline)]
pub use metrics::{Metric, MetricValue};

#[doc(inline)]
pub use report::SplitReport;
