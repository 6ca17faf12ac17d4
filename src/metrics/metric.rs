use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    pops::{CountyIndex, IntersectionPopulations, RegionId},
};

/// One of the county-splitting statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Number of counties divided among two or more districts.
    CountiesSplit,
    /// Number of (county, district) intersections.
    CountyIntersections,
    /// Probability that two residents of a county share a district.
    PreservedPairs,
    /// Fraction of residents in their county's plurality district.
    LargestIntersection,
    /// Conditional entropy of districts given counties, scaled to (0, 1].
    MinEntropy,
}

impl Metric {
    /// Every metric, in reporting order.
    pub const ALL: [Metric; 5] = [
        Metric::CountiesSplit,
        Metric::CountyIntersections,
        Metric::PreservedPairs,
        Metric::LargestIntersection,
        Metric::MinEntropy,
    ];

    /// Get a short name for this metric (for display purposes).
    pub fn short_name(&self) -> &'static str {
        match self {
            Metric::CountiesSplit => "CountiesSplit",
            Metric::CountyIntersections => "CountyIntersections",
            Metric::PreservedPairs => "PreservedPairs",
            Metric::LargestIntersection => "LargestIntersection",
            Metric::MinEntropy => "MinEntropy",
        }
    }

    /// Evaluate this metric for a population mapping.
    pub fn compute<C: RegionId, D: RegionId>(&self, pops: &IntersectionPopulations<C, D>) -> Result<MetricValue> {
        self.compute_indexed(&pops.county_index())
    }

    /// Evaluate this metric against a prebuilt county index.
    pub fn compute_indexed<C: RegionId>(&self, index: &CountyIndex<'_, C>) -> Result<MetricValue> {
        Ok(match self {
            Metric::CountiesSplit => MetricValue::Count(index.counties_split()),
            Metric::CountyIntersections => MetricValue::Count(index.county_intersections()),
            Metric::PreservedPairs => MetricValue::Score(index.preserved_pairs()?),
            Metric::LargestIntersection => MetricValue::Score(index.largest_intersection()?),
            Metric::MinEntropy => MetricValue::Score(index.min_entropy()?),
        })
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.short_name())
    }
}

/// Result of evaluating a [`Metric`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(usize),
    Score(f64),
}

impl MetricValue {
    /// The value as a float, for aggregation across plans.
    pub fn as_f64(&self) -> f64 {
        match *self {
            MetricValue::Count(count) => count as f64,
            MetricValue::Score(score) => score,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(count) => write!(f, "{}", count),
            MetricValue::Score(score) => write!(f, "{:.4}", score),
        }
    }
}
