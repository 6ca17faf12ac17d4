use std::fmt;

use serde::Serialize;

use crate::{
    error::Result,
    metrics::Metric,
    pops::{IntersectionPopulations, RegionId},
};

/// Every county-splitting statistic for one plan, computed from a single
/// county index.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SplitReport {
    pub counties: usize,
    pub districts: usize,
    pub total_population: u64,
    pub counties_split: usize,
    pub county_intersections: usize,
    /// Most districts any single county is divided into.
    pub max_districts_per_county: usize,
    pub preserved_pairs: f64,
    pub largest_intersection: f64,
    pub conditional_entropy: f64,
    pub min_entropy: f64,
    /// Identifiers of the split counties, sorted.
    pub split_counties: Vec<String>,
}

impl SplitReport {
    /// Score a (typically already filtered) mapping.
    /// Fails with the first degenerate statistic encountered.
    pub fn compute<C: RegionId, D: RegionId>(pops: &IntersectionPopulations<C, D>) -> Result<Self> {
        let index = pops.county_index();
        let conditional_entropy = index.conditional_entropy()?;

        let mut split_counties = index.split_counties().map(ToString::to_string).collect::<Vec<_>>();
        split_counties.sort_unstable();

        Ok(Self {
            counties: index.num_counties(),
            districts: pops.num_districts(),
            total_population: index.total_population(),
            counties_split: index.counties_split(),
            county_intersections: index.county_intersections(),
            max_districts_per_county: index.max_districts_per_county(),
            preserved_pairs: index.preserved_pairs()?,
            largest_intersection: index.largest_intersection()?,
            conditional_entropy,
            min_entropy: 1.0 / (1.0 + conditional_entropy),
            split_counties,
        })
    }
}

impl fmt::Display for SplitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<22}{}", "Counties", self.counties)?;
        writeln!(f, "{:<22}{}", "Districts", self.districts)?;
        writeln!(f, "{:<22}{}", "Population", self.total_population)?;
        writeln!(f, "{:<22}{}", Metric::CountiesSplit, self.counties_split)?;
        writeln!(f, "{:<22}{}", Metric::CountyIntersections, self.county_intersections)?;
        writeln!(f, "{:<22}{}", "Max districts/county", self.max_districts_per_county)?;
        writeln!(f, "{:<22}{:.4}", Metric::PreservedPairs, self.preserved_pairs)?;
        writeln!(f, "{:<22}{:.4}", Metric::LargestIntersection, self.largest_intersection)?;
        write!(f, "{:<22}{:.4} (H = {:.4} bits)", Metric::MinEntropy, self.min_entropy, self.conditional_entropy)
    }
}
