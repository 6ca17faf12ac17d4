use crate::{
    error::{MetricError, Result},
    metrics::Metric,
    pops::{CountyIndex, CountyTally, IntersectionPopulations, RegionId},
};

/// Sum of p * log2(p / P) over a county's intersections; never positive.
/// Empty intersections contribute nothing, the limit of p * log(p) at zero.
fn weighted_log_share(tally: &CountyTally) -> f64 {
    let total = tally.total() as f64;
    tally.populations().iter()
        .filter(|&&population| population > 0)
        .map(|&population| {
            let population = population as f64;
            population * (population / total).log2()
        })
        .sum()
}

impl<C: RegionId> CountyIndex<'_, C> {
    /// Conditional entropy of the district partition given the county
    /// partition, in bits. Zero when no county is split; a county split into
    /// k equal pieces contributes log2(k).
    pub fn conditional_entropy(&self) -> Result<f64> {
        if self.total_population() == 0 {
            return Err(MetricError::degenerate(Metric::MinEntropy, "total population is zero"));
        }
        let weighted = self.tallies().map(weighted_log_share).sum::<f64>();
        Ok(-weighted / self.total_population() as f64)
    }

    /// Conditional entropy rescaled to (0, 1] as `1 / (1 + H)`, where 1 means
    /// every county sits inside a single district.
    pub fn min_entropy(&self) -> Result<f64> { Ok(1.0 / (1.0 + self.conditional_entropy()?)) }
}

impl<C: RegionId, D: RegionId> IntersectionPopulations<C, D> {
    /// Conditional entropy of districts given counties, in bits.
    pub fn conditional_entropy(&self) -> Result<f64> { self.county_index().conditional_entropy() }

    /// Conditional entropy rescaled to (0, 1].
    pub fn min_entropy(&self) -> Result<f64> { self.county_index().min_entropy() }
}
