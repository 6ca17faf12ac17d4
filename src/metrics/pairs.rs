use crate::{
    error::{MetricError, Result},
    metrics::Metric,
    pops::{CountyIndex, IntersectionPopulations, RegionId},
};

/// Number of unordered pairs among `n` people, C(n, 2).
#[inline]
fn pairs(n: u64) -> u128 {
    let n = n as u128;
    n * n.saturating_sub(1) / 2
}

impl<C: RegionId> CountyIndex<'_, C> {
    /// Probability that two residents drawn from the same county also share a
    /// district (Rand 1971, Wallace 1983).
    ///
    /// Counted as same-county-same-district pairs over same-county pairs.
    /// Fails when no county has two residents, since no pair can be drawn.
    pub fn preserved_pairs(&self) -> Result<f64> {
        // both sums are at most C(total, 2) < 2^127 while the total fits in u64
        let (same_district, same_county) = self.tallies()
            .fold((0u128, 0u128), |(same_district, same_county), tally| (
                same_district + tally.populations().iter().map(|&p| pairs(p)).sum::<u128>(),
                same_county + pairs(tally.total()),
            ));

        if same_county == 0 {
            return Err(MetricError::degenerate(Metric::PreservedPairs, "no county has more than one resident"));
        }
        Ok(same_district as f64 / same_county as f64)
    }
}

impl<C: RegionId, D: RegionId> IntersectionPopulations<C, D> {
    /// Probability that two residents of the same county share a district.
    pub fn preserved_pairs(&self) -> Result<f64> { self.county_index().preserved_pairs() }
}
