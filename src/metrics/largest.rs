use crate::{
    error::{MetricError, Result},
    metrics::Metric,
    pops::{CountyIndex, CountyTally, IntersectionPopulations, RegionId},
};

impl<C: RegionId> CountyIndex<'_, C> {
    /// Fraction of residents living in their county's plurality district.
    ///
    /// Equivalently, the share who would guess their district correctly by
    /// picking the one holding most of their county. Adapted from Goodman and
    /// Kruskal (1954).
    pub fn largest_intersection(&self) -> Result<f64> {
        if self.total_population() == 0 {
            return Err(MetricError::degenerate(Metric::LargestIntersection, "total population is zero"));
        }
        // each maximum is bounded by its county total
        let largest = self.tallies().map(CountyTally::largest).sum::<u64>();
        Ok(largest as f64 / self.total_population() as f64)
    }
}

impl<C: RegionId, D: RegionId> IntersectionPopulations<C, D> {
    /// Fraction of residents living in their county's plurality district.
    pub fn largest_intersection(&self) -> Result<f64> { self.county_index().largest_intersection() }
}
