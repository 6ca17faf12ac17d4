use crate::pops::{CountyIndex, CountyTally, IntersectionPopulations, RegionId};

impl<'a, C: RegionId> CountyIndex<'a, C> {
    /// Count the counties divided among two or more districts.
    pub fn counties_split(&self) -> usize { self.tallies().filter(|tally| tally.is_split()).count() }

    /// Iterate over the split counties in arbitrary order.
    pub fn split_counties(&self) -> impl Iterator<Item = &'a C> + '_ {
        self.iter().filter(|(_, tally)| tally.is_split()).map(|(county, _)| county)
    }

    /// Total number of (county, district) intersections.
    #[inline] pub fn county_intersections(&self) -> usize { self.num_intersections() }

    /// Largest number of districts any one county is divided into.
    pub fn max_districts_per_county(&self) -> usize {
        self.tallies().map(CountyTally::num_districts).max().unwrap_or(0)
    }
}

impl<C: RegionId, D: RegionId> IntersectionPopulations<C, D> {
    /// Count the counties divided among two or more districts.
    pub fn counties_split(&self) -> usize { self.county_index().counties_split() }

    /// Total number of (county, district) intersections.
    #[inline] pub fn county_intersections(&self) -> usize { self.len() }

    /// Split counties, sorted by identifier.
    pub fn split_counties(&self) -> Vec<&C> where C: Ord {
        let mut counties = self.county_index().split_counties().collect::<Vec<_>>();
        counties.sort_unstable();
        counties
    }
}
