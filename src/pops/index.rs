use ahash::AHashMap;
use log::debug;

use crate::pops::{IntersectionPopulations, RegionId};

/// Aggregates for a single county, gathered in one pass over the mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CountyTally {
    total: u64,             // Sum of the county's intersections
    largest: u64,           // Population of its plurality district
    populations: Vec<u64>,  // One value per district the county touches
}

impl CountyTally {
    fn push(&mut self, population: u64) {
        self.total += population;
        self.largest = self.largest.max(population);
        self.populations.push(population);
    }

    /// Total population of the county.
    #[inline] pub fn total(&self) -> u64 { self.total }

    /// Largest single intersection in the county.
    #[inline] pub fn largest(&self) -> u64 { self.largest }

    /// Number of districts the county intersects.
    #[inline] pub fn num_districts(&self) -> usize { self.populations.len() }

    /// Intersection populations, one per district, in no particular order.
    #[inline] pub fn populations(&self) -> &[u64] { &self.populations }

    /// Returns true if the county is divided among two or more districts.
    #[inline] pub fn is_split(&self) -> bool { self.num_districts() > 1 }
}

/// County-keyed view of an [`IntersectionPopulations`] mapping.
///
/// Every metric needs per-county groupings; building them once keeps each
/// metric linear in the number of intersections.
#[derive(Clone, Debug)]
pub struct CountyIndex<'a, C> {
    counties: AHashMap<&'a C, CountyTally>,
    total: u64,
    intersections: usize,
}

impl<'a, C: RegionId> CountyIndex<'a, C> {
    /// County totals are bounded by the mapping's grand total, which is
    /// checked against `u64::MAX` on every write.
    pub(crate) fn build<D: RegionId>(pops: &'a IntersectionPopulations<C, D>) -> Self {
        let counties = pops.counties()
            .map(|(county, districts)| {
                let mut tally = CountyTally::default();
                districts.values().for_each(|&population| tally.push(population));
                (county, tally)
            })
            .collect::<AHashMap<_, _>>();

        let total = pops.total_population();
        debug!("[index] {} intersections across {} counties, total population {}",
            pops.len(), counties.len(), total);
        Self { counties, total, intersections: pops.len() }
    }

    /// Total population across every county.
    #[inline] pub fn total_population(&self) -> u64 { self.total }

    /// Number of distinct counties.
    #[inline] pub fn num_counties(&self) -> usize { self.counties.len() }

    /// Number of (county, district) intersections indexed.
    #[inline] pub fn num_intersections(&self) -> usize { self.intersections }

    /// Aggregates for one county.
    pub fn get(&self, county: &C) -> Option<&CountyTally> { self.counties.get(county) }

    /// Iterate over counties and their aggregates in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a C, &CountyTally)> + '_ {
        self.counties.iter().map(|(&county, tally)| (county, tally))
    }

    /// Iterate over tallies only.
    #[inline]
    pub(crate) fn tallies(&self) -> impl Iterator<Item = &CountyTally> + '_ { self.counties.values() }
}
