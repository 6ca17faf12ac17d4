use std::{collections::hash_map::Entry, fmt, hash::Hash};

use ahash::{AHashMap, AHashSet};

use crate::{
    error::{MetricError, Result},
    pops::CountyIndex,
};

/// Opaque county or district identifier (FIPS code, district number, ...).
pub trait RegionId: Clone + Eq + Hash + fmt::Display {}

impl<T: Clone + Eq + Hash + fmt::Display> RegionId for T {}

/// Population living in each (county, district) intersection of a plan.
///
/// Values are stored unsigned, so a negative count can only be rejected at the
/// insertion boundary and never reaches a metric. The grand total is tracked
/// on every write and must fit in a `u64`; any county total, and any sum of
/// intersections, is bounded by it.
#[derive(Clone, Debug)]
pub struct IntersectionPopulations<C, D> {
    counties: AHashMap<C, AHashMap<D, u64>>,  // County -> district -> population, never an empty inner map
    len: usize,                               // Number of (county, district) pairs
    total: u64,                               // Sum of every population
}

impl<C: RegionId, D: RegionId> IntersectionPopulations<C, D> {
    /// Construct an empty mapping.
    pub fn new() -> Self { Self { counties: AHashMap::new(), len: 0, total: 0 } }

    /// Construct an empty mapping with room for `capacity` counties.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { counties: AHashMap::with_capacity(capacity), len: 0, total: 0 }
    }

    /// Build a mapping from raw (county, district, population) rows.
    /// Rows repeating a pair are summed, so finer units (blocks, block groups)
    /// can be fed directly and aggregate to county-district totals.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, D, i64)>,
    {
        let mut pops = Self::new();
        for (county, district, population) in entries {
            pops.accumulate(county, district, population)?;
        }
        Ok(pops)
    }

    /// Set the population of a pair, returning the value it replaced.
    pub fn insert(&mut self, county: C, district: D, population: i64) -> Result<Option<u64>> {
        let population = validate(&county, &district, population)?;
        let previous = self.get(&county, &district).unwrap_or(0);
        let total = (self.total - previous).checked_add(population)
            .ok_or_else(|| overflow(&county, &district))?;

        let replaced = self.counties.entry(county).or_default().insert(district, population);
        if replaced.is_none() { self.len += 1 }
        self.total = total;
        Ok(replaced)
    }

    /// Add to the population of a pair, returning the new value.
    pub fn accumulate(&mut self, county: C, district: D, population: i64) -> Result<u64> {
        let population = validate(&county, &district, population)?;
        let total = self.total.checked_add(population)
            .ok_or_else(|| overflow(&county, &district))?;

        let value = match self.counties.entry(county).or_default().entry(district) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.len += 1;
                entry.insert(0)
            }
        };
        // bounded by the new total
        *value += population;
        self.total = total;
        Ok(*value)
    }

    /// Population of a single intersection, if present.
    pub fn get(&self, county: &C, district: &D) -> Option<u64> {
        self.counties.get(county)?.get(district).copied()
    }

    /// Number of (county, district) intersections.
    #[inline] pub fn len(&self) -> usize { self.len }

    /// Returns true if the mapping holds no intersections.
    #[inline] pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Iterate over every intersection in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&C, &D, u64)> + '_ {
        self.counties.iter().flat_map(|(county, districts)| {
            districts.iter().map(move |(district, &population)| (county, district, population))
        })
    }

    /// Total population covered by the plan.
    #[inline] pub fn total_population(&self) -> u64 { self.total }

    /// Total population of one county across all of its districts.
    pub fn county_population(&self, county: &C) -> u64 {
        self.counties.get(county).map_or(0, |districts| districts.values().sum())
    }

    /// Number of distinct counties.
    #[inline] pub fn num_counties(&self) -> usize { self.counties.len() }

    /// Number of distinct districts.
    pub fn num_districts(&self) -> usize {
        self.counties.values().flat_map(|districts| districts.keys()).collect::<AHashSet<_>>().len()
    }

    /// Index the mapping by county for metric evaluation.
    pub fn county_index(&self) -> CountyIndex<'_, C> { CountyIndex::build(self) }

    /// Iterate over each county with its district populations.
    #[inline]
    pub(super) fn counties(&self) -> impl Iterator<Item = (&C, &AHashMap<D, u64>)> + '_ { self.counties.iter() }

    /// Build from distinct pairs taken out of an existing mapping, so the
    /// total cannot exceed the source's.
    pub(super) fn from_subset<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (C, D, u64)>,
    {
        let mut pops = Self::new();
        for (county, district, population) in entries {
            pops.counties.entry(county).or_default().insert(district, population);
            pops.len += 1;
            pops.total += population;
        }
        pops
    }

    /// Keep only the pairs accepted by `keep`, returning how many were removed.
    pub(super) fn retain_entries<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&C, &D, u64) -> bool,
    {
        let before = self.len;
        let (mut len, mut total) = (0, 0);
        self.counties.retain(|county, districts| {
            districts.retain(|district, population| keep(county, district, *population));
            len += districts.len();
            total += districts.values().sum::<u64>();
            !districts.is_empty()
        });

        self.len = len;
        self.total = total;
        before - len
    }
}

fn validate<C: RegionId, D: RegionId>(county: &C, district: &D, population: i64) -> Result<u64> {
    u64::try_from(population).map_err(|_| MetricError::NegativePopulation {
        county: county.to_string(),
        district: district.to_string(),
        value: population,
    })
}

fn overflow<C: RegionId, D: RegionId>(county: &C, district: &D) -> MetricError {
    MetricError::PopulationOverflow { county: county.to_string(), district: district.to_string() }
}

impl<C: RegionId, D: RegionId> Default for IntersectionPopulations<C, D> {
    fn default() -> Self { Self::new() }
}

impl<C: RegionId, D: RegionId> PartialEq for IntersectionPopulations<C, D> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self.total == other.total
            && self.iter().all(|(county, district, population)| other.get(county, district) == Some(population))
    }
}

impl<C: RegionId, D: RegionId> Eq for IntersectionPopulations<C, D> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IntersectionPopulations<&'static str, u32> {
        IntersectionPopulations::from_entries([
            ("A", 1, 100),
            ("A", 2, 30),
            ("B", 1, 50),
            ("C", 3, 7),
        ]).unwrap()
    }

    #[test]
    fn counts_and_totals() {
        let pops = sample();
        assert_eq!(pops.len(), 4);
        assert_eq!(pops.num_counties(), 3);
        assert_eq!(pops.num_districts(), 3);
        assert_eq!(pops.total_population(), 187);
        assert_eq!(pops.county_population(&"A"), 130);
        assert_eq!(pops.county_population(&"Z"), 0);
    }

    #[test]
    fn insert_replaces_and_returns_previous() {
        let mut pops = sample();
        assert_eq!(pops.insert("A", 1, 90).unwrap(), Some(100));
        assert_eq!(pops.insert("D", 4, 5).unwrap(), None);
        assert_eq!(pops.get(&"A", &1), Some(90));
        assert_eq!(pops.len(), 5);
        assert_eq!(pops.total_population(), 182);
    }

    #[test]
    fn from_entries_sums_repeated_pairs() {
        let pops = IntersectionPopulations::from_entries([
            ("A".to_string(), "1".to_string(), 10),
            ("A".to_string(), "1".to_string(), 15),
            ("A".to_string(), "2".to_string(), 3),
        ]).unwrap();
        assert_eq!(pops.len(), 2);
        assert_eq!(pops.get(&"A".to_string(), &"1".to_string()), Some(25));
        assert_eq!(pops.total_population(), 28);
    }

    #[test]
    fn negative_population_is_rejected() {
        let mut pops = sample();
        let err = pops.insert("A", 1, -1).unwrap_err();
        assert_eq!(err, MetricError::NegativePopulation {
            county: "A".into(),
            district: "1".into(),
            value: -1,
        });
        // the rejected write leaves the old value in place
        assert_eq!(pops.get(&"A", &1), Some(100));
    }

    #[test]
    fn negative_row_fails_bulk_construction() {
        let result = IntersectionPopulations::from_entries([("A", 1, 10), ("B", 2, -3)]);
        assert!(matches!(result, Err(MetricError::NegativePopulation { value: -3, .. })));
    }

    #[test]
    fn repeated_pair_past_u64_is_rejected() {
        let result = IntersectionPopulations::from_entries([
            ("A", 1, i64::MAX),
            ("A", 1, i64::MAX),
            ("A", 1, 2),
        ]);
        assert_eq!(result.unwrap_err(), MetricError::PopulationOverflow {
            county: "A".into(),
            district: "1".into(),
        });
    }

    #[test]
    fn total_across_counties_past_u64_is_rejected() {
        let result = IntersectionPopulations::from_entries([
            ("A", 1, i64::MAX),
            ("B", 1, i64::MAX),
            ("C", 1, 10),
        ]);
        assert!(matches!(result, Err(MetricError::PopulationOverflow { ref county, .. }) if county == "C"));

        let result = IntersectionPopulations::from_entries([("A", 1, i64::MAX); 3]);
        assert!(matches!(result, Err(MetricError::PopulationOverflow { .. })));
    }

    #[test]
    fn overflowing_write_leaves_mapping_unchanged() {
        let mut pops = IntersectionPopulations::from_entries([("A", 1, i64::MAX), ("B", 1, i64::MAX)]).unwrap();
        assert!(pops.accumulate("C", 1, 10).is_err());
        assert!(pops.insert("B", 2, 10).is_err());
        assert_eq!(pops.len(), 2);
        assert_eq!(pops.get(&"C", &1), None);
        assert_eq!(pops.total_population(), 2 * i64::MAX as u64);

        // replacing a value only counts the difference
        assert_eq!(pops.insert("A", 1, i64::MAX).unwrap(), Some(i64::MAX as u64));
        assert_eq!(pops.insert("A", 1, 1).unwrap(), Some(i64::MAX as u64));
        assert!(pops.accumulate("C", 1, 10).is_ok());
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let forward = IntersectionPopulations::from_entries([("A", 1, 5), ("B", 2, 8)]).unwrap();
        let backward = IntersectionPopulations::from_entries([("B", 2, 8), ("A", 1, 5)]).unwrap();
        let different = IntersectionPopulations::from_entries([("A", 1, 5), ("B", 2, 9)]).unwrap();
        assert_eq!(forward, backward);
        assert_ne!(forward, different);
    }

    #[test]
    fn empty_mapping() {
        let pops = IntersectionPopulations::<String, String>::default();
        assert!(pops.is_empty());
        assert_eq!(pops.total_population(), 0);
        assert_eq!(pops.num_counties(), 0);
    }
}
