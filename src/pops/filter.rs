use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::pops::{IntersectionPopulations, RegionId};

/// Default minimum population for an intersection to count.
/// Polygon overlays leave slivers with a handful of residents that would
/// otherwise register as phantom splits.
pub const DEFAULT_THRESHOLD: u64 = 50;

/// Noise filter settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Intersections with population strictly below this are dropped.
    pub threshold: u64,
}

impl Default for FilterOptions {
    fn default() -> Self { Self { threshold: DEFAULT_THRESHOLD } }
}

impl<C: RegionId, D: RegionId> IntersectionPopulations<C, D> {
    /// Return a copy without the intersections whose population is below `threshold`.
    /// The source mapping is left untouched.
    pub fn filter(&self, threshold: u64) -> Self {
        let filtered = Self::from_subset(self.iter()
            .filter(|&(_, _, population)| population >= threshold)
            .map(|(county, district, population)| (county.clone(), district.clone(), population)));

        debug!("[filter] removed {} of {} intersections below {}",
            self.len() - filtered.len(), self.len(), threshold);
        filtered
    }

    /// Same as [`filter`](Self::filter), reading the threshold from `options`.
    pub fn filter_with(&self, options: &FilterOptions) -> Self { self.filter(options.threshold) }

    /// Drop intersections below `threshold` in place, returning how many were removed.
    pub fn retain_at_least(&mut self, threshold: u64) -> usize {
        let before = self.len();
        let removed = self.retain_entries(|county, district, population| {
            let keep = population >= threshold;
            if !keep { trace!("[filter] dropping ({county}, {district}) with population {population}") }
            keep
        });

        debug!("[filter] removed {} of {} intersections below {}", removed, before, threshold);
        removed
    }
}
