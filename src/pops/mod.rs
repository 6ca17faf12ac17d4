mod filter;
mod index;
mod pops;

pub use filter::{FilterOptions, DEFAULT_THRESHOLD};
pub use index::{CountyIndex, CountyTally};
pub use pops::{IntersectionPopulations, RegionId};
