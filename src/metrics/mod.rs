mod entropy;
mod largest;
mod metric;
mod pairs;
mod splits;

pub use metric::{Metric, MetricValue};
