use crate::metrics::Metric;

/// Errors raised while building a population mapping or scoring it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    /// The statistic's denominator is zero, so no score exists.
    #[error("{metric} is undefined: {reason}")]
    Degenerate { metric: Metric, reason: &'static str },

    /// A population count below zero reached the mapping boundary.
    #[error("negative population {value} for county '{county}', district '{district}'")]
    NegativePopulation { county: String, district: String, value: i64 },

    /// Adding an intersection would push the plan total past `u64::MAX`.
    #[error("population total overflows at county '{county}', district '{district}'")]
    PopulationOverflow { county: String, district: String },
}

impl MetricError {
    pub(crate) fn degenerate(metric: Metric, reason: &'static str) -> Self {
        Self::Degenerate { metric, reason }
    }
}

pub type Result<T, E = MetricError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_message_names_metric() {
        let err = MetricError::degenerate(Metric::PreservedPairs, "no county has two residents");
        assert_eq!(err.to_string(), "PreservedPairs is undefined: no county has two residents");
    }

    #[test]
    fn negative_message_names_pair() {
        let err = MetricError::NegativePopulation { county: "31001".into(), district: "2".into(), value: -4 };
        assert_eq!(err.to_string(), "negative population -4 for county '31001', district '2'");
    }

    #[test]
    fn overflow_message_names_pair() {
        let err = MetricError::PopulationOverflow { county: "31001".into(), district: "2".into() };
        assert_eq!(err.to_string(), "population total overflows at county '31001', district '2'");
    }
}
