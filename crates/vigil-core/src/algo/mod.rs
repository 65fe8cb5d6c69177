//! Boolean anomaly detectors.
//!
//! Every detector maps a time-ordered window to "anomalous" / "not
//! anomalous" and resolves windows that are too short to a plain `false`.
//! Thresholds are fixed. Detectors are independent of each other and of call
//! order, so an external policy can run any subset and combine the verdicts.

pub mod histogram_bins;
pub mod ks_test;
pub mod least_squares;
pub mod mad;
pub mod moving_average;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownAlgorithm;
use crate::measurement::{Measurement, values};

// Re-exports for convenience
pub use histogram_bins::histogram_bins;
pub use ks_test::{KsOutcome, ks_test, ks_test_outcome};
pub use least_squares::least_squares;
pub use mad::median_absolute_deviation;
pub use moving_average::{
    first_hour_average, mean_subtraction_cumulation, simple_stddev_from_moving_average,
    stddev_from_moving_average,
};

/// The single "current time" reference for one evaluation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalContext {
    /// Unix seconds
    pub now: i64,
    /// Span of history the window is expected to cover, in seconds
    pub full_duration: i64,
}

impl EvalContext {
    pub fn at(now: i64, full_duration: i64) -> Self {
        Self { now, full_duration }
    }

    /// Context anchored at the wall clock.
    pub fn current(full_duration: i64) -> Self {
        Self::at(chrono::Utc::now().timestamp(), full_duration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    MedianAbsoluteDeviation,
    FirstHourAverage,
    SimpleStddevFromMovingAverage,
    StddevFromMovingAverage,
    MeanSubtractionCumulation,
    LeastSquares,
    HistogramBins,
    KsTest,
}

impl Algorithm {
    pub const ALL: [Algorithm; 8] = [
        Self::MedianAbsoluteDeviation,
        Self::FirstHourAverage,
        Self::SimpleStddevFromMovingAverage,
        Self::StddevFromMovingAverage,
        Self::MeanSubtractionCumulation,
        Self::LeastSquares,
        Self::HistogramBins,
        Self::KsTest,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::MedianAbsoluteDeviation => "median_absolute_deviation",
            Self::FirstHourAverage => "first_hour_average",
            Self::SimpleStddevFromMovingAverage => "simple_stddev_from_moving_average",
            Self::StddevFromMovingAverage => "stddev_from_moving_average",
            Self::MeanSubtractionCumulation => "mean_subtraction_cumulation",
            Self::LeastSquares => "least_squares",
            Self::HistogramBins => "histogram_bins",
            Self::KsTest => "ks_test",
        }
    }

    /// Run this detector over `window`.
    ///
    /// The window is only read; detectors that rewrite values get their own
    /// copy.
    pub fn run(&self, window: &[Measurement], ctx: &EvalContext) -> bool {
        match self {
            Self::MedianAbsoluteDeviation => median_absolute_deviation(&values(window)),
            Self::FirstHourAverage => first_hour_average(window, ctx.full_duration, ctx.now),
            Self::SimpleStddevFromMovingAverage => {
                simple_stddev_from_moving_average(&values(window))
            }
            Self::StddevFromMovingAverage => stddev_from_moving_average(&values(window)),
            Self::MeanSubtractionCumulation => mean_subtraction_cumulation(values(window)),
            Self::LeastSquares => least_squares(window),
            Self::HistogramBins => histogram_bins(&values(window)),
            Self::KsTest => ks_test(window, ctx.now),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| UnknownAlgorithm(wanted.to_string()))
    }
}
