pub mod ewma;
pub mod histogram;
pub mod ks;
pub mod moments;
pub mod regression;

// Re-exports for convenience
pub use ewma::{ewm_std, ewma};
pub use histogram::{Histogram, histogram};
pub use ks::{KsStatistic, empirical_cdf_index, pks, qks, searchsorted, two_sample_ks};
pub use moments::{covariance, mean, median, std, tail_avg, variance};
pub use regression::linear_regression_lse;
