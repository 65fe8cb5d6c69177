//! Vigil Core: Streaming Anomaly Detection Primitives
//!
//! Statistical detectors that decide whether the most recent behaviour of a
//! metric is anomalous, given a bounded, time-ordered window of measurements.
//!
//! - [`stats`]: moments, regression, exponential weighting, histograms and
//!   the two-sample Kolmogorov-Smirnov test
//! - [`algo`]: the boolean detectors and their shared calling convention
//! - [`trigger`]: per-metric trigger history ("is this alert itself unusual?")
//!
//! Everything here is pure and CPU-bound. The only state is the trigger
//! history, which the caller owns and passes in on every call.

pub mod algo;
pub mod error;
pub mod measurement;
pub mod stats;
pub mod trigger;

pub use algo::{Algorithm, EvalContext};
pub use error::{StatsError, UnknownAlgorithm};
pub use measurement::{Measurement, TriggerRecord};
pub use trigger::{TriggerHistory, TriggerSink, TriggerVerdict};
