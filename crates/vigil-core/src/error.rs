use thiserror::Error;

/// Precondition violations in the numeric primitives.
///
/// Degenerate but valid input (zero variance, empty windows) never produces
/// one of these; it resolves to `0.0` or a "not anomalous" verdict instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("invalid argument to {function}: {value} (must be a non-negative number)")]
    InvalidArgument { function: &'static str, value: f64 },

    #[error("sample {0} is empty")]
    EmptySample(&'static str),
}

/// A detector name that does not match any [`crate::Algorithm`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm: {0:?}")]
pub struct UnknownAlgorithm(pub String);
