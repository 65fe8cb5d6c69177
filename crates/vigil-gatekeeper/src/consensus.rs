//! Combines independent detector verdicts into one decision.

use serde::Serialize;
use vigil_core::{Algorithm, EvalContext, Measurement};

use crate::config::ConfigError;

/// Default quorum when every detector runs.
pub const DEFAULT_QUORUM: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsensusVerdict {
    pub anomalous: bool,
    /// Detectors that fired, in policy order
    pub fired: Vec<Algorithm>,
}

#[derive(Debug, Clone)]
pub struct ConsensusPolicy {
    algorithms: Vec<Algorithm>,
    quorum: usize,
    min_points: usize,
}

impl ConsensusPolicy {
    pub fn new(
        algorithms: Vec<Algorithm>,
        quorum: usize,
        min_points: usize,
    ) -> Result<Self, ConfigError> {
        if algorithms.is_empty() {
            return Err(ConfigError::NoAlgorithms);
        }
        if quorum == 0 {
            return Err(ConfigError::ZeroQuorum);
        }
        if quorum > algorithms.len() {
            return Err(ConfigError::QuorumTooLarge {
                quorum,
                algorithms: algorithms.len(),
            });
        }
        Ok(Self {
            algorithms,
            quorum,
            min_points,
        })
    }

    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    pub fn quorum(&self) -> usize {
        self.quorum
    }

    /// Run every configured detector over `window`. `None` when the window
    /// has fewer than `min_points` measurements.
    pub fn evaluate(&self, window: &[Measurement], ctx: &EvalContext) -> Option<ConsensusVerdict> {
        if window.len() < self.min_points {
            return None;
        }
        let fired: Vec<Algorithm> = self
            .algorithms
            .iter()
            .copied()
            .filter(|algorithm| algorithm.run(window, ctx))
            .collect();
        Some(ConsensusVerdict {
            anomalous: fired.len() >= self.quorum,
            fired,
        })
    }
}

impl Default for ConsensusPolicy {
    fn default() -> Self {
        Self {
            algorithms: Algorithm::ALL.to_vec(),
            quorum: DEFAULT_QUORUM,
            min_points: 10,
        }
    }
}
