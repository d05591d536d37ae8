use thiserror::Error;

/// Errors produced by the matching and clustering engine
///
/// Missing optional input data never errors; scoring resolves those cases to
/// neutral fallback values. The hard failures are a population too small to
/// partition and a weight configuration that breaks the score range.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("insufficient data: {population} users cannot be partitioned into {required} clusters")]
    InsufficientData { population: usize, required: usize },

    #[error("scoring weights must sum to 1.0, got {sum}")]
    InvalidWeights { sum: f64 },
}

pub type Result<T> = std::result::Result<T, EngineError>;
