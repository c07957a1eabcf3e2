//! Error types for pathknn.

use thiserror::Error;

/// Errors that can occur while measuring paths or building neighbor lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KnnError {
    /// Both compared segment sequences were empty, so the normalized distance
    /// would divide by zero.
    #[error("invalid metric input: both segment sequences are empty")]
    InvalidMetricInput,

    /// A row unit of the parallel phase failed. No partial result is returned.
    #[error("worker failure on row {row}: {reason}")]
    WorkerFailure { row: usize, reason: String },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The worker pool could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// A [`CancelToken`](crate::knn::CancelToken) was triggered mid-run.
    #[error("operation cancelled")]
    Cancelled,
}

impl From<rayon::ThreadPoolBuildError> for KnnError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(e.to_string())
    }
}

/// Result type for pathknn operations.
pub type Result<T> = std::result::Result<T, KnnError>;
