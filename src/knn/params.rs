//! Builder parameters and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{KnnError, Result};

/// Shared flag checked by every unit of parallel work before it starts.
///
/// Cloning shares the flag. Once cancelled a token stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Parameters for [`KnnBuilder`](super::KnnBuilder).
#[derive(Clone, Debug, Default)]
pub struct KnnParams {
    /// Worker pool size. `None` lets rayon pick (available parallelism).
    pub num_threads: Option<usize>,

    /// Optional cancellation flag. Without one, calls run to completion.
    pub cancel: Option<CancelToken>,
}

impl KnnParams {
    #[must_use]
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_threads == Some(0) {
            return Err(KnnError::InvalidParameter(
                "num_threads must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
