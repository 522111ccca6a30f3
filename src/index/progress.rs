use std::sync::atomic::{AtomicU64, Ordering};

/// Highest block height fully processed by the ingestion loop.
///
/// Readers may call [`current_height`](Self::current_height) from any task.
/// The ingestion loop is the only writer and only ever advances the value.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    height: AtomicU64,
}

impl ProgressTracker {
    pub fn new(start_height: u64) -> Self {
        Self {
            height: AtomicU64::new(start_height),
        }
    }

    pub fn current_height(&self) -> u64 {
        self.height.load(Ordering::Acquire)
    }

    /// Record `height` as processed. Monotonicity is not checked here.
    pub fn advance(&self, height: u64) {
        self.height.store(height, Ordering::Release);
    }
}
