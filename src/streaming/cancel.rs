//! Cooperative cancellation for in-flight decode pipelines.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable handle that requests a clean stop of a decode pipeline.
///
/// Cancellation is not an error: the driving loop stops issuing reads, drops
/// the chunk source (which releases the transport's read handle), and emits
/// neither a terminal snapshot nor a failure.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Create a new, un-cancelled handle
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The pipeline observes the flag between reads.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
