//! Error types for the decoding pipeline.
//!
//! Only transport-level conditions are errors. Malformed frames degrade to
//! literal text, orphan tool results are dropped, and cancellation is a clean
//! stop; none of those surface here.

use thiserror::Error;

/// A fatal decoding failure.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The transport failed before or during the stream (non-OK response,
    /// connection reset, read error). Aborts the pipeline.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response carried no readable byte stream, so no frames can be
    /// produced.
    #[error("response has no readable body")]
    MissingBody,
}
