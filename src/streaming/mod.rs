//! Stream assembly: events to snapshots, and the async pipeline driver.
//!
//! [`MessageAccumulator`] folds classified events into running message state and
//! projects an immutable [`crate::MessageSnapshot`] on every state change.
//! [`StreamDecoder`] composes splitter, interpreter and accumulator into a
//! byte-in / snapshot-out pipeline; [`decode_stream`] drives it over an async
//! chunk stream with cooperative cancellation.

mod accumulator;
mod cancel;
mod decoder;

pub use accumulator::MessageAccumulator;
pub use cancel::CancelHandle;
pub use decoder::{decode_body, decode_stream, DecoderConfig, SnapshotStream, StreamDecoder};

#[cfg(test)]
mod tests;
