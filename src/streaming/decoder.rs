//! The assembled decode pipeline: bytes in, snapshots out.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use super::accumulator::MessageAccumulator;
use super::cancel::CancelHandle;
use crate::error::DecodeError;
use crate::wire::{FrameInterpreter, FrameSplitter, InterpreterConfig, WireFormat};
use crate::MessageSnapshot;

/// Configuration for one decode pipeline.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    interpreter: InterpreterConfig,
}

impl DecoderConfig {
    /// Create a config for the given wire format with default policy
    pub fn new(format: WireFormat) -> Self {
        Self {
            interpreter: InterpreterConfig::new(format),
        }
    }

    /// Replace the drop-marker list used for non-JSON debug lines
    pub fn with_drop_markers(mut self, markers: Vec<String>) -> Self {
        self.interpreter = self.interpreter.with_drop_markers(markers);
        self
    }

    /// The configured wire format
    pub fn format(&self) -> WireFormat {
        self.interpreter.format
    }
}

/// Synchronous decode pipeline for one request.
///
/// Composes the frame splitter, frame interpreter and message accumulator.
/// Feeding a chunk drains every complete frame it finishes and returns the
/// snapshots those frames produced, in order. The core is fully synchronous so
/// chunk-boundary behavior is testable without a runtime; [`decode_stream`]
/// adds the async driving loop.
#[derive(Debug)]
pub struct StreamDecoder {
    splitter: FrameSplitter,
    interpreter: FrameInterpreter,
    accumulator: MessageAccumulator,
}

impl StreamDecoder {
    /// Create a decoder for one request
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            splitter: FrameSplitter::new(config.interpreter.format),
            interpreter: FrameInterpreter::new(config.interpreter),
            accumulator: MessageAccumulator::new(),
        }
    }

    /// Feed a raw chunk, returning every snapshot it produced.
    ///
    /// Chunks may split frames anywhere, including inside a multi-byte UTF-8
    /// scalar; incomplete trailing data is buffered for the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<MessageSnapshot> {
        if self.is_done() {
            return Vec::new();
        }

        let mut snapshots = Vec::new();
        for frame in self.splitter.feed_bytes(chunk) {
            let Some(event) = self.interpreter.interpret(&frame) else {
                continue;
            };
            let terminal = matches!(event, crate::wire::StreamEvent::Done);
            if let Some(snapshot) = self.accumulator.apply(event) {
                snapshots.push(snapshot);
            }
            if terminal {
                break;
            }
        }
        snapshots
    }

    /// Whether the stream has terminated, either by an in-band `done` event or
    /// by the SSE `[DONE]` payload
    pub fn is_done(&self) -> bool {
        self.accumulator.is_done() || self.splitter.is_done()
    }
}

/// An async stream of message snapshots, one per state change.
pub type SnapshotStream = Pin<Box<dyn Stream<Item = Result<MessageSnapshot, DecodeError>> + Send>>;

/// Drive a decode pipeline over an async chunk stream.
///
/// This is a cooperative pull loop: all frames from the current chunk are
/// drained before the next read is awaited, so the pipeline never races ahead
/// of the transport. The loop stops on the terminal event, on the end of the
/// chunk stream, on the first transport error (yielded once as
/// [`DecodeError::Transport`]), or when the returned [`CancelHandle`] fires.
/// Cancellation yields nothing further; the chunk source is dropped, which
/// releases the transport's read handle.
pub fn decode_stream<S, B, E>(chunks: S, config: DecoderConfig) -> (SnapshotStream, CancelHandle)
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let handle = CancelHandle::new();
    let cancel = handle.clone();

    let stream = async_stream::stream! {
        let mut decoder = StreamDecoder::new(config);
        futures_util::pin_mut!(chunks);

        while !cancel.is_cancelled() {
            let Some(chunk) = chunks.next().await else {
                break;
            };
            if cancel.is_cancelled() {
                break;
            }
            match chunk {
                Ok(bytes) => {
                    for snapshot in decoder.feed(bytes.as_ref()) {
                        yield Ok(snapshot);
                    }
                    if decoder.is_done() {
                        break;
                    }
                }
                Err(err) => {
                    yield Err(DecodeError::Transport(err.to_string()));
                    break;
                }
            }
        }
        // `chunks` drops here, releasing the transport's read handle.
    };

    (Box::pin(stream), handle)
}

/// Like [`decode_stream`], for transports that may hand back no body at all.
pub fn decode_body<S, B, E>(
    body: Option<S>,
    config: DecoderConfig,
) -> Result<(SnapshotStream, CancelHandle), DecodeError>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let chunks = body.ok_or(DecodeError::MissingBody)?;
    Ok(decode_stream(chunks, config))
}
