//! Streaming chat response decoder
//!
//! This crate turns a raw, incrementally-delivered byte stream from a chat backend
//! into a well-formed, ever-growing sequence of structured message snapshots that a
//! UI layer can render wholesale on each update.
//!
//! Three wire sub-formats are supported behind a single pipeline: SSE-style
//! `data: ` lines, newline-delimited JSON objects (NDJSON), and a plain-text
//! fallback where every chunk is literal assistant text.
//!
//! ## Pipeline
//!
//! ```text
//! bytes -> FrameSplitter -> frames -> FrameInterpreter -> events
//!       -> MessageAccumulator -> MessageSnapshot -> UI
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use chatframe::{DecoderConfig, StreamDecoder, WireFormat};
//!
//! let mut decoder = StreamDecoder::new(DecoderConfig::new(WireFormat::Ndjson));
//!
//! // Chunks may split frames anywhere; the decoder reassembles them.
//! let snapshots = decoder.feed(b"{\"type\":\"text\",\"data\":\"Hel\"}\n{\"type\":\"te");
//! assert_eq!(snapshots.len(), 1);
//! let snapshots = decoder.feed(b"xt\",\"data\":\"lo\"}\n");
//! assert_eq!(snapshots[0].text(), Some("Hello"));
//! ```
//!
//! ## Core Principles
//!
//! 1. **Boundary Independence**: the final snapshot never depends on how the
//!    transport split the byte stream into chunks.
//! 2. **Degrade, Don't Crash**: malformed upstream framing becomes literal text
//!    rather than an error; only transport-level failures are fatal.
//! 3. **Stable Ordering**: tool calls render in first-seen order, followed by the
//!    aggregated text, in every snapshot.
//! 4. **Per-Request Isolation**: one decoder instance owns one stream; no shared
//!    mutable state, no locking.

use serde::{Deserialize, Serialize};

// ============================================================================
// Errors
// ============================================================================

pub mod error;
pub use error::DecodeError;

// ============================================================================
// Wire-Level Decoding (frames and events)
// ============================================================================

pub mod wire;
pub use wire::{FrameInterpreter, FrameSplitter, InterpreterConfig, StreamEvent, WireFormat};

// ============================================================================
// Stream Assembly
// ============================================================================

pub mod streaming;
pub use streaming::{
    decode_body, decode_stream, CancelHandle, DecoderConfig, MessageAccumulator, SnapshotStream,
    StreamDecoder,
};

// ============================================================================
// Snapshot Types
// ============================================================================

/// A tool invocation observed on the stream, together with its result once seen.
///
/// Records are owned by the accumulator, created on the first `tool_call` event
/// for an id and updated in place afterwards; they are never removed within one
/// stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Unique identifier for this tool call (unique within one stream)
    pub id: String,
    /// Name of the invoked tool
    pub name: String,
    /// Input arguments as an opaque JSON value
    pub args: serde_json::Value,
    /// Canonical pretty-printed serialization of `args`
    pub args_text: String,
    /// Result of the call, once the matching `tool_result` event arrives
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl ToolCallRecord {
    /// Create a record for a newly observed tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, args: serde_json::Value) -> Self {
        let args_text = canonical_args_text(&args);
        Self {
            id: id.into(),
            name: name.into(),
            args,
            args_text,
            result: None,
        }
    }
}

/// Canonical serialized form of tool arguments (two-space indented JSON).
pub(crate) fn canonical_args_text(args: &serde_json::Value) -> String {
    serde_json::to_string_pretty(args).unwrap_or_else(|_| args.to_string())
}

/// One part of a message snapshot
///
/// Serializes with a `type` tag and flattened fields, so the UI boundary can
/// consume snapshots as plain JSON without knowing this crate's types:
/// `{"type":"tool_call","id":...}` / `{"type":"text","text":...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    /// Aggregated assistant text accumulated so far
    Text {
        /// The full text, not a delta
        text: String,
    },
    /// A tool call and (optionally) its result
    ToolCall {
        /// Unique identifier for this tool call
        id: String,
        /// Name of the invoked tool
        name: String,
        /// Input arguments
        args: serde_json::Value,
        /// Canonical pretty-printed serialization of `args`
        args_text: String,
        /// Result, if the matching tool_result has been seen
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<serde_json::Value>,
    },
}

impl MessagePart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Get the text from a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Get tool call information (id, name, args)
    pub fn as_tool_call(&self) -> Option<(&str, &str, &serde_json::Value)> {
        match self {
            Self::ToolCall { id, name, args, .. } => Some((id, name, args)),
            _ => None,
        }
    }
}

impl From<&ToolCallRecord> for MessagePart {
    fn from(record: &ToolCallRecord) -> Self {
        Self::ToolCall {
            id: record.id.clone(),
            name: record.name.clone(),
            args: record.args.clone(),
            args_text: record.args_text.clone(),
            result: record.result.clone(),
        }
    }
}

/// A complete point-in-time view of the assistant turn being streamed
///
/// Parts are ordered: all tool-call records in first-seen order, then a single
/// aggregated text part if any text has accumulated. Each snapshot is a total
/// replacement of the previous one; consumers re-render wholesale rather than
/// patching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSnapshot {
    /// Ordered message parts
    pub parts: Vec<MessagePart>,
}

impl MessageSnapshot {
    /// Get the aggregated text part, if any text has accumulated
    pub fn text(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| part.as_text())
    }

    /// Iterate over the tool-call parts in first-seen order
    pub fn tool_calls(&self) -> impl Iterator<Item = &MessagePart> {
        self.parts
            .iter()
            .filter(|part| matches!(part, MessagePart::ToolCall { .. }))
    }

    /// Check whether the snapshot has no parts at all
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
