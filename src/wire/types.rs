//! Type definitions for wire frames and events.

use serde::{Deserialize, Serialize};

/// Wire sub-format spoken by the backend.
///
/// The original system grew three near-duplicate response adapters; here they
/// are three interpretation strategies behind one splitter/accumulator pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    /// SSE-style `data: <payload>` lines, terminated by a `[DONE]` payload
    Sse,
    /// Newline-delimited JSON objects with an in-band `done` event
    Ndjson,
    /// Unframed plain text; every chunk is literal assistant text
    Text,
}

/// A classified stream event, produced once per complete frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StreamEvent {
    /// Incremental assistant text to append (a delta, not a replacement)
    TextDelta(String),
    /// A newly invoked tool; `id` is unique within the stream
    ToolCall {
        id: String,
        name: String,
        args: serde_json::Value,
    },
    /// Result for a previously seen call id. Delivery order is not guaranteed,
    /// so the id may reference a call that was never observed.
    ToolResult {
        id: String,
        result: serde_json::Value,
    },
    /// Terminal marker; no further events follow
    Done,
    /// Payload that failed structured parsing, surfaced as literal text
    FallbackText(String),
}

/// Policy knobs for frame interpretation.
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Wire sub-format to interpret frames as
    pub format: WireFormat,
    /// Non-JSON frames containing any of these substrings are dropped instead
    /// of becoming fallback text. Guards against upstreams that leak
    /// half-formed tool-call diagnostics onto the text channel.
    pub drop_markers: Vec<String>,
}

impl InterpreterConfig {
    /// Default marker for tool-call-shaped debug lines
    pub const DEFAULT_DROP_MARKER: &'static str = "[Tool Call:";

    /// Create a config for the given format with the default drop markers
    pub fn new(format: WireFormat) -> Self {
        Self {
            format,
            drop_markers: vec![Self::DEFAULT_DROP_MARKER.to_string()],
        }
    }

    /// Replace the drop-marker list
    pub fn with_drop_markers(mut self, markers: Vec<String>) -> Self {
        self.drop_markers = markers;
        self
    }
}
