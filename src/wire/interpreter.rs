//! Frame payload classification.

use super::types::{InterpreterConfig, StreamEvent, WireFormat};
use serde::Deserialize;

/// Structured wire payload, as emitted by the backend in the JSON formats.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WirePayload {
    /// Incremental text delta
    Text { data: String },
    /// Tool invocation
    ToolCall { data: WireToolCall },
    /// Tool execution result
    ToolResult { data: WireToolResult },
    /// End of stream
    Done,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    id: String,
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct WireToolResult {
    #[serde(rename = "toolCallId")]
    tool_call_id: String,
    #[serde(default)]
    result: serde_json::Value,
}

/// Classifies a complete frame's payload into a [`StreamEvent`].
///
/// Frames that fail structured parsing are not discarded: their literal text
/// becomes [`StreamEvent::FallbackText`], so a misbehaving upstream degrades to
/// "show it as text" instead of killing the stream. The one exception is
/// frames matching a configured drop marker, which are swallowed entirely.
#[derive(Debug, Clone)]
pub struct FrameInterpreter {
    config: InterpreterConfig,
}

impl FrameInterpreter {
    /// Create an interpreter with the given policy
    pub fn new(config: InterpreterConfig) -> Self {
        Self { config }
    }

    /// Classify one frame. Returns `None` for frames with nothing to apply
    /// (dropped diagnostics).
    pub fn interpret(&self, frame: &str) -> Option<StreamEvent> {
        if self.config.format == WireFormat::Text {
            return Some(StreamEvent::TextDelta(frame.to_string()));
        }

        match serde_json::from_str::<WirePayload>(frame) {
            Ok(WirePayload::Text { data }) => Some(StreamEvent::TextDelta(data)),
            Ok(WirePayload::ToolCall { data }) => Some(StreamEvent::ToolCall {
                id: data.id,
                name: data.name,
                args: data.args,
            }),
            Ok(WirePayload::ToolResult { data }) => Some(StreamEvent::ToolResult {
                id: data.tool_call_id,
                result: unwrap_result(data.result),
            }),
            Ok(WirePayload::Done) => Some(StreamEvent::Done),
            Err(err) => self.fallback(frame, err),
        }
    }

    /// Non-structured payload: drop known debug noise, surface the rest as text.
    fn fallback(&self, frame: &str, err: serde_json::Error) -> Option<StreamEvent> {
        if self
            .config
            .drop_markers
            .iter()
            .any(|marker| frame.contains(marker.as_str()))
        {
            tracing::debug!(frame = %frame, "dropping tool-call-shaped debug line");
            return None;
        }

        tracing::debug!(%err, "frame failed structured parsing, treating as text");
        Some(StreamEvent::FallbackText(frame.to_string()))
    }
}

/// Normalize the two result shapes the backend may send: a bare value, or an
/// object wrapping the actual value in an inner `result` field.
fn unwrap_result(result: serde_json::Value) -> serde_json::Value {
    match result {
        serde_json::Value::Object(mut map) if map.contains_key("result") => {
            map.remove("result").unwrap_or(serde_json::Value::Null)
        }
        other => other,
    }
}
