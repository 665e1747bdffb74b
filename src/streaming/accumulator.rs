//! Streaming message accumulator.

use crate::wire::StreamEvent;
use crate::{MessagePart, MessageSnapshot, ToolCallRecord};

/// Folds classified stream events into running message state.
///
/// State is the accumulated assistant text plus the tool-call records in
/// first-seen order. Every state-changing event projects a fresh
/// [`MessageSnapshot`]; no-op events (orphan results, post-done events, empty
/// deltas) project nothing, so consumers never re-render redundantly.
#[derive(Debug, Default)]
pub struct MessageAccumulator {
    text: String,
    calls: Vec<ToolCallRecord>,
    done: bool,
}

impl MessageAccumulator {
    /// Create a new accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a `Done` event has been applied
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Clear all state so the accumulator can serve a new request
    pub fn reset(&mut self) {
        self.text.clear();
        self.calls.clear();
        self.done = false;
    }

    /// Apply one event, returning a snapshot if the event changed state.
    pub fn apply(&mut self, event: StreamEvent) -> Option<MessageSnapshot> {
        if self.done {
            return None;
        }

        match event {
            StreamEvent::TextDelta(delta) | StreamEvent::FallbackText(delta) => {
                if delta.is_empty() {
                    return None;
                }
                self.text.push_str(&delta);
                Some(self.project())
            }
            StreamEvent::ToolCall { id, name, args } => {
                let record = ToolCallRecord::new(id, name, args);
                // Ids never repeat within a well-behaved stream; if one does,
                // overwrite the fields in place so the part keeps its position.
                match self.calls.iter_mut().find(|call| call.id == record.id) {
                    Some(existing) => *existing = record,
                    None => self.calls.push(record),
                }
                Some(self.project())
            }
            StreamEvent::ToolResult { id, result } => {
                match self.calls.iter_mut().find(|call| call.id == id) {
                    Some(record) => {
                        record.result = Some(result);
                        Some(self.project())
                    }
                    // Orphan result: the call id was never observed. Dropped,
                    // not buffered; see the ordering note in DESIGN.md.
                    None => {
                        tracing::debug!(tool_call_id = %id, "dropping orphan tool result");
                        None
                    }
                }
            }
            StreamEvent::Done => {
                self.done = true;
                Some(self.project())
            }
        }
    }

    /// Project current state: tool-call parts in first-seen order, then one
    /// aggregated text part if any text has accumulated.
    fn project(&self) -> MessageSnapshot {
        let mut parts: Vec<MessagePart> = self.calls.iter().map(MessagePart::from).collect();
        if !self.text.is_empty() {
            parts.push(MessagePart::text(self.text.clone()));
        }
        MessageSnapshot { parts }
    }
}
