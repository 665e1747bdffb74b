//! Frame reassembly across chunk boundaries.

use super::types::WireFormat;

/// Prefix that introduces an SSE data line
const SSE_DATA_PREFIX: &str = "data: ";

/// SSE payload that terminates the stream
const SSE_DONE_PAYLOAD: &str = "[DONE]";

/// Reassembles complete logical frames from arbitrarily split text chunks.
///
/// A single JSON object or SSE payload can be split anywhere across reads, so
/// the splitter buffers the trailing unterminated remainder between calls. In
/// the line-oriented formats a frame is the text before each `\n`; in the text
/// format every non-empty chunk is already a frame.
#[derive(Debug)]
pub struct FrameSplitter {
    format: WireFormat,
    buffer: String,
    /// Bytes of an incomplete UTF-8 sequence carried to the next read
    pending_utf8: Vec<u8>,
    done: bool,
}

impl FrameSplitter {
    /// Create a splitter for the given wire format
    pub fn new(format: WireFormat) -> Self {
        Self {
            format,
            buffer: String::new(),
            pending_utf8: Vec::new(),
            done: false,
        }
    }

    /// Whether a terminal signal (`[DONE]`) has been observed on the wire
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed a raw byte chunk and collect all complete frames.
    ///
    /// A multi-byte UTF-8 scalar split across reads is held back until its
    /// remaining bytes arrive; genuinely invalid bytes decode lossily.
    pub fn feed_bytes(&mut self, chunk: &[u8]) -> Vec<String> {
        if chunk.is_empty() {
            return Vec::new();
        }

        let bytes = if self.pending_utf8.is_empty() {
            std::borrow::Cow::Borrowed(chunk)
        } else {
            let mut joined = std::mem::take(&mut self.pending_utf8);
            joined.extend_from_slice(chunk);
            std::borrow::Cow::Owned(joined)
        };

        let text = match std::str::from_utf8(&bytes) {
            Ok(text) => std::borrow::Cow::Borrowed(text),
            Err(err) => {
                let valid_up_to = err.valid_up_to();
                match err.error_len() {
                    // Incomplete trailing sequence: carry it to the next read
                    None => {
                        self.pending_utf8 = bytes[valid_up_to..].to_vec();
                        match std::str::from_utf8(&bytes[..valid_up_to]) {
                            Ok(text) => std::borrow::Cow::Owned(text.to_string()),
                            Err(_) => return Vec::new(),
                        }
                    }
                    // Invalid bytes in the middle: decode lossily
                    Some(_) => String::from_utf8_lossy(&bytes).into_owned().into(),
                }
            }
        };

        self.feed(&text)
    }

    /// Feed a decoded text chunk and collect all complete frames
    pub fn feed(&mut self, chunk: &str) -> Vec<String> {
        if self.done || chunk.is_empty() {
            return Vec::new();
        }

        match self.format {
            // Unframed text: the chunk is the frame, nothing is buffered
            WireFormat::Text => vec![chunk.to_string()],
            WireFormat::Sse | WireFormat::Ndjson => {
                self.buffer.push_str(chunk);
                self.drain_lines()
            }
        }
    }

    /// Extract every newline-terminated frame from the buffer, leaving any
    /// unterminated remainder for the next read.
    fn drain_lines(&mut self) -> Vec<String> {
        let mut frames = Vec::new();

        while let Some(newline) = self.buffer.find('\n') {
            let line = self.buffer[..newline].trim_end_matches('\r').to_string();
            self.buffer.drain(..=newline);

            if line.is_empty() {
                continue;
            }

            match self.format {
                WireFormat::Sse => {
                    let Some(payload) = line.strip_prefix(SSE_DATA_PREFIX) else {
                        // Non-data SSE lines (comments, event names) carry no payload
                        tracing::trace!(line = %line, "skipping non-data sse line");
                        continue;
                    };
                    if payload == SSE_DONE_PAYLOAD {
                        self.done = true;
                        break;
                    }
                    if !payload.is_empty() {
                        frames.push(payload.to_string());
                    }
                }
                WireFormat::Ndjson => frames.push(line),
                WireFormat::Text => unreachable!("text format never buffers lines"),
            }
        }

        frames
    }
}
