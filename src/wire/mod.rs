//! Wire-level decoding: frame reassembly and event classification.
//!
//! The backend delivers one of three sub-formats over the same byte-stream
//! contract. This module reassembles complete frames from arbitrarily split
//! chunks and classifies each frame's payload into a [`StreamEvent`].

mod interpreter;
mod splitter;
mod types;

pub use interpreter::FrameInterpreter;
pub use splitter::FrameSplitter;
pub use types::{InterpreterConfig, StreamEvent, WireFormat};
