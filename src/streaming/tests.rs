//! Tests for the accumulator and the assembled pipeline

use super::*;
use crate::wire::{StreamEvent, WireFormat};
use crate::{MessagePart, MessageSnapshot};
use futures_util::StreamExt;

fn text_event(text: &str) -> StreamEvent {
    StreamEvent::TextDelta(text.to_string())
}

fn tool_call_event(id: &str, name: &str, args: serde_json::Value) -> StreamEvent {
    StreamEvent::ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        args,
    }
}

fn tool_result_event(id: &str, result: serde_json::Value) -> StreamEvent {
    StreamEvent::ToolResult {
        id: id.to_string(),
        result,
    }
}

#[test]
fn test_text_deltas_concatenate() {
    let mut acc = MessageAccumulator::new();

    let first = acc.apply(text_event("Hel")).unwrap();
    assert_eq!(first.text(), Some("Hel"));

    let second = acc.apply(text_event("lo")).unwrap();
    assert_eq!(second.text(), Some("Hello"));
    assert_eq!(second.parts.len(), 1);
}

#[test]
fn test_empty_delta_is_a_noop() {
    let mut acc = MessageAccumulator::new();
    assert!(acc.apply(text_event("")).is_none());
}

#[test]
fn test_tool_call_then_result() {
    let mut acc = MessageAccumulator::new();

    let snapshot = acc
        .apply(tool_call_event("a", "search", serde_json::json!({"query": "x"})))
        .unwrap();
    assert_eq!(snapshot.tool_calls().count(), 1);

    let snapshot = acc
        .apply(tool_result_event("a", serde_json::json!("hit")))
        .unwrap();
    assert_eq!(snapshot.parts.len(), 1);
    match &snapshot.parts[0] {
        MessagePart::ToolCall { id, result, .. } => {
            assert_eq!(id, "a");
            assert_eq!(result, &Some(serde_json::json!("hit")));
        }
        other => panic!("expected tool call part, got {other:?}"),
    }
}

#[test]
fn test_orphan_result_dropped_without_snapshot() {
    let mut acc = MessageAccumulator::new();
    assert!(acc
        .apply(tool_result_event("never_seen", serde_json::json!("x")))
        .is_none());

    // And it left no record behind
    let snapshot = acc.apply(text_event("hi")).unwrap();
    assert_eq!(snapshot.tool_calls().count(), 0);
}

#[test]
fn test_repeated_tool_call_id_keeps_position() {
    let mut acc = MessageAccumulator::new();
    acc.apply(tool_call_event("a", "first", serde_json::json!({})));
    acc.apply(tool_call_event("b", "second", serde_json::json!({})));
    let snapshot = acc
        .apply(tool_call_event("a", "replaced", serde_json::json!({"n": 1})))
        .unwrap();

    assert_eq!(snapshot.parts.len(), 2);
    let (id, name, _) = snapshot.parts[0].as_tool_call().unwrap();
    assert_eq!((id, name), ("a", "replaced"));
    let (id, _, _) = snapshot.parts[1].as_tool_call().unwrap();
    assert_eq!(id, "b");
}

#[test]
fn test_projection_orders_tool_calls_before_text() {
    let mut acc = MessageAccumulator::new();
    acc.apply(text_event("Let me look that up. "));
    acc.apply(tool_call_event("a", "search", serde_json::json!({})));
    let snapshot = acc.apply(text_event("Found it.")).unwrap();

    assert_eq!(snapshot.parts.len(), 2);
    assert!(snapshot.parts[0].as_tool_call().is_some());
    assert_eq!(snapshot.parts[1].as_text(), Some("Let me look that up. Found it."));
}

#[test]
fn test_fallback_text_appends_like_a_delta() {
    let mut acc = MessageAccumulator::new();
    acc.apply(text_event("before "));
    let snapshot = acc
        .apply(StreamEvent::FallbackText("{broken json".to_string()))
        .unwrap();
    assert_eq!(snapshot.text(), Some("before {broken json"));
}

#[test]
fn test_done_emits_final_snapshot_then_everything_is_noop() {
    let mut acc = MessageAccumulator::new();
    acc.apply(text_event("answer"));

    let last = acc.apply(StreamEvent::Done).unwrap();
    assert_eq!(last.text(), Some("answer"));
    assert!(acc.is_done());

    assert!(acc.apply(text_event("late")).is_none());
    assert!(acc.apply(StreamEvent::Done).is_none());
}

#[test]
fn test_reset_clears_state() {
    let mut acc = MessageAccumulator::new();
    acc.apply(tool_call_event("a", "search", serde_json::json!({})));
    acc.apply(StreamEvent::Done);

    acc.reset();
    assert!(!acc.is_done());
    let snapshot = acc.apply(text_event("fresh")).unwrap();
    assert_eq!(snapshot.parts.len(), 1);
}

// ---------------------------------------------------------------------------
// Assembled pipeline
// ---------------------------------------------------------------------------

const NDJSON_FIXTURE: &str = concat!(
    "{\"type\":\"tool_call\",\"data\":{\"id\":\"a\",\"name\":\"search\",\"args\":{\"query\":\"météo\"}}}\n",
    "{\"type\":\"text\",\"data\":\"Hel\"}\n",
    "{\"type\":\"tool_result\",\"data\":{\"toolCallId\":\"a\",\"result\":\"hit\"}}\n",
    "{\"type\":\"text\",\"data\":\"lo\"}\n",
    "{\"type\":\"done\"}\n",
);

fn final_snapshot(snapshots: Vec<MessageSnapshot>) -> MessageSnapshot {
    snapshots.into_iter().last().expect("at least one snapshot")
}

fn expected_ndjson_snapshot() -> MessageSnapshot {
    let mut decoder = StreamDecoder::new(DecoderConfig::new(WireFormat::Ndjson));
    final_snapshot(decoder.feed(NDJSON_FIXTURE.as_bytes()))
}

#[test]
fn test_ndjson_fixture_decodes_fully() {
    let snapshot = expected_ndjson_snapshot();
    assert_eq!(snapshot.parts.len(), 2);
    match &snapshot.parts[0] {
        MessagePart::ToolCall { id, name, args, result, .. } => {
            assert_eq!(id, "a");
            assert_eq!(name, "search");
            assert_eq!(args["query"], "météo");
            assert_eq!(result, &Some(serde_json::json!("hit")));
        }
        other => panic!("expected tool call part, got {other:?}"),
    }
    assert_eq!(snapshot.parts[1].as_text(), Some("Hello"));
}

#[test]
fn test_final_snapshot_is_boundary_independent() {
    let expected = expected_ndjson_snapshot();
    let bytes = NDJSON_FIXTURE.as_bytes();

    // Every two-chunk split, including splits inside the multi-byte "é"
    for split_at in 0..=bytes.len() {
        let mut decoder = StreamDecoder::new(DecoderConfig::new(WireFormat::Ndjson));
        let mut snapshots = decoder.feed(&bytes[..split_at]);
        snapshots.extend(decoder.feed(&bytes[split_at..]));
        assert_eq!(
            final_snapshot(snapshots),
            expected,
            "split at byte {split_at} changed the outcome"
        );
    }

    // One byte at a time
    let mut decoder = StreamDecoder::new(DecoderConfig::new(WireFormat::Ndjson));
    let mut snapshots = Vec::new();
    for byte in bytes {
        snapshots.extend(decoder.feed(std::slice::from_ref(byte)));
    }
    assert_eq!(final_snapshot(snapshots), expected);
}

#[test]
fn test_sse_variant_end_to_end() {
    let mut decoder = StreamDecoder::new(DecoderConfig::new(WireFormat::Sse));
    let wire = concat!(
        "data: {\"type\":\"text\",\"data\":\"Hi\"}\n",
        "data: [Tool Call: search(...)]\n",
        "data: [DONE]\n",
    );
    let snapshots = decoder.feed(wire.as_bytes());

    // The debug line is swallowed, so only the text delta produced a snapshot
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].text(), Some("Hi"));
    assert!(decoder.is_done());
    assert!(decoder.feed(b"data: {\"type\":\"text\",\"data\":\"x\"}\n").is_empty());
}

#[test]
fn test_plain_text_variant_appends_chunks_verbatim() {
    let mut decoder = StreamDecoder::new(DecoderConfig::new(WireFormat::Text));
    decoder.feed(b"The market ");
    let snapshots = decoder.feed(b"rose 2%.");
    assert_eq!(final_snapshot(snapshots).text(), Some("The market rose 2%."));
}

#[test]
fn test_frames_stop_at_done_even_within_one_chunk() {
    let mut decoder = StreamDecoder::new(DecoderConfig::new(WireFormat::Ndjson));
    let wire = "{\"type\":\"done\"}\n{\"type\":\"text\",\"data\":\"late\"}\n";
    let snapshots = decoder.feed(wire.as_bytes());

    assert_eq!(snapshots.len(), 1);
    assert!(snapshots[0].is_empty());
    assert!(decoder.is_done());
}

// ---------------------------------------------------------------------------
// Async driver
// ---------------------------------------------------------------------------

type ChunkResult = Result<Vec<u8>, String>;

fn ok_chunk(data: &str) -> ChunkResult {
    Ok(data.as_bytes().to_vec())
}

#[tokio::test]
async fn test_decode_stream_happy_path() {
    let chunks = futures::stream::iter(vec![
        ok_chunk("{\"type\":\"text\",\"data\":\"Hel\"}\n{\"type\":\"te"),
        ok_chunk("xt\",\"data\":\"lo\"}\n"),
        ok_chunk("{\"type\":\"done\"}\n"),
    ]);
    let (stream, _cancel) = decode_stream(chunks, DecoderConfig::new(WireFormat::Ndjson));
    let snapshots: Vec<_> = stream.collect().await;

    assert_eq!(snapshots.len(), 3);
    let last = snapshots.last().unwrap().as_ref().unwrap();
    assert_eq!(last.text(), Some("Hello"));
}

#[tokio::test]
async fn test_decode_stream_stops_reading_after_done() {
    let chunks = futures::stream::iter(vec![
        ok_chunk("{\"type\":\"text\",\"data\":\"a\"}\n{\"type\":\"done\"}\n"),
        ok_chunk("{\"type\":\"text\",\"data\":\"never applied\"}\n"),
    ]);
    let (stream, _cancel) = decode_stream(chunks, DecoderConfig::new(WireFormat::Ndjson));
    let snapshots: Vec<_> = stream.collect().await;

    assert_eq!(snapshots.len(), 2);
    let last = snapshots.last().unwrap().as_ref().unwrap();
    assert_eq!(last.text(), Some("a"));
}

#[tokio::test]
async fn test_decode_stream_surfaces_transport_error_once() {
    let chunks = futures::stream::iter(vec![
        ok_chunk("{\"type\":\"text\",\"data\":\"partial\"}\n"),
        Err("connection reset".to_string()),
        ok_chunk("{\"type\":\"text\",\"data\":\"unreachable\"}\n"),
    ]);
    let (stream, _cancel) = decode_stream(chunks, DecoderConfig::new(WireFormat::Ndjson));
    let items: Vec<_> = stream.collect().await;

    assert_eq!(items.len(), 2);
    assert!(items[0].is_ok());
    match &items[1] {
        Err(crate::DecodeError::Transport(msg)) => assert!(msg.contains("connection reset")),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cancellation_is_a_clean_stop() {
    let chunks = futures::stream::iter(vec![
        ok_chunk("{\"type\":\"text\",\"data\":\"first\"}\n"),
        ok_chunk("{\"type\":\"text\",\"data\":\"second\"}\n"),
        ok_chunk("{\"type\":\"done\"}\n"),
    ]);
    let (mut stream, cancel) = decode_stream(chunks, DecoderConfig::new(WireFormat::Ndjson));

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.text(), Some("first"));

    cancel.cancel();

    // No error, no terminal snapshot, just the end of the stream
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_decode_body_rejects_missing_stream() {
    let body: Option<futures::stream::Iter<std::vec::IntoIter<ChunkResult>>> = None;
    let result = decode_body(body, DecoderConfig::new(WireFormat::Ndjson));
    assert!(matches!(result, Err(crate::DecodeError::MissingBody)));
}
