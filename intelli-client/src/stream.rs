//! Event-stream reader
//!
//! Reads `text/event-stream` bodies produced by the AIGC streaming endpoints.
//! Only `data:` lines matter: `[DONE]` ends the stream, JSON payloads carry
//! their text in `content`, and anything that is not JSON is passed through
//! as-is.
//!
//! Each chunk is split into lines on its own; a line cut in two by a chunk
//! boundary is seen as two partial lines.

use futures::{Stream, TryStreamExt, pin_mut};
use reqwest::Response;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

const DATA_PREFIX: &str = "data:";
const DONE_MARKER: &str = "[DONE]";

/// Meaning of one line of an event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamLine {
    /// Text to hand to the caller
    Fragment(String),
    /// End-of-stream marker
    Done,
}

/// Interpret a single line
pub fn parse_line(line: &str) -> Option<StreamLine> {
    let payload = line.strip_prefix(DATA_PREFIX)?.trim();
    if payload.is_empty() {
        return None;
    }
    if payload == DONE_MARKER {
        return Some(StreamLine::Done);
    }
    match serde_json::from_str::<Value>(payload) {
        Ok(json) => json
            .get("content")
            .and_then(content_text)
            .map(StreamLine::Fragment),
        Err(_) => Some(StreamLine::Fragment(payload.to_string())),
    }
}

/// Text of a truthy `content` value; empty, zero, false and null carry nothing
fn content_text(content: &Value) -> Option<String> {
    match content {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Array(_) | Value::Object(_) => Some(content.to_string()),
        _ => None,
    }
}

/// Incremental UTF-8 decoder.
///
/// An incomplete multi-byte sequence at the end of a chunk is held back
/// until the next chunk; invalid bytes become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut text = String::with_capacity(self.pending.len());
        let mut rest: &[u8] = &self.pending;
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    text.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        let tail = rest.to_vec();
        self.pending = tail;
        text
    }

    /// Bytes held back waiting for the rest of a character
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

/// Drive an event stream until `[DONE]`, its end, or an error.
///
/// `on_message` receives each fragment as soon as its chunk arrives.
/// Exactly one of `on_complete` and `on_error` is called, once.
pub async fn read_event_stream<S, B, M, C, E>(chunks: S, mut on_message: M, on_complete: C, on_error: E)
where
    S: Stream<Item = ClientResult<B>>,
    B: AsRef<[u8]>,
    M: FnMut(String),
    C: FnOnce(),
    E: FnOnce(ClientError),
{
    match pump(chunks, &mut on_message).await {
        Ok(()) => on_complete(),
        Err(e) => {
            tracing::warn!(error = %e, "Event stream failed");
            on_error(e)
        }
    }
}

async fn pump<S, B, M>(chunks: S, on_message: &mut M) -> ClientResult<()>
where
    S: Stream<Item = ClientResult<B>>,
    B: AsRef<[u8]>,
    M: FnMut(String),
{
    pin_mut!(chunks);
    let mut decoder = Utf8Decoder::default();
    let mut fragments = 0usize;

    while let Some(chunk) = chunks.try_next().await? {
        let text = decoder.decode(chunk.as_ref());
        for line in text.split('\n') {
            match parse_line(line) {
                Some(StreamLine::Fragment(fragment)) => {
                    fragments += 1;
                    on_message(fragment);
                }
                Some(StreamLine::Done) => {
                    tracing::debug!(fragments, "Event stream done");
                    return Ok(());
                }
                None => {}
            }
        }
    }

    if decoder.pending() > 0 {
        tracing::debug!(bytes = decoder.pending(), "Event stream ended mid-character");
    }
    tracing::debug!(fragments, "Event stream closed");
    Ok(())
}

/// Read an event stream from an HTTP response.
///
/// A non-2xx status is reported through `on_error`.
pub async fn read_response<M, C, E>(response: Response, on_message: M, on_complete: C, on_error: E)
where
    M: FnMut(String),
    C: FnOnce(),
    E: FnOnce(ClientError),
{
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        on_error(ClientError::Status { status, body });
        return;
    }

    let chunks = futures::stream::try_unfold(response, |mut response| async move {
        match response.chunk().await {
            Ok(Some(chunk)) => Ok(Some((chunk, response))),
            Ok(None) => Ok(None),
            Err(e) => Err(ClientError::from(e)),
        }
    });
    read_event_stream(chunks, on_message, on_complete, on_error).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[derive(Debug, Default, PartialEq)]
    struct Recorded {
        fragments: Vec<String>,
        completed: usize,
        errors: Vec<String>,
    }

    async fn run(chunks: Vec<ClientResult<Vec<u8>>>) -> Recorded {
        let mut recorded = Recorded::default();
        let mut fragments = Vec::new();
        let mut completed = 0;
        let mut errors = Vec::new();
        read_event_stream(
            stream::iter(chunks),
            |f| fragments.push(f),
            || completed += 1,
            |e| errors.push(e.to_string()),
        )
        .await;
        recorded.fragments = fragments;
        recorded.completed = completed;
        recorded.errors = errors;
        recorded
    }

    fn text(s: &str) -> ClientResult<Vec<u8>> {
        Ok(s.as_bytes().to_vec())
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line(r#"data: {"content":"hi"}"#),
            Some(StreamLine::Fragment("hi".into()))
        );
        assert_eq!(parse_line("data:[DONE]"), Some(StreamLine::Done));
        assert_eq!(parse_line("data: [DONE]  "), Some(StreamLine::Done));
        assert_eq!(
            parse_line("data: {not json}"),
            Some(StreamLine::Fragment("{not json}".into()))
        );
        assert_eq!(parse_line(r#"data: {"content":""}"#), None);
        assert_eq!(parse_line(r#"data: {"delta":"x"}"#), None);
        assert_eq!(parse_line("data:"), None);
        assert_eq!(parse_line("event: message"), None);
        assert_eq!(parse_line(""), None);
    }

    #[test]
    fn test_parse_line_scalar_content() {
        assert_eq!(
            parse_line(r#"data: {"content":42}"#),
            Some(StreamLine::Fragment("42".into()))
        );
        assert_eq!(
            parse_line(r#"data: {"content":true}"#),
            Some(StreamLine::Fragment("true".into()))
        );
        assert_eq!(
            parse_line(r#"data: {"content":{"text":"x"}}"#),
            Some(StreamLine::Fragment(r#"{"text":"x"}"#.into()))
        );
        assert_eq!(parse_line(r#"data: {"content":0}"#), None);
        assert_eq!(parse_line(r#"data: {"content":false}"#), None);
        assert_eq!(parse_line(r#"data: {"content":null}"#), None);
    }

    #[tokio::test]
    async fn test_fragment_then_done() {
        let recorded = run(vec![text("data: {\"content\":\"hi\"}\n\ndata: [DONE]\n\n")]).await;
        assert_eq!(recorded.fragments, vec!["hi"]);
        assert_eq!(recorded.completed, 1);
        assert!(recorded.errors.is_empty());
    }

    #[tokio::test]
    async fn test_done_stops_reading() {
        let recorded = run(vec![
            text("data: {\"content\":\"a\"}\ndata: [DONE]\ndata: {\"content\":\"b\"}\n"),
            text("data: {\"content\":\"c\"}\n"),
        ])
        .await;
        assert_eq!(recorded.fragments, vec!["a"]);
        assert_eq!(recorded.completed, 1);
    }

    #[tokio::test]
    async fn test_raw_text_passthrough() {
        let recorded = run(vec![text("data: {not json}\n")]).await;
        assert_eq!(recorded.fragments, vec!["{not json}"]);
        assert_eq!(recorded.completed, 1);
    }

    #[tokio::test]
    async fn test_end_without_done_completes() {
        let recorded = run(vec![
            text("data: {\"content\":\"one\"}\n"),
            text("data: {\"content\":\"two\"}\n"),
        ])
        .await;
        assert_eq!(recorded.fragments, vec!["one", "two"]);
        assert_eq!(recorded.completed, 1);
    }

    #[tokio::test]
    async fn test_error_is_exclusive_with_completion() {
        let recorded = run(vec![
            text("data: {\"content\":\"partial\"}\n"),
            Err(ClientError::Stream("connection reset".into())),
            text("data: {\"content\":\"never\"}\n"),
        ])
        .await;
        assert_eq!(recorded.fragments, vec!["partial"]);
        assert_eq!(recorded.completed, 0);
        assert_eq!(recorded.errors, vec!["Stream error: connection reset"]);
    }

    #[tokio::test]
    async fn test_multibyte_split_across_chunks() {
        let line = "data: {\"content\":\"你好\"}\n".as_bytes();
        // Cut inside the first character
        let cut = line.iter().position(|&b| b >= 0x80).unwrap() + 1;
        let recorded = run(vec![Ok(line[..cut].to_vec()), Ok(line[cut..].to_vec())]).await;
        // The head is a line of its own and is not valid JSON
        assert_eq!(recorded.fragments.len(), 1);
        assert_eq!(recorded.completed, 1);

        let mut decoder = Utf8Decoder::default();
        let head = decoder.decode(&line[..cut]);
        assert_eq!(decoder.pending(), 1);
        let tail = decoder.decode(&line[cut..]);
        assert_eq!(format!("{head}{tail}"), "data: {\"content\":\"你好\"}\n");
    }

    #[test]
    fn test_decoder_replaces_invalid_bytes() {
        let mut decoder = Utf8Decoder::default();
        assert_eq!(decoder.decode(b"a\xffb"), "a\u{FFFD}b");
        assert_eq!(decoder.pending(), 0);
    }

    #[tokio::test]
    async fn test_line_split_across_chunks_is_not_rejoined() {
        let recorded = run(vec![text("data: {\"content\":"), text("\"hi\"}\n")]).await;
        // Both halves are processed independently
        assert_eq!(recorded.fragments, vec!["{\"content\":"]);
        assert_eq!(recorded.completed, 1);
    }
}
