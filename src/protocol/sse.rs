//! Minimal server-sent-events framing.
//!
//! Splits an event-stream byte sequence into named events. Only the fields
//! the match stream uses are handled: `event`, `data` (multi-line), and
//! comment lines. Chunks may split lines, or even UTF-8 code points, at any
//! byte boundary.

/// One complete event from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SseMessage {
    /// Event name; `message` when the stream does not name one.
    pub event: String,
    /// Data payload; multiple `data:` lines are joined with newlines.
    pub data: String,
}

/// Incremental parser over arbitrarily-chunked stream bytes.
#[derive(Debug, Default)]
pub(crate) struct SseParser {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    /// Creates an empty parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk of stream bytes, returning every event completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseMessage> {
        self.buffer.extend_from_slice(chunk);

        let mut messages = Vec::new();
        while let Some(line_end) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=line_end).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line).into_owned();

            if line.is_empty() {
                if let Some(message) = self.flush() {
                    messages.push(message);
                }
            } else {
                self.field(&line);
            }
        }
        messages
    }

    fn field(&mut self, line: &str) {
        // Comment line.
        if line.starts_with(':') {
            return;
        }

        let (name, value) = match line.split_once(':') {
            Some((name, value)) => (name, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match name {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }
    }

    fn flush(&mut self) -> Option<SseMessage> {
        let event = self.event.take().unwrap_or_else(|| "message".to_string());
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseMessage { event, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_named_event() {
        let mut parser = SseParser::new();
        let messages = parser.push(b"event: state_update\ndata: {\"end_number\":1}\n\n");
        assert_eq!(
            messages,
            vec![SseMessage {
                event: "state_update".to_string(),
                data: "{\"end_number\":1}".to_string(),
            }]
        );
    }

    #[test]
    fn reassembles_events_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"event: latest_state_up").is_empty());
        assert!(parser.push(b"date\ndata: {\"a\"").is_empty());
        let messages = parser.push(b":1}\n\n");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].event, "latest_state_update");
        assert_eq!(messages[0].data, "{\"a\":1}");
    }

    #[test]
    fn joins_multi_line_data() {
        let mut parser = SseParser::new();
        let messages = parser.push(b"data: one\ndata: two\n\n");
        assert_eq!(messages[0].data, "one\ntwo");
        assert_eq!(messages[0].event, "message");
    }

    #[test]
    fn ignores_comments_and_dataless_events() {
        let mut parser = SseParser::new();
        assert!(parser.push(b": keep-alive\n\n").is_empty());
        assert!(parser.push(b"event: ping\n\n").is_empty());
    }

    #[test]
    fn handles_crlf_lines() {
        let mut parser = SseParser::new();
        let messages = parser.push(b"event: state_update\r\ndata: x\r\n\r\n");
        assert_eq!(messages[0].data, "x");
    }

    #[test]
    fn two_events_in_one_chunk() {
        let mut parser = SseParser::new();
        let messages = parser.push(b"data: a\n\ndata: b\n\n");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].data, "a");
        assert_eq!(messages[1].data, "b");
    }
}
