use super::types::ChatCompletionChunk;

/// Incremental decoder for the provider's SSE stream. Bytes go in as they
/// arrive, assistant text deltas come out. Only complete lines are decoded,
/// so multi-byte characters split across network chunks survive.
pub struct SseDeltaDecoder {
    buffer: Vec<u8>,
}

impl SseDeltaDecoder {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut deltas = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(delta) = decode_line(line.trim()) {
                deltas.push(delta);
            }
        }
        deltas
    }
}

impl Default for SseDeltaDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_line(line: &str) -> Option<String> {
    let data = line.strip_prefix("data:")?.trim();
    if data == "[DONE]" {
        return None;
    }

    let chunk: ChatCompletionChunk = serde_json::from_str(data).ok()?;
    chunk
        .choices
        .first()?
        .delta
        .content
        .clone()
        .filter(|content| !content.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta_event(content: &str) -> String {
        format!("data: {{\"choices\":[{{\"delta\":{{\"content\":\"{content}\"}}}}]}}\n\n")
    }

    #[test]
    fn decodes_complete_events() {
        let mut decoder = SseDeltaDecoder::new();
        let payload = format!("{}{}data: [DONE]\n", delta_event("Hello"), delta_event(" there"));
        let deltas = decoder.feed(payload.as_bytes());
        assert_eq!(deltas, vec!["Hello".to_string(), " there".to_string()]);
    }

    #[test]
    fn buffers_events_split_across_chunks() {
        let mut decoder = SseDeltaDecoder::new();
        let event = delta_event("Hi");
        let (head, tail) = event.split_at(20);
        assert!(decoder.feed(head.as_bytes()).is_empty());
        assert_eq!(decoder.feed(tail.as_bytes()), vec!["Hi".to_string()]);
    }

    #[test]
    fn ignores_comments_and_empty_deltas() {
        let mut decoder = SseDeltaDecoder::new();
        let payload = ": keep-alive\n\ndata: {\"choices\":[{\"delta\":{}}]}\n";
        assert!(decoder.feed(payload.as_bytes()).is_empty());
    }
}
