//! Server-sent event decoding for streamed chat completions.

use serde::Deserialize;

/// An incremental piece of model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delta {
    /// Answer text.
    Content(String),
    /// Chain-of-thought text emitted by reasoning models before the answer.
    Reasoning(String),
}

/// One decoded `data:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Deltas carried by a chunk; empty for keep-alives and role-only chunks.
    Chunk(Vec<Delta>),
    /// The `[DONE]` terminator.
    Done,
}

/// Decode one line of an event stream.
///
/// Returns `Ok(None)` for blank lines, comments and non-data fields.
pub fn parse_sse_line(line: &str) -> Result<Option<SseEvent>, serde_json::Error> {
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let data = data.trim();
    if data.is_empty() {
        return Ok(None);
    }
    if data == "[DONE]" {
        return Ok(Some(SseEvent::Done));
    }

    let chunk: CompletionChunk = serde_json::from_str(data)?;
    let deltas = chunk
        .choices
        .into_iter()
        .take(1)
        .flat_map(|choice| {
            let reasoning = choice
                .delta
                .reasoning_content
                .filter(|s| !s.is_empty())
                .map(Delta::Reasoning);
            let content = choice
                .delta
                .content
                .filter(|s| !s.is_empty())
                .map(Delta::Content);
            reasoning.into_iter().chain(content)
        })
        .collect();
    Ok(Some(SseEvent::Chunk(deltas)))
}

/// Splits a byte stream into lines, carrying partial lines across chunks.
#[derive(Debug, Default)]
pub struct LineDecoder {
    pending: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes and collect every line completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            lines.push(Self::to_line(&raw[..raw.len() - 1]));
        }
        lines
    }

    /// Flush whatever is left once the stream ends.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let raw = std::mem::take(&mut self.pending);
        Some(Self::to_line(&raw))
    }

    fn to_line(raw: &[u8]) -> String {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        String::from_utf8_lossy(raw).into_owned()
    }
}

#[derive(Debug, Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    reasoning_content: Option<String>,
}
