//! Incremental decoder for the event-stream framing.
//!
//! The wire protocol delivers blank-line-delimited event blocks whose
//! meaningful lines begin with `data:`. Chunks arrive at arbitrary
//! boundaries, so the decoder buffers until a full block is available.

use serde::de::DeserializeOwned;

/// Terminal sentinel payload marking the end of a stream.
const DONE_SENTINEL: &str = "[DONE]";

/// Buffer cap. A well-formed stream never comes close; a malformed one that
/// never produces a block boundary must not grow without bound.
const MAX_BUFFER_SIZE: usize = 512 * 1024;

/// Streaming event-block decoder.
///
/// Feed raw chunks with [`push`](Self::push); complete `data:` payloads come
/// back in arrival order, partial blocks stay buffered for the next chunk.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Push a chunk of raw bytes and extract the payloads of every complete
    /// event block.
    ///
    /// A block is complete once the buffer contains a blank-line delimiter;
    /// the block (including the delimiter) is consumed and the remainder
    /// retained. Within a block, only lines prefixed `data:` matter; the
    /// prefix is stripped and the payload trimmed. Empty payloads are
    /// dropped here; `[DONE]` detection is the caller's concern via
    /// [`SseFrame::is_done`].
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        if self.buffer.len() > MAX_BUFFER_SIZE {
            tracing::warn!(
                buffered = self.buffer.len(),
                "Event-stream buffer exceeded cap, dropping oldest half"
            );
            let keep_from = self.buffer.len() - MAX_BUFFER_SIZE / 2;
            self.buffer.drain(..keep_from);
        }

        let mut frames = Vec::new();

        while let Some(pos) = self.buffer.find("\n\n") {
            let block: String = self.buffer.drain(..pos + 2).collect();

            for line in block.lines() {
                let Some(payload) = line.strip_prefix("data:") else {
                    continue;
                };
                let payload = payload.trim();
                if payload.is_empty() {
                    continue;
                }
                frames.push(SseFrame {
                    payload: payload.to_string(),
                });
            }
        }

        frames
    }

    /// Push a string directly (for tests and pre-decoded content).
    pub fn push_str(&mut self, s: &str) -> Vec<SseFrame> {
        self.push(s.as_bytes())
    }

    /// Whether undelivered partial data remains buffered.
    pub fn has_remaining(&self) -> bool {
        !self.buffer.is_empty()
    }
}

/// One `data:` payload extracted from a complete event block.
#[derive(Debug, Clone)]
pub struct SseFrame {
    payload: String,
}

impl SseFrame {
    /// Whether this is the terminal `[DONE]` sentinel.
    pub fn is_done(&self) -> bool {
        self.payload == DONE_SENTINEL
    }

    /// Parse the payload as JSON, returning `None` on any parse failure so
    /// the caller can drop the event and keep the stream alive.
    pub fn try_parse<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_str(&self.payload).ok()
    }

    /// A short preview of the payload for log lines.
    pub fn preview(&self) -> &str {
        let end = self
            .payload
            .char_indices()
            .nth(120)
            .map_or(self.payload.len(), |(i, _)| i);
        &self.payload[..end]
    }
}
