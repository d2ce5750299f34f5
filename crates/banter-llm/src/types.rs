//! Wire types for the streaming chat-completions protocol.

use serde::{Deserialize, Serialize};

use banter_core::types::ChatMessage;

/// Events delivered on the per-turn channel returned by `send`.
///
/// The contract is zero-or-more `Delta` events followed by exactly one
/// terminal event (`Completed` or `Failed`), after which the channel closes.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// Incremental text fragment, emitted in arrival order.
    Delta(String),
    /// Terminal: the stream finished cleanly. Carries the full accumulated
    /// text, which has also been appended to the conversation history.
    Completed { full_text: String },
    /// Terminal: the request or stream failed. History was rolled back to
    /// its pre-send state.
    Failed {
        /// HTTP status when the failure happened after a response arrived.
        status: Option<u16>,
        /// Error description or captured response body.
        detail: String,
    },
}

impl StreamEvent {
    /// Whether this event ends the turn.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamEvent::Delta(_))
    }
}

/// Request body for one streaming turn.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub stream: bool,
    pub messages: &'a [ChatMessage],
}

/// One decoded stream payload. Only `choices[0].delta.content` is consumed.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatStreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StreamChoice {
    #[serde(default)]
    pub delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StreamDelta {
    #[serde(default)]
    pub content: Option<String>,
}
