//! Streaming chat client: one conversation, one in-flight request.
//!
//! `send` validates, records the user turn, and spawns a task that issues
//! the request and pumps decoded deltas into a per-turn event channel. The
//! channel yields zero-or-more `Delta` events and exactly one terminal
//! `Completed`/`Failed` event, then closes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use banter_core::config::LlmConfig;
use banter_core::types::ChatMessage;

use crate::decoder::SseDecoder;
use crate::error::LlmError;
use crate::types::{ChatRequest, ChatStreamChunk, StreamEvent};

/// Capacity of the per-turn event channel.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Request lifecycle state.
///
/// `Completed` and `Failed` are transient: they are represented by the
/// terminal event on the turn channel, after which the client is `Idle`
/// again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// No request outstanding.
    Idle,
    /// A request has been accepted but the response has not started.
    Sending,
    /// Response arrived with a success status; deltas are flowing.
    Streaming,
}

#[derive(Debug)]
struct Inner {
    history: Vec<ChatMessage>,
    state: ClientState,
}

/// Client for the remote generative-text service.
///
/// Owns the ordered conversation history exclusively; only `send` and
/// `reset_conversation` mutate it. The busy flag and the history live behind
/// one mutex so concurrent `send` calls cannot interleave turns.
pub struct StreamingChatClient {
    http: reqwest::Client,
    config: LlmConfig,
    inner: Arc<Mutex<Inner>>,
}

impl StreamingChatClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| LlmError::Internal(e.to_string()))?;

        Ok(Self {
            http,
            config,
            inner: Arc::new(Mutex::new(Inner {
                history: Vec::new(),
                state: ClientState::Idle,
            })),
        })
    }

    /// Start one streaming turn.
    ///
    /// Rejects blank input (`EmptyInput`) and overlapping turns (`Busy`)
    /// before touching state or history. Otherwise appends the system prompt
    /// (first turn of a conversation only, when configured) and the user
    /// message, then issues the request from a spawned task.
    ///
    /// On clean completion the assistant message is appended to history; on
    /// any failure the history is rolled back to its pre-send state so no
    /// partial turn is recorded.
    pub fn send(&self, user_text: &str) -> Result<mpsc::Receiver<StreamEvent>, LlmError> {
        let text = user_text.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyInput);
        }

        // Busy check and history mutation under a single lock acquisition.
        let (messages, rollback_len) = {
            let mut inner = self
                .inner
                .lock()
                .map_err(|e| LlmError::Internal(format!("client lock poisoned: {e}")))?;

            if inner.state != ClientState::Idle {
                return Err(LlmError::Busy);
            }
            inner.state = ClientState::Sending;

            let rollback_len = inner.history.len();
            if inner.history.is_empty() {
                if let Some(prompt) = &self.config.system_prompt {
                    inner.history.push(ChatMessage::system(prompt.clone()));
                }
            }
            inner.history.push(ChatMessage::user(text));
            (inner.history.clone(), rollback_len)
        };

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let task = StreamTask {
            http: self.http.clone(),
            config: self.config.clone(),
            inner: Arc::clone(&self.inner),
            rollback_len,
        };
        tokio::spawn(async move { task.run(messages, tx).await });

        Ok(rx)
    }

    /// Clear the conversation history unconditionally.
    ///
    /// The next `send` re-inserts the system prompt if one is configured.
    pub fn reset_conversation(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.history.clear();
            debug!("Conversation history cleared");
        }
    }

    /// Snapshot of the conversation history.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.inner
            .lock()
            .map(|inner| inner.history.clone())
            .unwrap_or_default()
    }

    /// Current request lifecycle state.
    pub fn state(&self) -> ClientState {
        self.inner
            .lock()
            .map(|inner| inner.state)
            .unwrap_or(ClientState::Idle)
    }

    #[cfg(test)]
    fn force_state(&self, state: ClientState) {
        self.inner.lock().unwrap().state = state;
    }
}

/// The spawned per-turn worker.
struct StreamTask {
    http: reqwest::Client,
    config: LlmConfig,
    inner: Arc<Mutex<Inner>>,
    rollback_len: usize,
}

impl StreamTask {
    async fn run(self, messages: Vec<ChatMessage>, tx: mpsc::Sender<StreamEvent>) {
        match self.execute(&messages, &tx).await {
            Ok(full_text) => {
                self.finish(|inner| inner.history.push(ChatMessage::assistant(full_text.clone())));
                let _ = tx.send(StreamEvent::Completed { full_text }).await;
            }
            Err(err) => {
                let (status, detail) = match err {
                    LlmError::Transport { status, detail } => (status, detail),
                    other => (None, other.to_string()),
                };
                warn!(?status, detail = %detail, "Streaming turn failed, history rolled back");
                let rollback_len = self.rollback_len;
                self.finish(|inner| inner.history.truncate(rollback_len));
                let _ = tx.send(StreamEvent::Failed { status, detail }).await;
            }
        }
    }

    /// Apply a final history mutation and return the client to `Idle`.
    fn finish(&self, mutate: impl FnOnce(&mut Inner)) {
        match self.inner.lock() {
            Ok(mut inner) => {
                mutate(&mut inner);
                inner.state = ClientState::Idle;
            }
            Err(e) => warn!(error = %e, "Client lock poisoned during turn teardown"),
        }
    }

    fn set_state(&self, state: ClientState) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.state = state;
        }
    }

    async fn execute(
        &self,
        messages: &[ChatMessage],
        tx: &mpsc::Sender<StreamEvent>,
    ) -> Result<String, LlmError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = ChatRequest {
            model: &self.config.model,
            stream: true,
            messages,
        };

        debug!(url = %url, model = %self.config.model, turns = messages.len(), "Issuing streaming request");

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Transport {
                status: None,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Transport {
                status: Some(status.as_u16()),
                detail: body,
            });
        }

        self.set_state(ClientState::Streaming);
        drain_stream(Box::pin(response.bytes_stream()), tx).await
    }
}

/// Pump a raw byte stream through the decoder until the terminal frame.
///
/// Every extracted delta is appended to the accumulator and emitted
/// immediately, in arrival order. Undecodable payloads are dropped and the
/// stream continues. A stream that ends (or errors) before the terminal
/// frame is a failure: the turn must never be recorded partially.
async fn drain_stream<S, B, E>(
    mut stream: S,
    tx: &mpsc::Sender<StreamEvent>,
) -> Result<String, LlmError>
where
    S: Stream<Item = std::result::Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut decoder = SseDecoder::new();
    let mut accumulator = String::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| LlmError::Transport {
            status: None,
            detail: e.to_string(),
        })?;

        for frame in decoder.push(chunk.as_ref()) {
            if frame.is_done() {
                return Ok(accumulator);
            }

            let Some(parsed) = frame.try_parse::<ChatStreamChunk>() else {
                debug!(payload = %frame.preview(), "Undecodable stream payload dropped");
                continue;
            };

            let delta = parsed
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content);

            if let Some(content) = delta {
                if !content.is_empty() {
                    accumulator.push_str(&content);
                    let _ = tx.send(StreamEvent::Delta(content)).await;
                }
            }
        }
    }

    Err(LlmError::Transport {
        status: None,
        detail: "stream ended before the terminal frame".to_string(),
    })
}
