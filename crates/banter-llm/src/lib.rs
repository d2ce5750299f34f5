//! Streaming network client for the remote generative-text service.
//!
//! Maintains the ordered conversation history, issues one streaming
//! chat-completions request per turn, incrementally decodes the
//! server-sent-event stream into text deltas, and reports completion or
//! failure through a per-turn event channel.

pub mod client;
pub mod decoder;
pub mod error;
pub mod types;

pub use client::{ClientState, StreamingChatClient};
pub use decoder::{SseDecoder, SseFrame};
pub use error::LlmError;
pub use types::StreamEvent;
