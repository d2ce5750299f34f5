//! Error types for the streaming chat client.

use banter_core::BanterError;
use thiserror::Error;

/// Errors from the streaming chat client.
///
/// `EmptyInput` and `Busy` are pre-flight rejections returned directly from
/// `send`; `Transport` travels through the event channel as the terminal
/// `StreamEvent::Failed`.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("input is empty")]
    EmptyInput,

    #[error("a request is already in flight")]
    Busy,

    #[error("transport error{}: {detail}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Transport {
        /// HTTP status, when the failure happened after a response arrived.
        status: Option<u16>,
        /// Error description or captured response body.
        detail: String,
    },

    #[error("client state error: {0}")]
    Internal(String),
}

impl From<LlmError> for BanterError {
    fn from(err: LlmError) -> Self {
        BanterError::Stream(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(LlmError::EmptyInput.to_string(), "input is empty");
        assert_eq!(LlmError::Busy.to_string(), "a request is already in flight");
    }

    #[test]
    fn test_transport_display_with_status() {
        let err = LlmError::Transport {
            status: Some(500),
            detail: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "transport error (status 500): boom");
    }

    #[test]
    fn test_transport_display_without_status() {
        let err = LlmError::Transport {
            status: None,
            detail: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[test]
    fn test_conversion_to_banter_error() {
        let err: BanterError = LlmError::Busy.into();
        assert!(matches!(err, BanterError::Stream(_)));
        assert!(err.to_string().contains("already in flight"));
    }
}
