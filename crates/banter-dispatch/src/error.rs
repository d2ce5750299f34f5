//! Error types for the response dispatcher.

use banter_core::BanterError;
use banter_llm::LlmError;
use thiserror::Error;

/// Errors from the response dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("input is empty")]
    EmptyInput,

    #[error("dispatcher has not been started")]
    NotReady,

    #[error("streaming client error: {0}")]
    Llm(#[from] LlmError),
}

impl From<DispatchError> for BanterError {
    fn from(err: DispatchError) -> Self {
        BanterError::Dispatch(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(DispatchError::EmptyInput.to_string(), "input is empty");
        assert_eq!(
            DispatchError::NotReady.to_string(),
            "dispatcher has not been started"
        );
    }

    #[test]
    fn test_llm_error_wrapped() {
        let err: DispatchError = LlmError::Busy.into();
        assert!(matches!(err, DispatchError::Llm(LlmError::Busy)));
        assert!(err.to_string().contains("already in flight"));
    }

    #[test]
    fn test_conversion_to_banter_error() {
        let err: BanterError = DispatchError::NotReady.into();
        assert!(matches!(err, BanterError::Dispatch(_)));
    }
}
