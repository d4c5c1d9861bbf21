use crate::profile::Phase;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown profile slot: {0}")]
    UnknownProfile(usize),

    #[error("Choice does not match any option of the current situation: {0}")]
    InvalidChoice(String),

    #[error("Operation not allowed in phase {phase:?}")]
    PhaseMismatch { phase: Phase },

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Whether the session is still usable after this error.
    ///
    /// Every engine error leaves state untouched, so all of them are
    /// recoverable; the distinction only matters to front-ends deciding
    /// between a retry prompt and a hard abort.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CoreError::InvalidContent(_))
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_content_errors_are_fatal() {
        assert!(CoreError::InvalidChoice("x".to_string()).is_recoverable());
        assert!(CoreError::UnknownProfile(7).is_recoverable());
        assert!(!CoreError::InvalidContent("broken set".to_string()).is_recoverable());
    }

    #[test]
    fn test_messages_carry_context() {
        let err = CoreError::PhaseMismatch { phase: Phase::Debrief1 };
        assert!(err.to_string().contains("Debrief1"));

        let err = CoreError::InvalidChoice("Ne rien dire".to_string());
        assert!(err.to_string().contains("Ne rien dire"));
    }
}
