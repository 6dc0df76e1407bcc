use thiserror::Error;

/// Failures raised by menu navigation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    /// The quick reply text was not a page number we can render.
    #[error("invalid menu selection `{0}`")]
    InvalidInput(String),
    /// The user never sent "start", or the session was evicted.
    #[error("no menu session for user {0}")]
    NoSession(String),
}

impl NavError {
    /// `true` for expected states that only need an info log.
    pub fn is_benign(&self) -> bool {
        matches!(self, NavError::NoSession(_))
    }

    pub fn code(&self) -> &'static str {
        match self {
            NavError::InvalidInput(_) => "invalid_input",
            NavError::NoSession(_) => "no_session",
        }
    }
}
