//! Error types for the portal automation layer.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum AutomationError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),
    #[error("Navigation failed: {0}")]
    Navigation(String),
    #[error("No element matches selector `{selector}`: {reason}")]
    ElementNotFound { selector: String, reason: String },
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
    #[error("Page evaluation failed: {0}")]
    Evaluation(String),
    #[error("Invalid selector `{0}`")]
    InvalidSelector(String),
    #[error("Browser protocol error: {0}")]
    Protocol(String),
    #[error("Failed to close browser: {0}")]
    Close(String),
}

impl AutomationError {
    /// Short, stable label reported to callers in a failed `QueryResult`.
    ///
    /// The full message stays in the logs; callers only branch on the kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Launch(_) => "LaunchError",
            Self::Navigation(_) => "NavigationError",
            Self::ElementNotFound { .. } => "ElementNotFound",
            Self::Timeout { .. } => "TimeoutError",
            Self::Evaluation(_) => "EvaluationError",
            Self::InvalidSelector(_) => "InvalidSelector",
            Self::Protocol(_) => "ProtocolError",
            Self::Close(_) => "CloseError",
        }
    }

    pub(crate) fn element(selector: &str, reason: impl ToString) -> Self {
        Self::ElementNotFound {
            selector: selector.to_owned(),
            reason: reason.to_string(),
        }
    }
}
