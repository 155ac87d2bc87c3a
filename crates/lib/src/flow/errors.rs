//! Flow error types.

use thiserror::Error;

/// Errors raised while moving between views.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FlowError {
    /// The path names no view.
    #[error("Page not found: {path}")]
    UnknownRoute {
        /// The path as requested
        path: String,
    },

    /// The step was already submitted and is waiting on its timers.
    #[error("The {step} step was already submitted")]
    AlreadySubmitted { step: &'static str },

    /// The step's view was closed.
    #[error("The {step} step is closed")]
    Closed { step: &'static str },
}

impl FlowError {
    /// Check if this error indicates a route did not resolve.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FlowError::UnknownRoute { .. })
    }

    /// Check if this error is a rejected action in the current state.
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            FlowError::AlreadySubmitted { .. } | FlowError::Closed { .. }
        )
    }
}

impl From<FlowError> for crate::Error {
    fn from(err: FlowError) -> Self {
        crate::Error::Flow(err)
    }
}
