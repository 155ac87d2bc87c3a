//! Conversation error types.

use thiserror::Error;

use crate::Id;

/// Errors raised while composing or storing messages.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConversationError {
    /// The draft is empty after trimming whitespace.
    #[error("Cannot send an empty message")]
    EmptyDraft,

    /// The conversation has been closed and accepts no more input.
    #[error("Conversation {key} is closed")]
    Closed {
        /// The conversation key
        key: Id,
    },

    /// A message was routed to a conversation it does not belong to.
    #[error("Message {message} does not belong to conversation {key}")]
    WrongConversation {
        /// The offending message
        message: String,
        /// The conversation it was appended to
        key: Id,
    },

    /// A message written by the user has no text.
    #[error("User message {message} in conversation {key} has an empty body")]
    EmptyUserMessage {
        /// The offending message
        message: String,
        /// The conversation key
        key: Id,
    },

    /// Message identifiers must be unique within a conversation.
    #[error("Duplicate message {message} in conversation {key}")]
    DuplicateMessage {
        /// The repeated message identifier
        message: String,
        /// The conversation key
        key: Id,
    },
}

impl ConversationError {
    /// Check if this error is a rejected user input.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, ConversationError::EmptyDraft)
    }

    /// Check if the conversation was closed before the action.
    pub fn is_closed(&self) -> bool {
        matches!(self, ConversationError::Closed { .. })
    }

    /// Check if this error comes from inconsistent message data.
    pub fn is_data_shape_error(&self) -> bool {
        matches!(
            self,
            ConversationError::WrongConversation { .. }
                | ConversationError::EmptyUserMessage { .. }
                | ConversationError::DuplicateMessage { .. }
        )
    }
}

impl From<ConversationError> for crate::Error {
    fn from(err: ConversationError) -> Self {
        crate::Error::Conversation(err)
    }
}
