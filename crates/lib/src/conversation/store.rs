//! Append-only message storage partitioned by conversation key.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{ConversationError, Message, Originator};
use crate::{Id, Result};

/// In-memory message lists, one per conversation.
///
/// Messages are stored in append order and never modified. Readers always
/// get a thread sorted by timestamp, so a reply that lands after a later
/// send still displays in time order.
#[derive(Debug, Default)]
pub struct ConversationStore {
    threads: RwLock<HashMap<Id, Vec<Message>>>,
}

impl ConversationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with messages.
    pub fn with_messages(messages: impl IntoIterator<Item = Message>) -> Result<Self> {
        let store = Self::new();
        for message in messages {
            let key = message.conversation.clone();
            store.append(&key, message)?;
        }
        Ok(store)
    }

    /// Append a message to a conversation.
    ///
    /// User-authored messages must carry text.
    pub fn append(&self, key: &Id, message: Message) -> Result<()> {
        if &message.conversation != key {
            return Err(ConversationError::WrongConversation {
                message: message.id,
                key: key.clone(),
            }
            .into());
        }
        if message.originator == Originator::User && message.body.trim().is_empty() {
            return Err(ConversationError::EmptyUserMessage {
                message: message.id,
                key: key.clone(),
            }
            .into());
        }

        let mut threads = self.threads.write().unwrap_or_else(|e| e.into_inner());
        let thread = threads.entry(key.clone()).or_default();
        if thread.iter().any(|m| m.id == message.id) {
            return Err(ConversationError::DuplicateMessage {
                message: message.id,
                key: key.clone(),
            }
            .into());
        }
        tracing::trace!(conversation = %key, message = %message.id, "Message appended");
        thread.push(message);
        Ok(())
    }

    /// Messages of a conversation, oldest first.
    ///
    /// Ties keep append order. Unknown keys yield an empty thread.
    pub fn thread(&self, key: &Id) -> Vec<Message> {
        let mut messages = self
            .threads
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
            .unwrap_or_default();
        messages.sort_by_key(|m| m.sent_at);
        messages
    }

    /// Messages in the order they were appended.
    pub fn appended(&self, key: &Id) -> Vec<Message> {
        self.threads
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of messages in a conversation.
    pub fn len(&self, key: &Id) -> usize {
        self.threads
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .map_or(0, Vec::len)
    }

    /// Whether a conversation has no messages.
    pub fn is_empty(&self, key: &Id) -> bool {
        self.len(key) == 0
    }

    /// All conversation keys that hold at least one message.
    pub fn keys(&self) -> Vec<Id> {
        let mut keys: Vec<Id> = self
            .threads
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}
