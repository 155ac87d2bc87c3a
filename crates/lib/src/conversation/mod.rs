//! Conversations between the investor and a contact.
//!
//! * [`ConversationStore`] holds the append-only message lists, one per
//!   conversation key.
//! * [`ConversationController`] drives one open conversation: draft
//!   editing, sending, and the simulated counterparty reply.
//! * [`ReplyStrategy`] picks what the counterparty says back.

mod controller;
mod errors;
mod replies;
mod store;


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use controller::{ComposerState, ConversationController};
pub use errors::ConversationError;
pub use replies::{CannedReplies, EchoReplies, ReplyStrategy};
pub use store::ConversationStore;

use crate::Id;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Originator {
    /// The local investor.
    User,
    /// The contact or startup on the other side.
    Counterparty,
}

/// Delivery state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Received,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation: Id,
    pub originator: Originator,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub status: DeliveryStatus,
}

impl Message {
    /// A message written by the investor.
    pub fn from_user(conversation: Id, body: impl Into<String>, sent_at: DateTime<Utc>) -> Self {
        Self {
            id: new_message_id(),
            conversation,
            originator: Originator::User,
            body: body.into(),
            sent_at,
            status: DeliveryStatus::Sent,
        }
    }

    /// A message written by the other side.
    pub fn from_counterparty(
        conversation: Id,
        body: impl Into<String>,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_message_id(),
            conversation,
            originator: Originator::Counterparty,
            body: body.into(),
            sent_at,
            status: DeliveryStatus::Received,
        }
    }

    pub fn is_from_user(&self) -> bool {
        self.originator == Originator::User
    }
}

fn new_message_id() -> String {
    format!("msg-{}", uuid::Uuid::new_v4().simple())
}
