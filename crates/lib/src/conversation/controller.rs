//! State machine for one open conversation.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::{ConversationError, Message, ReplyStrategy};
use crate::catalog::{ActivitySummary, Counterparty};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::{Clock, Id, Marketplace, Result};

/// Where the composer of an open conversation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerState {
    /// Nothing typed, no reply outstanding.
    Idle,
    /// The draft holds non-blank text.
    Composing,
    /// A submitted draft is being appended.
    Sending,
    /// At least one simulated reply has not arrived yet.
    AwaitingReply,
}

/// Drives a single conversation view.
///
/// Sending appends the user's message right away and schedules the
/// counterparty's reply after the configured delay. Each send gets its own
/// reply; later sends never cancel earlier replies. Closing the controller,
/// or dropping it, cancels every reply that has not arrived.
#[derive(Debug)]
pub struct ConversationController {
    key: Id,
    counterparty: Counterparty,
    marketplace: Arc<Marketplace>,
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn Scheduler>,
    replies: Arc<dyn ReplyStrategy>,
    reply_delay: Duration,
    inner: Arc<Mutex<ComposerInner>>,
}

#[derive(Debug)]
struct ComposerInner {
    state: ComposerState,
    draft: String,
    pending: Vec<TaskHandle>,
    outstanding: usize,
    closed: bool,
}

impl ComposerInner {
    /// State implied by the draft and the outstanding replies.
    fn settle(&mut self) {
        self.pending.retain(TaskHandle::is_pending);
        self.state = if !self.draft.trim().is_empty() {
            ComposerState::Composing
        } else if self.outstanding > 0 {
            ComposerState::AwaitingReply
        } else {
            ComposerState::Idle
        };
    }
}

impl ConversationController {
    /// Open the conversation identified by `id`.
    ///
    /// `id` may name a contact or a startup. Opening marks the contact's
    /// messages read.
    pub fn open(
        marketplace: Arc<Marketplace>,
        id: &Id,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn Scheduler>,
        replies: Arc<dyn ReplyStrategy>,
        reply_delay: Duration,
    ) -> Result<Self> {
        let counterparty = marketplace.catalog().resolve(id)?;
        let key = counterparty.conversation_key();
        marketplace.catalog().mark_read(&key);
        tracing::debug!(conversation = %key, "Conversation opened");

        Ok(Self {
            key,
            counterparty,
            marketplace,
            clock,
            scheduler,
            replies,
            reply_delay,
            inner: Arc::new(Mutex::new(ComposerInner {
                state: ComposerState::Idle,
                draft: String::new(),
                pending: Vec::new(),
                outstanding: 0,
                closed: false,
            })),
        })
    }

    /// Key under which this conversation's messages are stored.
    pub fn key(&self) -> &Id {
        &self.key
    }

    /// The contact and/or startup on the other side.
    pub fn counterparty(&self) -> &Counterparty {
        &self.counterparty
    }

    pub fn state(&self) -> ComposerState {
        self.lock().state
    }

    pub fn draft(&self) -> String {
        self.lock().draft.clone()
    }

    /// Replies scheduled but not yet delivered.
    pub fn outstanding_replies(&self) -> usize {
        self.lock().outstanding
    }

    /// Messages of this conversation, oldest first.
    pub fn thread(&self) -> Vec<Message> {
        self.marketplace.conversations().thread(&self.key)
    }

    /// Replace the draft text.
    ///
    /// Whitespace-only text does not move the composer out of its current
    /// resting state.
    pub fn edit_draft(&self, text: impl Into<String>) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        inner.draft = text.into();
        inner.settle();
    }

    /// Submit the current draft.
    ///
    /// A blank draft is rejected with [`ConversationError::EmptyDraft`] and
    /// leaves the conversation untouched. Otherwise the trimmed text is
    /// appended as a user message, the draft is cleared, and a reply is
    /// scheduled.
    pub fn send(&self) -> Result<Message> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(ConversationError::Closed {
                key: self.key.clone(),
            }
            .into());
        }
        let body = inner.draft.trim().to_string();
        if body.is_empty() {
            return Err(ConversationError::EmptyDraft.into());
        }

        inner.state = ComposerState::Sending;
        let message = Message::from_user(self.key.clone(), body, self.clock.now());
        if let Err(err) = self.marketplace.conversations().append(&self.key, message.clone()) {
            inner.settle();
            return Err(err);
        }
        self.marketplace.catalog().record_activity(
            &self.key,
            ActivitySummary {
                text: message.body.clone(),
                at: message.sent_at,
                read: true,
                originator: message.originator,
            },
        );
        inner.draft.clear();
        tracing::info!(conversation = %self.key, message = %message.id, "Message sent");

        let handle = self.schedule_reply(message.body.clone());
        inner.pending.push(handle);
        inner.outstanding += 1;
        inner.state = ComposerState::AwaitingReply;
        Ok(message)
    }

    /// Convenience for `edit_draft` followed by `send`.
    pub fn send_text(&self, text: impl Into<String>) -> Result<Message> {
        self.edit_draft(text);
        self.send()
    }

    /// Stop the conversation: cancel pending replies and refuse input.
    pub fn close(&self) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        let cancelled = inner.outstanding;
        for handle in inner.pending.drain(..) {
            handle.cancel();
        }
        inner.outstanding = 0;
        inner.closed = true;
        inner.draft.clear();
        inner.state = ComposerState::Idle;
        tracing::debug!(conversation = %self.key, cancelled, "Conversation closed");
    }

    fn schedule_reply(&self, user_text: String) -> TaskHandle {
        let key = self.key.clone();
        let marketplace = Arc::clone(&self.marketplace);
        let clock = Arc::clone(&self.clock);
        let replies = Arc::clone(&self.replies);
        let inner = Arc::clone(&self.inner);

        self.scheduler.schedule(
            self.reply_delay,
            Box::new(move || {
                let reply = Message::from_counterparty(
                    key.clone(),
                    replies.reply(&user_text),
                    clock.now(),
                );
                match marketplace.conversations().append(&key, reply.clone()) {
                    Ok(()) => {
                        marketplace.catalog().record_activity(
                            &key,
                            ActivitySummary {
                                text: reply.body.clone(),
                                at: reply.sent_at,
                                read: false,
                                originator: reply.originator,
                            },
                        );
                        tracing::info!(conversation = %key, message = %reply.id, "Reply received");
                    }
                    Err(err) => {
                        tracing::warn!(conversation = %key, error = %err, "Dropping simulated reply");
                    }
                }

                let mut inner = inner.lock().unwrap_or_else(|e| e.into_inner());
                inner.outstanding = inner.outstanding.saturating_sub(1);
                if !inner.closed {
                    inner.settle();
                }
            }),
        )
    }

    fn lock(&self) -> MutexGuard<'_, ComposerInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for ConversationController {
    fn drop(&mut self) {
        self.close();
    }
}
