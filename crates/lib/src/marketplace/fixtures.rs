//! JSON schema of the bundled mock data.
//!
//! Times are stored as "minutes ago" so the data reads the same whenever
//! it is loaded; they are resolved against the clock at load time.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::agreement::SavedAgreement;
use crate::catalog::{ActivitySummary, CatalogError, Contact, Startup};
use crate::conversation::{DeliveryStatus, Message, Originator};
use crate::{Clock, Id};

/// Mock data bundled with the crate.
pub(crate) const BUNDLED: &str = include_str!("fixtures.json");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Fixture {
    startups: Vec<Startup>,
    #[serde(default)]
    contacts: Vec<ContactRecord>,
    #[serde(default)]
    messages: Vec<MessageRecord>,
    #[serde(default)]
    agreements: Vec<SavedAgreement>,
}

#[derive(Debug, Deserialize)]
struct ContactRecord {
    id: Id,
    name: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    startup_id: Option<Id>,
    #[serde(default)]
    unread: u32,
    #[serde(default)]
    last_message: Option<SummaryRecord>,
}

#[derive(Debug, Deserialize)]
struct SummaryRecord {
    text: String,
    minutes_ago: i64,
    #[serde(default)]
    read: bool,
    originator: Originator,
}

#[derive(Debug, Deserialize)]
struct MessageRecord {
    id: String,
    conversation: Id,
    originator: Originator,
    body: String,
    minutes_ago: i64,
}

/// Entities built from a fixture, with times resolved.
pub(crate) struct Loaded {
    pub startups: Vec<Startup>,
    pub contacts: Vec<Contact>,
    pub messages: Vec<Message>,
    pub agreements: Vec<SavedAgreement>,
}

impl Fixture {
    pub(crate) fn parse(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(|source| CatalogError::MalformedData { source })
    }

    /// Resolve relative times against the clock.
    ///
    /// An offset that lands outside the representable time range is a
    /// data-shape error naming the record.
    pub(crate) fn resolve(self, clock: &dyn Clock) -> Result<Loaded, CatalogError> {
        let now = clock.now();
        let contacts = self
            .contacts
            .into_iter()
            .map(|c| -> Result<Contact, CatalogError> {
                let last_message = match c.last_message {
                    Some(m) => Some(ActivitySummary {
                        at: minutes_before(now, m.minutes_ago, c.id.as_str())?,
                        text: m.text,
                        read: m.read,
                        originator: m.originator,
                    }),
                    None => None,
                };
                Ok(Contact {
                    id: c.id,
                    name: c.name,
                    role: c.role,
                    email: c.email,
                    startup_id: c.startup_id,
                    unread: c.unread,
                    last_message,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;
        let messages = self
            .messages
            .into_iter()
            .map(|m| -> Result<Message, CatalogError> {
                Ok(Message {
                    sent_at: minutes_before(now, m.minutes_ago, &m.id)?,
                    id: m.id,
                    conversation: m.conversation,
                    originator: m.originator,
                    body: m.body,
                    status: match m.originator {
                        Originator::User => DeliveryStatus::Sent,
                        Originator::Counterparty => DeliveryStatus::Received,
                    },
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        Ok(Loaded {
            startups: self.startups,
            contacts,
            messages,
            agreements: self.agreements,
        })
    }
}

fn minutes_before(
    now: DateTime<Utc>,
    minutes: i64,
    record: &str,
) -> Result<DateTime<Utc>, CatalogError> {
    Duration::try_minutes(minutes)
        .and_then(|offset| now.checked_sub_signed(offset))
        .ok_or_else(|| CatalogError::InvalidTimestamp {
            record: record.to_string(),
            minutes_ago: minutes,
        })
}
