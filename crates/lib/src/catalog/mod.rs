//! Catalog of startup listings and the contact directory.
//!
//! Startups are immutable once the catalog is built. Contacts carry a
//! summary of the latest message in their conversation, which the
//! conversation controller refreshes on every append, so the contact list
//! sits behind a lock while startups are plain data.

mod activity;
mod errors;


use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use activity::relative_label;
pub use errors::CatalogError;

use crate::conversation::Originator;
use crate::{Id, Result};

/// A startup looking for investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Startup {
    pub id: Id,
    pub name: String,
    pub description: String,
    /// What the founders are asking for, in their words.
    #[serde(default)]
    pub pitch: String,
    pub category: String,
    /// Requested investment in whole dollars.
    pub requested_amount: u64,
    /// Equity offered, 0 to 100.
    pub equity_percent: f64,
    pub location: String,
    pub founder: String,
    #[serde(default)]
    pub founded: Option<u16>,
    /// Funding raised before listing, e.g. "$50K".
    #[serde(default)]
    pub prior_funding: Option<String>,
}

impl Startup {
    fn validate(&self) -> std::result::Result<(), CatalogError> {
        let invalid = |reason: &str| CatalogError::InvalidStartup {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.id.is_empty() {
            return Err(invalid("empty identifier"));
        }
        if self.name.trim().is_empty() {
            return Err(invalid("empty name"));
        }
        if !self.equity_percent.is_finite() || !(0.0..=100.0).contains(&self.equity_percent) {
            return Err(invalid("equity must be between 0 and 100"));
        }
        Ok(())
    }
}

/// Summary of the most recent message exchanged with a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub text: String,
    pub at: DateTime<Utc>,
    pub read: bool,
    pub originator: Originator,
}

impl ActivitySummary {
    /// Relative time label for display, e.g. "Yesterday".
    pub fn label(&self, now: DateTime<Utc>) -> String {
        relative_label(now, self.at)
    }
}

/// Someone the investor can message, usually a startup's founder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// The startup this contact represents, if any.
    #[serde(default)]
    pub startup_id: Option<Id>,
    #[serde(default)]
    pub unread: u32,
    #[serde(default)]
    pub last_message: Option<ActivitySummary>,
}

impl Contact {
    fn validate(&self) -> std::result::Result<(), CatalogError> {
        let invalid = |reason: &str| CatalogError::InvalidContact {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.id.is_empty() {
            return Err(invalid("empty identifier"));
        }
        if self.name.trim().is_empty() {
            return Err(invalid("empty name"));
        }
        Ok(())
    }

    /// Milliseconds timestamp of the latest activity, 0 if none.
    pub fn last_activity_millis(&self) -> i64 {
        self.last_message
            .as_ref()
            .map(|m| m.at.timestamp_millis())
            .unwrap_or(0)
    }
}

/// The other side of a conversation.
///
/// A conversation can be opened with a contact identifier or a startup
/// identifier, so either half may be missing, but never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Counterparty {
    pub contact: Option<Contact>,
    pub startup: Option<Startup>,
}

impl Counterparty {
    /// Key under which this conversation's messages are stored.
    pub fn conversation_key(&self) -> Id {
        match (&self.contact, &self.startup) {
            (Some(contact), _) => contact.id.clone(),
            (None, Some(startup)) => startup.id.clone(),
            (None, None) => Id::default(),
        }
    }

    /// Name to show in the conversation header.
    pub fn display_name(&self) -> &str {
        match (&self.contact, &self.startup) {
            (Some(contact), _) => &contact.name,
            (None, Some(startup)) => &startup.name,
            (None, None) => "",
        }
    }
}

/// A startup resolved for the agreement and payment steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deal {
    pub startup: Startup,
    pub contact: Option<Contact>,
}

/// In-memory catalog of startups and contacts.
#[derive(Debug)]
pub struct Catalog {
    startups: Vec<Startup>,
    startup_index: HashMap<Id, usize>,
    contacts: RwLock<Vec<Contact>>,
    contact_index: HashMap<Id, usize>,
}

impl Catalog {
    /// Build a catalog, checking identifiers and references.
    ///
    /// Insertion order is kept; search results and unsorted listings come
    /// back in this order.
    pub fn new(startups: Vec<Startup>, contacts: Vec<Contact>) -> Result<Self> {
        let mut startup_index = HashMap::with_capacity(startups.len());
        for (pos, startup) in startups.iter().enumerate() {
            startup.validate()?;
            if startup_index.insert(startup.id.clone(), pos).is_some() {
                return Err(CatalogError::DuplicateId {
                    id: startup.id.clone(),
                }
                .into());
            }
        }

        let mut contact_index = HashMap::with_capacity(contacts.len());
        for (pos, contact) in contacts.iter().enumerate() {
            contact.validate()?;
            if startup_index.contains_key(&contact.id)
                || contact_index.insert(contact.id.clone(), pos).is_some()
            {
                return Err(CatalogError::DuplicateId {
                    id: contact.id.clone(),
                }
                .into());
            }
            if let Some(startup) = &contact.startup_id {
                if !startup_index.contains_key(startup) {
                    return Err(CatalogError::DanglingStartupReference {
                        contact: contact.id.clone(),
                        startup: startup.clone(),
                    }
                    .into());
                }
            }
        }

        tracing::debug!(
            startups = startups.len(),
            contacts = contacts.len(),
            "Catalog loaded"
        );

        Ok(Self {
            startups,
            startup_index,
            contacts: RwLock::new(contacts),
            contact_index,
        })
    }

    /// All startups in catalog order.
    pub fn startups(&self) -> &[Startup] {
        &self.startups
    }

    /// Look up a startup by identifier.
    pub fn startup(&self, id: &Id) -> Result<&Startup> {
        self.startup_index
            .get(id)
            .map(|&pos| &self.startups[pos])
            .ok_or_else(|| CatalogError::StartupNotFound { id: id.clone() }.into())
    }

    /// Snapshot of all contacts in directory order.
    pub fn contacts(&self) -> Vec<Contact> {
        self.contacts
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Look up a contact by identifier.
    pub fn contact(&self, id: &Id) -> Result<Contact> {
        self.find_contact(|c| &c.id == id)
            .ok_or_else(|| CatalogError::ContactNotFound { id: id.clone() }.into())
    }

    /// The contact representing a startup, if one exists.
    pub fn contact_for_startup(&self, startup_id: &Id) -> Option<Contact> {
        self.find_contact(|c| c.startup_id.as_ref() == Some(startup_id))
    }

    /// Whether the identifier names any contact or startup.
    pub fn contains(&self, id: &Id) -> bool {
        self.startup_index.contains_key(id) || self.contact_index.contains_key(id)
    }

    /// Resolve a conversation identifier.
    ///
    /// A contact identifier resolves to the contact and its startup; a
    /// startup identifier resolves to the startup and its contact, if any.
    pub fn resolve(&self, id: &Id) -> Result<Counterparty> {
        let contact = self
            .find_contact(|c| &c.id == id)
            .or_else(|| self.contact_for_startup(id));
        let startup = match &contact {
            Some(Contact {
                startup_id: Some(startup_id),
                ..
            }) => self.startup(startup_id).ok().cloned(),
            _ => self.startup(id).ok().cloned(),
        };

        if contact.is_none() && startup.is_none() {
            tracing::warn!(%id, "Conversation target not found");
            return Err(CatalogError::UnknownIdentifier { id: id.clone() }.into());
        }
        Ok(Counterparty { contact, startup })
    }

    /// Resolve an identifier to a startup for the agreement or payment step.
    ///
    /// Accepts either the startup identifier or the identifier of a contact
    /// linked to it.
    pub fn resolve_deal(&self, id: &Id) -> Result<Deal> {
        let contact = self
            .find_contact(|c| &c.id == id)
            .or_else(|| self.contact_for_startup(id));
        let startup_id = contact
            .as_ref()
            .and_then(|c| c.startup_id.clone())
            .unwrap_or_else(|| id.clone());

        match self.startup(&startup_id) {
            Ok(startup) => Ok(Deal {
                startup: startup.clone(),
                contact,
            }),
            Err(_) => {
                tracing::warn!(%id, "Deal target not found");
                Err(CatalogError::StartupNotFound { id: id.clone() }.into())
            }
        }
    }

    /// Refresh a contact's latest-message summary.
    ///
    /// Counterparty messages bump the unread count. Keys that do not belong
    /// to a contact (startup-only conversations) are ignored.
    pub fn record_activity(&self, key: &Id, summary: ActivitySummary) {
        let Some(&pos) = self.contact_index.get(key) else {
            return;
        };
        let mut contacts = self.contacts.write().unwrap_or_else(|e| e.into_inner());
        let contact = &mut contacts[pos];
        if summary.originator == Originator::Counterparty && !summary.read {
            contact.unread += 1;
        }
        contact.last_message = Some(summary);
    }

    /// Clear the unread count and mark the latest message read.
    pub fn mark_read(&self, key: &Id) {
        let Some(&pos) = self.contact_index.get(key) else {
            return;
        };
        let mut contacts = self.contacts.write().unwrap_or_else(|e| e.into_inner());
        let contact = &mut contacts[pos];
        contact.unread = 0;
        if let Some(last) = contact.last_message.as_mut() {
            last.read = true;
        }
    }

    fn find_contact(&self, pred: impl Fn(&Contact) -> bool) -> Option<Contact> {
        self.contacts
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|c| pred(c))
            .cloned()
    }
}
