//! The in-memory repository every component works against.
//!
//! A [`Marketplace`] bundles the [`Catalog`] and the [`ConversationStore`]
//! and checks that they agree: every stored message must belong to a
//! conversation the catalog can resolve. It also keeps the agreements
//! already proposed to startups. Components receive it as an
//! `Arc<Marketplace>` rather than reaching for global data, so tests can
//! build one from their own fixtures.

mod fixtures;

use std::collections::HashMap;

use crate::agreement::SavedAgreement;
use crate::catalog::{Catalog, CatalogError};
use crate::conversation::ConversationStore;
use crate::{Clock, Id, Result};

use fixtures::{BUNDLED, Fixture};

/// Catalog plus conversations.
#[derive(Debug)]
pub struct Marketplace {
    catalog: Catalog,
    conversations: ConversationStore,
    agreements: HashMap<Id, SavedAgreement>,
}

impl Marketplace {
    /// Combine a catalog with a message store.
    ///
    /// Fails with a data-shape error if a stored message's conversation key
    /// names neither a contact nor a startup.
    pub fn new(catalog: Catalog, conversations: ConversationStore) -> Result<Self> {
        for key in conversations.keys() {
            if !catalog.contains(&key) {
                let message = conversations
                    .appended(&key)
                    .first()
                    .map(|m| m.id.clone())
                    .unwrap_or_default();
                tracing::warn!(conversation = %key, "Messages for unknown conversation");
                return Err(CatalogError::DanglingConversation {
                    message,
                    conversation: key,
                }
                .into());
            }
        }
        Ok(Self {
            catalog,
            conversations,
            agreements: HashMap::new(),
        })
    }

    /// Attach previously proposed agreements, at most one per startup.
    ///
    /// Each must name a listed startup and carry terms that pass
    /// validation; anything else is a data-shape error.
    pub fn with_agreements(
        mut self,
        agreements: impl IntoIterator<Item = SavedAgreement>,
    ) -> Result<Self> {
        for agreement in agreements {
            let startup = agreement.startup_id.clone();
            if self.catalog.startup(&startup).is_err() {
                return Err(CatalogError::DanglingAgreement { startup }.into());
            }
            if let Err(err) = agreement.terms() {
                return Err(CatalogError::InvalidAgreement {
                    startup,
                    reason: err.to_string(),
                }
                .into());
            }
            if self.agreements.insert(startup.clone(), agreement).is_some() {
                return Err(CatalogError::DuplicateId { id: startup }.into());
            }
        }
        Ok(self)
    }

    /// Build a marketplace from JSON mock data.
    ///
    /// Relative times in the data ("minutes ago") are anchored at
    /// `clock.now()`.
    pub fn from_json(json: &str, clock: &dyn Clock) -> Result<Self> {
        let loaded = Fixture::parse(json)?.resolve(clock)?;
        let catalog = Catalog::new(loaded.startups, loaded.contacts)?;
        let conversations = ConversationStore::with_messages(loaded.messages)?;
        Self::new(catalog, conversations)?.with_agreements(loaded.agreements)
    }

    /// The mock data bundled with the crate.
    pub fn with_fixtures(clock: &dyn Clock) -> Result<Self> {
        Self::from_json(BUNDLED, clock)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    /// The agreement already proposed to a startup, if any.
    pub fn saved_agreement(&self, startup_id: &Id) -> Option<&SavedAgreement> {
        self.agreements.get(startup_id)
    }
}
