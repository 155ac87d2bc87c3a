//! Catalog error types.
//!
//! Lookups that miss surface as not-found errors; anything wrong with the
//! mock data itself (duplicate identifiers, dangling references, JSON that
//! does not match the schema) is a data-shape error.

use thiserror::Error;

use crate::Id;

/// Errors raised by catalog construction and lookups.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No startup with this identifier.
    #[error("Startup not found: {id}")]
    StartupNotFound {
        /// The identifier that did not resolve
        id: Id,
    },

    /// No contact with this identifier.
    #[error("Contact not found: {id}")]
    ContactNotFound {
        /// The identifier that did not resolve
        id: Id,
    },

    /// Identifier names neither a contact nor a startup.
    #[error("Contact or startup not found: {id}")]
    UnknownIdentifier {
        /// The identifier that did not resolve
        id: Id,
    },

    /// Two entities share an identifier.
    #[error("Duplicate identifier in catalog: {id}")]
    DuplicateId {
        /// The repeated identifier
        id: Id,
    },

    /// A contact links to a startup that is not in the catalog.
    #[error("Contact {contact} references unknown startup {startup}")]
    DanglingStartupReference {
        /// The contact holding the link
        contact: Id,
        /// The missing startup
        startup: Id,
    },

    /// A seeded message belongs to a conversation nobody can open.
    #[error("Message {message} belongs to unknown conversation {conversation}")]
    DanglingConversation {
        /// The offending message
        message: String,
        /// The conversation key that did not resolve
        conversation: Id,
    },

    /// A startup record violates a field constraint.
    #[error("Invalid startup {id}: {reason}")]
    InvalidStartup {
        /// The startup identifier
        id: Id,
        /// Which constraint failed
        reason: String,
    },

    /// A contact record violates a field constraint.
    #[error("Invalid contact {id}: {reason}")]
    InvalidContact {
        /// The contact identifier
        id: Id,
        /// Which constraint failed
        reason: String,
    },

    /// A relative time in the mock data falls outside the supported range.
    #[error("Record {record} has an out-of-range time offset of {minutes_ago} minutes")]
    InvalidTimestamp {
        /// The contact or message carrying the offset
        record: String,
        /// The offending offset
        minutes_ago: i64,
    },

    /// A saved agreement refers to a startup that is not in the catalog.
    #[error("Saved agreement references unknown startup {startup}")]
    DanglingAgreement {
        /// The missing startup
        startup: Id,
    },

    /// A saved agreement carries terms that could never have been submitted.
    #[error("Invalid saved agreement for {startup}: {reason}")]
    InvalidAgreement {
        /// The startup the agreement is for
        startup: Id,
        /// Which constraint failed
        reason: String,
    },

    /// Mock data could not be parsed.
    #[error("Malformed catalog data")]
    MalformedData {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },
}

impl CatalogError {
    /// Check if this error indicates an identifier did not resolve.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::StartupNotFound { .. }
                | CatalogError::ContactNotFound { .. }
                | CatalogError::UnknownIdentifier { .. }
        )
    }

    /// Check if this error comes from malformed or inconsistent mock data.
    pub fn is_data_shape_error(&self) -> bool {
        matches!(
            self,
            CatalogError::DuplicateId { .. }
                | CatalogError::DanglingStartupReference { .. }
                | CatalogError::DanglingConversation { .. }
                | CatalogError::InvalidStartup { .. }
                | CatalogError::InvalidContact { .. }
                | CatalogError::InvalidTimestamp { .. }
                | CatalogError::DanglingAgreement { .. }
                | CatalogError::InvalidAgreement { .. }
                | CatalogError::MalformedData { .. }
        )
    }
}

impl From<CatalogError> for crate::Error {
    fn from(err: CatalogError) -> Self {
        crate::Error::Catalog(err)
    }
}
