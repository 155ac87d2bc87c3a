//!
//! DealsDive: a marketplace where investors browse startups, talk to their
//! founders, and walk through a simulated investment.
//! This library provides the in-memory core behind every view of the app.
//!
//! ## Core Concepts
//!
//! * **Marketplace (`marketplace::Marketplace`)**: The injected repository holding the catalog and all conversations. Built from bundled or caller-supplied mock data.
//! * **Catalog (`catalog::Catalog`)**: Startup listings and the contact directory, with identifier resolution for conversations and deals.
//! * **Search (`search`)**: Pure filtering and sorting of startups and contacts by term, category, investment range and activity.
//! * **Conversations (`conversation`)**: Append-only message threads and the controller that sends messages and schedules simulated replies.
//! * **Agreements (`agreement`)**: Repayment math for proposed investment terms, plus the form parsing and currency formatting around it.
//! * **Payments (`payment`)**: Card detail formatting and validation for the simulated payment step.
//! * **Flow (`flow`)**: Routes, views, and the timed agreement and payment sessions that move the user from negotiation to payment.
//! * **Time (`clock`, `scheduler`)**: Every timestamp and delay goes through an injected clock and scheduler so the flows can be driven deterministically.

pub mod agreement;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod flow;
pub mod id;
pub mod marketplace;
pub mod payment;
pub mod scheduler;
pub mod search;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ReplyMode, Settings};
pub use id::Id;
pub use marketplace::Marketplace;

/// Result type used throughout the DealsDive library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the DealsDive library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured catalog errors from the catalog module
    #[error(transparent)]
    Catalog(catalog::CatalogError),

    /// Structured search errors from the search module
    #[error(transparent)]
    Search(search::SearchError),

    /// Structured conversation errors from the conversation module
    #[error(transparent)]
    Conversation(conversation::ConversationError),

    /// Structured agreement errors from the agreement module
    #[error(transparent)]
    Agreement(agreement::AgreementError),

    /// Structured payment errors from the payment module
    #[error(transparent)]
    Payment(payment::PaymentError),

    /// Structured navigation errors from the flow module
    #[error(transparent)]
    Flow(flow::FlowError),

    /// Structured settings errors from the config module
    #[error(transparent)]
    Config(config::ConfigError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Catalog(_) => "catalog",
            Error::Search(_) => "search",
            Error::Conversation(_) => "conversation",
            Error::Agreement(_) => "agreement",
            Error::Payment(_) => "payment",
            Error::Flow(_) => "flow",
            Error::Config(_) => "config",
        }
    }

    /// Check if this error indicates an identifier or route did not resolve.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Catalog(catalog_err) => catalog_err.is_not_found(),
            Error::Flow(flow_err) => flow_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is a rejected user input.
    ///
    /// Validation errors are shown inline and leave the current step in
    /// place.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Search(search_err) => search_err.is_validation_error(),
            Error::Conversation(conversation_err) => conversation_err.is_validation_error(),
            Error::Agreement(agreement_err) => agreement_err.is_validation_error(),
            Error::Payment(payment_err) => payment_err.is_validation_error(),
            Error::Config(config_err) => config_err.is_validation_error(),
            _ => false,
        }
    }

    /// Check if this error comes from malformed or inconsistent data.
    pub fn is_data_shape_error(&self) -> bool {
        match self {
            Error::Catalog(catalog_err) => catalog_err.is_data_shape_error(),
            Error::Conversation(conversation_err) => conversation_err.is_data_shape_error(),
            _ => false,
        }
    }

    /// Check if this error is an action the current step does not allow.
    pub fn is_invalid_state(&self) -> bool {
        match self {
            Error::Flow(flow_err) => flow_err.is_invalid_state(),
            Error::Conversation(conversation_err) => conversation_err.is_closed(),
            _ => false,
        }
    }
}
