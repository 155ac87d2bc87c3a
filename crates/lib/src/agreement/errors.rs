//! Agreement error types.

use thiserror::Error;

/// Errors raised while building or pricing agreement terms.
///
/// All of these are validation errors: they are shown next to the
/// offending field and keep the flow on the agreement step.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AgreementError {
    /// The amount field could not be read as a positive number.
    #[error("Please enter a valid investment amount")]
    InvalidAmount {
        /// What the user typed
        input: String,
    },

    /// Principal must be positive and finite.
    #[error("Principal must be positive, got {value}")]
    InvalidPrincipal {
        /// The rejected principal
        value: f64,
    },

    /// Term must be at least one period.
    #[error("Term must be at least one month")]
    InvalidTerm,

    /// Not one of the offered investment periods.
    #[error("Unknown investment period: {label}")]
    UnknownTerm {
        /// The label that did not match
        label: String,
    },

    /// Rate must be zero or positive and finite.
    #[error("Interest rate must not be negative, got {value}")]
    InvalidRate {
        /// The rejected rate
        value: f64,
    },

    /// The rate field could not be read as a percentage.
    #[error("Invalid interest rate: {input}")]
    InvalidRateInput {
        /// What the user typed
        input: String,
    },

    /// Equity must lie between 0 and 100.
    #[error("Equity must be between 0 and 100 percent, got {value}")]
    InvalidEquity {
        /// The rejected equity
        value: f64,
    },
}

impl AgreementError {
    /// Every agreement error is a rejected input.
    pub fn is_validation_error(&self) -> bool {
        true
    }

    /// Name of the form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            AgreementError::InvalidAmount { .. } | AgreementError::InvalidPrincipal { .. } => {
                "amount"
            }
            AgreementError::InvalidTerm | AgreementError::UnknownTerm { .. } => "time",
            AgreementError::InvalidRate { .. } | AgreementError::InvalidRateInput { .. } => {
                "interest"
            }
            AgreementError::InvalidEquity { .. } => "equity",
        }
    }
}

impl From<AgreementError> for crate::Error {
    fn from(err: AgreementError) -> Self {
        crate::Error::Agreement(err)
    }
}
