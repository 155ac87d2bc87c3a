//! Payment error types.

use thiserror::Error;

use super::CardField;

/// A problem with one card field, shown next to that field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: CardField,
    pub message: String,
}

impl FieldError {
    pub fn new(field: CardField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Errors raised by the payment step.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PaymentError {
    /// One or more card fields are invalid.
    #[error("Invalid card details: {}", fields(errors))]
    InvalidCard {
        /// Every failing field, in form order
        errors: Vec<FieldError>,
    },

    /// The amount carried into the payment step is not positive.
    #[error("Payment amount must be positive")]
    InvalidAmount,
}

fn fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.field.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl PaymentError {
    /// Check if this error is a rejected user input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            PaymentError::InvalidCard { .. } | PaymentError::InvalidAmount
        )
    }

    /// Field errors, empty for errors not tied to a field.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            PaymentError::InvalidCard { errors } => errors,
            _ => &[],
        }
    }
}

impl From<PaymentError> for crate::Error {
    fn from(err: PaymentError) -> Self {
        crate::Error::Payment(err)
    }
}
