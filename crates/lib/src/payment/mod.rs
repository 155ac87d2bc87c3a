//! Card details for the simulated payment step.
//!
//! No payment is ever processed. This module only normalises what the user
//! types (grouping card digits, inserting the expiry slash) and checks the
//! fields before the payment session starts its simulated processing.

mod errors;


use std::fmt;

use serde::{Deserialize, Serialize};

pub use errors::{FieldError, PaymentError};

/// A card form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardField {
    Name,
    Number,
    Expiry,
    Cvv,
}

impl fmt::Display for CardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CardField::Name => "name",
            CardField::Number => "card number",
            CardField::Expiry => "expiry date",
            CardField::Cvv => "cvv",
        })
    }
}

/// Card details as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    pub name: String,
    pub number: String,
    pub expiry: String,
    pub cvv: String,
}

impl CardDetails {
    /// Build card details, normalising number and expiry the way the form
    /// does while typing.
    pub fn new(
        name: impl Into<String>,
        number: &str,
        expiry: &str,
        cvv: &str,
    ) -> Self {
        Self {
            name: name.into(),
            number: format_card_number(number),
            expiry: format_expiry(expiry),
            cvv: cvv.chars().filter(char::is_ascii_digit).take(4).collect(),
        }
    }

    /// Check every field, reporting all failures at once.
    pub fn validate(&self) -> Result<(), PaymentError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new(CardField::Name, "Cardholder name is required"));
        }
        if !is_grouped_card_number(&self.number) {
            errors.push(FieldError::new(
                CardField::Number,
                "Card number must be 16 digits",
            ));
        }
        if !is_valid_expiry(&self.expiry) {
            errors.push(FieldError::new(CardField::Expiry, "Expiry must be MM/YY"));
        }
        if !(self.cvv.len() == 3 && self.cvv.chars().all(|c| c.is_ascii_digit())) {
            errors.push(FieldError::new(CardField::Cvv, "CVV must be 3 digits"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PaymentError::InvalidCard { errors })
        }
    }

    /// Last four digits of the card, for confirmations.
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self.number.chars().filter(char::is_ascii_digit).collect();
        digits[digits.len().saturating_sub(4)..].iter().collect()
    }
}

/// Group card digits in blocks of four: "4242424242424242" becomes
/// "4242 4242 4242 4242".
///
/// Non-digits are dropped and at most 16 digits are kept. Input with fewer
/// than four digits is returned unchanged so partially typed text stays
/// editable.
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(16)
        .collect();
    if digits.len() < 4 {
        return input.to_string();
    }
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Insert the slash into an expiry date once the month is complete:
/// "1226" becomes "12/26".
pub fn format_expiry(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.len() >= 3 {
        let year_end = digits.len().min(4);
        format!("{}/{}", &digits[..2], &digits[2..year_end])
    } else {
        digits
    }
}

fn is_grouped_card_number(number: &str) -> bool {
    let groups: Vec<&str> = number.split(' ').collect();
    groups.len() == 4
        && groups
            .iter()
            .all(|g| g.len() == 4 && g.chars().all(|c| c.is_ascii_digit()))
}

fn is_valid_expiry(expiry: &str) -> bool {
    let Some((month, year)) = expiry.split_once('/') else {
        return false;
    };
    let month_ok = month.len() == 2
        && month
            .parse::<u8>()
            .is_ok_and(|m| (1..=12).contains(&m));
    let year_ok = year.len() == 2 && year.chars().all(|c| c.is_ascii_digit());
    month_ok && year_ok
}
