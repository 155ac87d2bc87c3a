//! Amount input parsing and currency display.

use super::AgreementError;

/// Parse an amount typed into the agreement form.
///
/// Only digits and thousands separators are accepted ("250,000"). Empty,
/// zero, and anything else is rejected.
pub fn parse_amount(input: &str) -> Result<u64, AgreementError> {
    let invalid = || AgreementError::InvalidAmount {
        input: input.to_string(),
    };
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit() || c == ',') {
        return Err(invalid());
    }
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    match digits.parse::<u64>() {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(amount) => Ok(amount),
    }
}

/// Format a dollar value as "$1,234.56" with `decimals` fraction digits.
pub fn format_currency(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return format!("${:.*}", decimals, 0.0);
    }
    let formatted = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(fraction) => format!("{sign}${grouped}.{fraction}"),
        None => format!("{sign}${grouped}"),
    }
}
