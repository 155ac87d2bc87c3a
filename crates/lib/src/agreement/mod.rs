//! Investment agreement terms and repayment math.
//!
//! Rates are annual nominal percentages compounded monthly and terms are
//! counted in months, so the periodic rate is `rate / 100 / 12`. A zero
//! rate is repaid straight-line; anything else uses the standard
//! amortized-payment formula. Values are never rounded here; use
//! [`format_currency`] when displaying them.

mod errors;
mod format;


use serde::{Deserialize, Serialize};

pub use errors::AgreementError;
pub use format::{format_currency, parse_amount};

use crate::Id;
use crate::constants::PERIODS_PER_YEAR;

/// Periodic payment for a loan of `principal` over `periods` months at an
/// annual nominal `annual_rate_percent`.
pub fn periodic_payment(
    principal: f64,
    periods: u32,
    annual_rate_percent: f64,
) -> Result<f64, AgreementError> {
    validate_loan(principal, periods, annual_rate_percent)?;
    let n = f64::from(periods);
    let r = annual_rate_percent / 100.0 / f64::from(PERIODS_PER_YEAR);
    if r == 0.0 {
        return Ok(principal / n);
    }
    let growth = (1.0 + r).powf(n);
    Ok(principal * r * growth / (growth - 1.0))
}

/// Payment schedule summary for a loan.
pub fn repayment(
    principal: f64,
    periods: u32,
    annual_rate_percent: f64,
) -> Result<Repayment, AgreementError> {
    let payment = periodic_payment(principal, periods, annual_rate_percent)?;
    let total = payment * f64::from(periods);
    Ok(Repayment {
        periodic_payment: payment,
        total_repayment: total,
        total_interest: total - principal,
    })
}

fn validate_loan(principal: f64, periods: u32, rate: f64) -> Result<(), AgreementError> {
    if !principal.is_finite() || principal <= 0.0 {
        return Err(AgreementError::InvalidPrincipal { value: principal });
    }
    if periods == 0 {
        return Err(AgreementError::InvalidTerm);
    }
    if !rate.is_finite() || rate < 0.0 {
        return Err(AgreementError::InvalidRate { value: rate });
    }
    Ok(())
}

/// Unrounded repayment figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Repayment {
    pub periodic_payment: f64,
    pub total_repayment: f64,
    pub total_interest: f64,
}

/// Proposed investment terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgreementTerms {
    pub principal: f64,
    pub term_months: u32,
    /// Annual nominal rate, in percent.
    pub rate_percent: f64,
    /// Equity requested, 0 to 100.
    pub equity_percent: f64,
}

impl AgreementTerms {
    /// Validated terms.
    pub fn new(
        principal: f64,
        term_months: u32,
        rate_percent: f64,
        equity_percent: f64,
    ) -> Result<Self, AgreementError> {
        validate_loan(principal, term_months, rate_percent)?;
        if !equity_percent.is_finite() || !(0.0..=100.0).contains(&equity_percent) {
            return Err(AgreementError::InvalidEquity {
                value: equity_percent,
            });
        }
        Ok(Self {
            principal,
            term_months,
            rate_percent,
            equity_percent,
        })
    }

    /// Rate applied each month, as a fraction.
    pub fn periodic_rate(&self) -> f64 {
        self.rate_percent / 100.0 / f64::from(PERIODS_PER_YEAR)
    }

    pub fn repayment(&self) -> Result<Repayment, AgreementError> {
        repayment(self.principal, self.term_months, self.rate_percent)
    }
}

/// Investment periods offered by the agreement form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TermOption {
    ThreeMonths,
    #[default]
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
}

impl TermOption {
    pub const ALL: [TermOption; 5] = [
        TermOption::ThreeMonths,
        TermOption::SixMonths,
        TermOption::OneYear,
        TermOption::TwoYears,
        TermOption::FiveYears,
    ];

    pub fn months(&self) -> u32 {
        match self {
            TermOption::ThreeMonths => 3,
            TermOption::SixMonths => 6,
            TermOption::OneYear => 12,
            TermOption::TwoYears => 24,
            TermOption::FiveYears => 60,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TermOption::ThreeMonths => "3 months",
            TermOption::SixMonths => "6 months",
            TermOption::OneYear => "1 year",
            TermOption::TwoYears => "2 years",
            TermOption::FiveYears => "5 years",
        }
    }

    /// Look up an option by its label.
    pub fn from_label(label: &str) -> Result<Self, AgreementError> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(label))
            .ok_or_else(|| AgreementError::UnknownTerm {
                label: label.to_string(),
            })
    }
}

/// Annual interest rates offered by the agreement form, in percent.
pub const RATE_OPTIONS: [f64; 5] = [0.0, 2.0, 5.0, 7.0, 10.0];

/// Rate preselected in the agreement form.
pub const DEFAULT_RATE_PERCENT: f64 = 5.0;

/// Equity preselected in the agreement form, in percent.
pub const DEFAULT_EQUITY_PERCENT: f64 = 10.0;

/// Where a previously proposed agreement stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgreementStatus {
    Pending,
    Signed,
}

/// Terms already proposed to a startup. They pre-fill the agreement form
/// the next time it is opened for that startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SavedAgreement {
    pub startup_id: Id,
    pub amount: u64,
    pub term: TermOption,
    pub rate_percent: f64,
    pub equity_percent: f64,
    pub status: AgreementStatus,
}

impl SavedAgreement {
    /// The saved values as validated terms.
    pub fn terms(&self) -> Result<AgreementTerms, AgreementError> {
        AgreementTerms::new(
            self.amount as f64,
            self.term.months(),
            self.rate_percent,
            self.equity_percent,
        )
    }
}

/// Parse a rate label such as "5%" or "7".
pub fn parse_rate(label: &str) -> Result<f64, AgreementError> {
    let trimmed = label.trim().trim_end_matches('%').trim();
    match trimmed.parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate >= 0.0 => Ok(rate),
        _ => Err(AgreementError::InvalidRateInput {
            input: label.to_string(),
        }),
    }
}
