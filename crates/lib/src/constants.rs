//! Constants used throughout the DealsDive library.
//!
//! Sentinel labels, preset tables and the default delays for the simulated
//! network round-trips live here.

/// Category selector value that matches every category.
pub const ALL_CATEGORIES: &str = "All Industries";

/// Investment range label that matches every amount.
pub const ANY_AMOUNT: &str = "Any Amount";

/// Categories offered by the catalog, in display order.
pub const CATEGORIES: &[&str] = &[
    "Technology",
    "Healthcare",
    "Education",
    "Finance",
    "Sustainability",
    "Food",
    "Energy",
    "Agriculture",
    "Robotics",
];

/// Amount carried into the payment step when none was chosen.
pub const DEFAULT_AMOUNT: u64 = 100_000;

/// Delay before a simulated counterparty reply, in milliseconds.
pub const REPLY_DELAY_MS: u64 = 1500;

/// Delay before an agreement submission is acknowledged.
pub const AGREEMENT_ACK_DELAY_MS: u64 = 1500;

/// Delay between the agreement acknowledgement and the payment redirect.
pub const AGREEMENT_REDIRECT_DELAY_MS: u64 = 1500;

/// Simulated payment processing time.
pub const PAYMENT_PROCESSING_DELAY_MS: u64 = 2000;

/// How long the payment confirmation stays up before returning to the catalog.
pub const PAYMENT_DWELL_MS: u64 = 3000;

/// Characters of the user's text quoted back by the echo reply.
pub const ECHO_PREVIEW_CHARS: usize = 30;

/// Canned counterparty replies.
pub const CANNED_REPLIES: &[&str] = &[
    "That sounds interesting. Can you tell me more about the investment terms?",
    "I appreciate your interest in our startup. We're looking for strategic investors.",
    "We can discuss this further. Do you have experience in our industry?",
    "Let me think about your proposal and get back to you tomorrow.",
    "That's a compelling offer. Would you be open to a meeting next week?",
];

/// Months per year; agreement rates are annual and compound monthly.
pub const PERIODS_PER_YEAR: u32 = 12;
