//! Runtime settings.
//!
//! Every simulated delay and the reply behaviour are configurable so that
//! the same flows can run instantly in tests and at human pace
//! interactively. Settings are plain serde data; missing fields take their
//! defaults and the result is validated before use.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    AGREEMENT_ACK_DELAY_MS, AGREEMENT_REDIRECT_DELAY_MS, DEFAULT_AMOUNT, ECHO_PREVIEW_CHARS,
    PAYMENT_DWELL_MS, PAYMENT_PROCESSING_DELAY_MS, REPLY_DELAY_MS,
};
use crate::conversation::{CannedReplies, EchoReplies, ReplyStrategy};

/// Errors raised while loading settings.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("Failed to read settings from {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The settings are not valid JSON or have the wrong shape.
    #[error("Malformed settings")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },

    /// A setting holds a value outside its allowed range.
    #[error("Invalid setting {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    /// Check if this error is a rejected setting value.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, ConfigError::Invalid { .. })
    }
}

impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Config(err)
    }
}

/// How the simulated counterparty answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyMode {
    /// A random pick from a fixed set of replies.
    #[default]
    Canned,
    /// An acknowledgement quoting the start of the user's message.
    Echo,
}

/// Tunable behaviour of the marketplace flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Delay before a simulated reply arrives.
    pub reply_delay_ms: u64,
    pub reply_mode: ReplyMode,
    /// Seed for canned replies; unset picks from entropy.
    pub reply_seed: Option<u64>,
    /// Characters of the user's message quoted by echo replies.
    pub echo_preview_chars: usize,
    /// Delay before a submitted agreement is acknowledged.
    pub agreement_ack_delay_ms: u64,
    /// Delay between the acknowledgement and moving on to payment.
    pub agreement_redirect_delay_ms: u64,
    /// Simulated payment processing time.
    pub payment_processing_delay_ms: u64,
    /// How long the payment confirmation stays up before returning home.
    pub payment_dwell_ms: u64,
    /// Amount used when the payment step is reached without one.
    pub default_amount: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reply_delay_ms: REPLY_DELAY_MS,
            reply_mode: ReplyMode::default(),
            reply_seed: None,
            echo_preview_chars: ECHO_PREVIEW_CHARS,
            agreement_ack_delay_ms: AGREEMENT_ACK_DELAY_MS,
            agreement_redirect_delay_ms: AGREEMENT_REDIRECT_DELAY_MS,
            payment_processing_delay_ms: PAYMENT_PROCESSING_DELAY_MS,
            payment_dwell_ms: PAYMENT_DWELL_MS,
            default_amount: DEFAULT_AMOUNT,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|source| ConfigError::Malformed { source })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), "Settings loaded");
        Ok(settings)
    }

    /// Settings with every delay set to zero, for scripted runs.
    pub fn instant() -> Self {
        Self {
            reply_delay_ms: 0,
            agreement_ack_delay_ms: 0,
            agreement_redirect_delay_ms: 0,
            payment_processing_delay_ms: 0,
            payment_dwell_ms: 0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_amount == 0 {
            return Err(ConfigError::Invalid {
                field: "default_amount",
                reason: "must be positive".to_string(),
            });
        }
        if self.reply_mode == ReplyMode::Echo && self.echo_preview_chars == 0 {
            return Err(ConfigError::Invalid {
                field: "echo_preview_chars",
                reason: "must be positive in echo mode".to_string(),
            });
        }
        Ok(())
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    pub fn agreement_ack_delay(&self) -> Duration {
        Duration::from_millis(self.agreement_ack_delay_ms)
    }

    pub fn agreement_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.agreement_redirect_delay_ms)
    }

    pub fn payment_processing_delay(&self) -> Duration {
        Duration::from_millis(self.payment_processing_delay_ms)
    }

    pub fn payment_dwell(&self) -> Duration {
        Duration::from_millis(self.payment_dwell_ms)
    }

    /// The reply strategy these settings describe.
    pub fn reply_strategy(&self) -> Arc<dyn ReplyStrategy> {
        match (self.reply_mode, self.reply_seed) {
            (ReplyMode::Echo, _) => Arc::new(EchoReplies::with_preview(self.echo_preview_chars)),
            (ReplyMode::Canned, Some(seed)) => Arc::new(CannedReplies::seeded(seed)),
            (ReplyMode::Canned, None) => Arc::new(CannedReplies::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let settings = Settings::default();
        assert_eq!(settings.reply_delay(), Duration::from_millis(1500));
        assert_eq!(settings.payment_processing_delay(), Duration::from_millis(2000));
        assert_eq!(settings.payment_dwell(), Duration::from_millis(3000));
        assert_eq!(settings.default_amount, 100_000);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"reply_mode": "echo", "reply_delay_ms": 10}"#)
            .unwrap();
        assert_eq!(settings.reply_mode, ReplyMode::Echo);
        assert_eq!(settings.reply_delay_ms, 10);
        assert_eq!(settings.agreement_ack_delay_ms, AGREEMENT_ACK_DELAY_MS);
        assert!(settings.reply_strategy().reply("hi").contains("\"hi\""));
    }

    #[test]
    fn rejects_bad_settings() {
        let err = Settings::from_json(r#"{"reply_delay": 10}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));

        let err = Settings::from_json(r#"{"default_amount": 0}"#).unwrap_err();
        assert!(err.is_validation_error());
        let err: crate::Error = err.into();
        assert!(err.is_validation_error());
        assert_eq!(err.module(), "config");
    }

    #[test]
    fn seeded_canned_replies_repeat() {
        let settings = Settings {
            reply_seed: Some(42),
            ..Settings::default()
        };
        let a = settings.reply_strategy();
        let b = settings.reply_strategy();
        assert_eq!(a.reply("x"), b.reply("x"));
    }
}
