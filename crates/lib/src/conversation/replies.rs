//! Counterparty reply strategies.

use std::fmt::Debug;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{CANNED_REPLIES, ECHO_PREVIEW_CHARS};

/// Chooses the simulated counterparty's answer to a user message.
pub trait ReplyStrategy: Send + Sync + Debug {
    /// Text of the reply to `user_text`.
    fn reply(&self, user_text: &str) -> String;
}

/// Picks uniformly from a fixed pool of canned responses.
#[derive(Debug)]
pub struct CannedReplies {
    pool: Vec<String>,
    rng: Mutex<StdRng>,
}

impl CannedReplies {
    /// Default pool, seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(default_pool(), StdRng::from_entropy())
    }

    /// Default pool with a deterministic seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(default_pool(), StdRng::seed_from_u64(seed))
    }

    /// Custom pool with a deterministic seed. An empty pool falls back to
    /// the default responses.
    pub fn with_pool(pool: Vec<String>, seed: u64) -> Self {
        let pool = if pool.is_empty() { default_pool() } else { pool };
        Self::with_rng(pool, StdRng::seed_from_u64(seed))
    }

    fn with_rng(pool: Vec<String>, rng: StdRng) -> Self {
        Self {
            pool,
            rng: Mutex::new(rng),
        }
    }

    /// The responses this strategy picks from.
    pub fn pool(&self) -> &[String] {
        &self.pool
    }
}

impl Default for CannedReplies {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyStrategy for CannedReplies {
    fn reply(&self, _user_text: &str) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let pick = rng.gen_range(0..self.pool.len());
        self.pool[pick].clone()
    }
}

fn default_pool() -> Vec<String> {
    CANNED_REPLIES.iter().map(|s| s.to_string()).collect()
}

/// Acknowledges the user's message by quoting its beginning.
#[derive(Debug, Clone)]
pub struct EchoReplies {
    preview_chars: usize,
}

impl EchoReplies {
    pub fn new() -> Self {
        Self {
            preview_chars: ECHO_PREVIEW_CHARS,
        }
    }

    /// Quote at most `preview_chars` characters.
    pub fn with_preview(preview_chars: usize) -> Self {
        Self { preview_chars }
    }
}

impl Default for EchoReplies {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyStrategy for EchoReplies {
    fn reply(&self, user_text: &str) -> String {
        let preview: String = user_text.chars().take(self.preview_chars).collect();
        let ellipsis = if user_text.chars().count() > self.preview_chars {
            "..."
        } else {
            ""
        };
        format!(
            "Thank you for your message. I'll get back to you shortly regarding \"{preview}{ellipsis}\""
        )
    }
}
