//! Rule-based intent matcher: keyword substring rules.
//!
//! Deterministic and always available. Used directly when
//! no NLU server is configured and as the fallback when one is unreachable.

use async_trait::async_trait;
use cb_protocol::{Intent, Personality};

use super::{IntentResolver, Resolution, replies};

/// Keyword-matching resolver.
pub struct RuleBasedMatcher;

impl RuleBasedMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Classify a message and pick the personality-specific reply.
    pub fn match_message(&self, message: &str, personality: &str) -> Resolution {
        let intent = classify(message);
        let reply = replies::local_reply(&intent, Personality::from_label(personality));
        Resolution {
            intent,
            reply: reply.to_string(),
        }
    }
}

impl Default for RuleBasedMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentResolver for RuleBasedMatcher {
    async fn resolve(&self, message: &str, personality: &str) -> Resolution {
        self.match_message(message, personality)
    }

    fn tier_name(&self) -> &str {
        "local"
    }
}

/// Core keyword matching. Case-insensitive, substring based, first match wins.
fn classify(message: &str) -> Intent {
    let lower = message.to_lowercase();

    if matches_any(&lower, &["hello", "hi", "hey"]) {
        Intent::Greet
    } else if matches_any(&lower, &["bye"]) {
        Intent::Goodbye
    } else if matches_any(&lower, &["info", "help"]) {
        Intent::Info
    } else if matches_any(&lower, &["buy", "purchase"]) {
        Intent::Purchase
    } else if matches_any(&lower, &["doctor", "health"]) {
        Intent::Health
    } else {
        Intent::Unknown
    }
}

/// Check if text contains any of the given patterns.
fn matches_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| text.contains(p))
}
