//! Intent resolution for chat messages.
//!
//! Maps message text plus a bot personality to an `(intent, reply)` pair.
//!
//! Two tiers:
//! - **Rule-based** (local): keyword substring matching, always available.
//! - **NLU server** (remote): Rasa-compatible HTTP API, used when reachable.
//!
//! `DelegatingResolver` combines them and never fails.

pub mod delegating;
pub mod nlu;
pub mod replies;
pub mod rules;

use async_trait::async_trait;
use cb_protocol::Intent;

/// Result of resolving one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub intent: Intent,
    pub reply: String,
}

/// Trait for resolvers that classify a message and pick a reply.
#[async_trait]
pub trait IntentResolver: Send + Sync {
    /// Resolve a message for a bot with the given personality label.
    /// Always returns a usable resolution.
    async fn resolve(&self, message: &str, personality: &str) -> Resolution;

    /// Name of this resolver tier (for logging/audit).
    fn tier_name(&self) -> &str;
}

pub use delegating::DelegatingResolver;
pub use nlu::{NluBackend, NluClient, NluConfig, NluError, NluParse};
pub use rules::RuleBasedMatcher;
