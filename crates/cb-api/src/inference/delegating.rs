//! Delegating resolver: NLU server first, local rules as fallback.
//!
//! Probes the NLU server before each message. If it is down, or the parse
//! call fails for any reason, the rule-based matcher answers instead. The
//! parse failure path is a second guard: the server can go away between
//! the probe and the parse.

use async_trait::async_trait;
use cb_protocol::{Intent, Personality};

use super::{IntentResolver, NluBackend, Resolution, RuleBasedMatcher, replies};

/// Composite resolver that prefers the NLU server and never fails.
pub struct DelegatingResolver {
    local: RuleBasedMatcher,
    remote: Box<dyn NluBackend>,
}

impl DelegatingResolver {
    pub fn new(local: RuleBasedMatcher, remote: Box<dyn NluBackend>) -> Self {
        Self { local, remote }
    }
}

#[async_trait]
impl IntentResolver for DelegatingResolver {
    async fn resolve(&self, message: &str, personality: &str) -> Resolution {
        if !self.remote.is_running().await {
            tracing::debug!("nlu server not running, using local matcher");
            return self.local.match_message(message, personality);
        }

        match self.remote.parse(message).await {
            Ok(parsed) => {
                tracing::debug!(
                    intent = %parsed.intent,
                    confidence = parsed.confidence,
                    "nlu server classified message"
                );
                let intent = Intent::from_label(&parsed.intent);
                let reply = replies::nlu_reply(&intent, Personality::from_label(personality));
                Resolution {
                    intent,
                    reply: reply.to_string(),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "nlu server failed, falling back to local matcher");
                self.local.match_message(message, personality)
            }
        }
    }

    fn tier_name(&self) -> &str {
        "delegating"
    }
}
