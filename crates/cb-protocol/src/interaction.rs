use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intent::Intent;

/// One logged exchange between a user and a bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: Uuid,
    pub bot_id: Uuid,
    pub user_message: String,
    pub bot_response: String,
    pub intent: Intent,
    pub timestamp: DateTime<Utc>,
}

impl InteractionRecord {
    pub fn new(bot_id: Uuid, user_message: &str, bot_response: &str, intent: Intent) -> Self {
        Self {
            id: Uuid::now_v7(),
            bot_id,
            user_message: user_message.to_string(),
            bot_response: bot_response.to_string(),
            intent,
            timestamp: Utc::now(),
        }
    }
}

/// Training/export row derived from an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub message: String,
    pub response: String,
    pub intent: Intent,
}

impl From<&InteractionRecord> for DatasetEntry {
    fn from(record: &InteractionRecord) -> Self {
        Self {
            message: record.user_message.clone(),
            response: record.bot_response.clone(),
            intent: record.intent.clone(),
        }
    }
}

/// Per-bot interaction analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentAnalytics {
    pub bot_id: Uuid,
    pub total_interactions: u64,
    /// Most frequent intent; ties go to the lexically smallest label.
    pub top_intent: Option<String>,
    pub intent_counts: BTreeMap<String, u64>,
}

impl IntentAnalytics {
    /// Build analytics from a stream of intent labels.
    pub fn from_intents<'a, I>(bot_id: Uuid, intents: I) -> Self
    where
        I: IntoIterator<Item = &'a Intent>,
    {
        let mut intent_counts: BTreeMap<String, u64> = BTreeMap::new();
        let mut total_interactions = 0;
        for intent in intents {
            *intent_counts.entry(intent.to_string()).or_default() += 1;
            total_interactions += 1;
        }
        Self::from_counts(bot_id, total_interactions, intent_counts)
    }

    /// Build analytics from pre-aggregated counts (e.g., a GROUP BY query).
    pub fn from_counts(
        bot_id: Uuid,
        total_interactions: u64,
        intent_counts: BTreeMap<String, u64>,
    ) -> Self {
        // BTreeMap iterates in label order, so keeping the first maximum
        // yields the lexically smallest label on ties.
        let mut top: Option<(&String, u64)> = None;
        for (label, &count) in &intent_counts {
            if top.is_none_or(|(_, best)| count > best) {
                top = Some((label, count));
            }
        }
        let top_intent = top.map(|(label, _)| label.clone());

        Self {
            bot_id,
            total_interactions,
            top_intent,
            intent_counts,
        }
    }
}
