use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intent::Personality;

/// Starter templates offered when creating a bot.
pub const TEMPLATES: [&str; 4] = ["general", "healthcare", "retail", "education"];

/// A named chatbot with a personality and template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bot {
    /// Unique bot ID (UUIDv7 for time-sortability).
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Personality label as entered. Unrecognized labels reply as `friendly`.
    pub personality: String,
    /// Template label (e.g., "retail").
    pub template: String,
    /// Name of the per-bot configuration file.
    pub config_file: String,
    /// When the bot was created.
    pub created_at: DateTime<Utc>,
}

impl Bot {
    /// Create a bot with a freshly generated config file name.
    pub fn new(name: &str, template: &str, personality: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.to_string(),
            personality: personality.to_string(),
            template: template.to_string(),
            config_file: format!("{template}_{}.yml", Uuid::new_v4()),
            created_at: Utc::now(),
        }
    }

    /// Create one of the stock sample bots, e.g. "Retail - Casual Bot".
    pub fn sample(template: &str, personality: Personality) -> Self {
        let name = format!(
            "{} - {} Bot",
            capitalize(template),
            capitalize(personality.as_str())
        );
        Self {
            config_file: format!("{template}_{personality}.yml"),
            ..Self::new(&name, template, personality.as_str())
        }
    }

    /// Personality used for reply selection.
    pub fn personality(&self) -> Personality {
        Personality::from_label(&self.personality)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Dashboard row: a bot with its interaction count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSummary {
    #[serde(flatten)]
    pub bot: Bot,
    pub interaction_count: u64,
}
