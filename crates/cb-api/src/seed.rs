//! Stock sample bots with a handful of pre-resolved interactions.

use cb_protocol::{Bot, InteractionRecord, Personality, TEMPLATES};
use sqlx::PgPool;

use crate::inference::RuleBasedMatcher;

/// Messages logged against every sample bot.
pub const SAMPLE_MESSAGES: [&str; 6] = [
    "hello",
    "hi",
    "can you help me?",
    "i want to buy something",
    "i have a health question",
    "bye",
];

/// One bot per (template, personality) pair, each with its sample log.
pub fn sample_bots() -> Vec<(Bot, Vec<InteractionRecord>)> {
    let matcher = RuleBasedMatcher::new();
    let mut out = Vec::with_capacity(TEMPLATES.len() * Personality::ALL.len());

    for template in TEMPLATES {
        for personality in Personality::ALL {
            let bot = Bot::sample(template, personality);
            let logs = SAMPLE_MESSAGES
                .iter()
                .map(|msg| {
                    let res = matcher.match_message(msg, &bot.personality);
                    InteractionRecord::new(bot.id, msg, &res.reply, res.intent)
                })
                .collect();
            out.push((bot, logs));
        }
    }
    out
}

/// Insert the sample bots into the database, skipping ones that exist.
/// Returns the number of bots created.
pub async fn seed_database(pool: &PgPool) -> Result<usize, sqlx::Error> {
    let mut created = 0;
    for (bot, logs) in sample_bots() {
        if crate::db::bots::exists_named(pool, &bot.name, &bot.template, &bot.personality).await? {
            tracing::debug!(name = %bot.name, "skipping existing sample bot");
            continue;
        }
        crate::db::bots::insert(pool, &bot).await?;
        for log in &logs {
            crate::db::interactions::insert(pool, log).await?;
        }
        tracing::info!(name = %bot.name, "sample bot created");
        created += 1;
    }
    Ok(created)
}
