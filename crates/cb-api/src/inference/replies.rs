//! Canned reply table, indexed by intent and personality.

use cb_protocol::{Intent, Personality};

pub const INFO_REPLY: &str = "This is a demo chatbot powered by AI Chatbot Management System.";
pub const NLU_INFO_REPLY: &str =
    "This is a demo chatbot powered by AI Chatbot Management System with Rasa AI.";
pub const PURCHASE_REPLY: &str = "You can buy products from our store! 🛒";
pub const HEALTH_REPLY: &str = "Please consult a healthcare professional. 🩺";
pub const UNKNOWN_REPLY: &str = "Sorry, I did not understand. 😅";

pub fn greet(personality: Personality) -> &'static str {
    match personality {
        Personality::Friendly => "Hello! How can I help? 😊",
        Personality::Professional => "Hello! How may I assist you today?",
        Personality::Casual => "Hey! What's up? 😎",
        Personality::Formal => "Good day! How may I be of service?",
        Personality::Humorous => "Hello! I'm your friendly AI overlord! 😄",
        Personality::Empathetic => "Hi there! I'm here for you! ❤️",
    }
}

pub fn goodbye(personality: Personality) -> &'static str {
    match personality {
        Personality::Friendly => "Goodbye! Have a great day! 👋",
        Personality::Professional => "Thank you. Goodbye.",
        Personality::Casual => "Catch ya later! ✌️",
        Personality::Formal => "Farewell. Have a pleasant day.",
        Personality::Humorous => "Bye! Don't forget to feed your robot! 🤖",
        Personality::Empathetic => "Take care! I'm always here if you need me! 💕",
    }
}

/// Reply for an intent classified by the local matcher.
pub fn local_reply(intent: &Intent, personality: Personality) -> &'static str {
    match intent {
        Intent::Info => INFO_REPLY,
        other => shared_reply(other, personality),
    }
}

/// Reply for an intent classified by the NLU server.
pub fn nlu_reply(intent: &Intent, personality: Personality) -> &'static str {
    match intent {
        Intent::Info => NLU_INFO_REPLY,
        other => shared_reply(other, personality),
    }
}

fn shared_reply(intent: &Intent, personality: Personality) -> &'static str {
    match intent {
        Intent::Greet => greet(personality),
        Intent::Goodbye => goodbye(personality),
        Intent::Info => INFO_REPLY,
        Intent::Purchase => PURCHASE_REPLY,
        Intent::Health => HEALTH_REPLY,
        Intent::Unknown | Intent::Other(_) => UNKNOWN_REPLY,
    }
}
