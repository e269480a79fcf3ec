use serde::{Deserialize, Serialize};

/// Classified purpose of a user message.
///
/// The known labels are closed variants; anything else an external NLU
/// server returns is carried verbatim in `Other` so it can still be logged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Intent {
    Greet,
    Goodbye,
    Info,
    Purchase,
    Health,
    Unknown,
    Other(String),
}

impl Intent {
    /// Map a raw label to an intent. Empty labels become `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "greet" => Self::Greet,
            "goodbye" => Self::Goodbye,
            "info" => Self::Info,
            "purchase" => Self::Purchase,
            "health" => Self::Health,
            "unknown" | "" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Greet => "greet",
            Self::Goodbye => "goodbye",
            Self::Info => "info",
            Self::Purchase => "purchase",
            Self::Health => "health",
            Self::Unknown => "unknown",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for Intent {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<Intent> for String {
    fn from(intent: Intent) -> Self {
        intent.as_str().to_string()
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named tone profile selecting among canned reply variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    #[default]
    Friendly,
    Professional,
    Casual,
    Formal,
    Humorous,
    Empathetic,
}

impl Personality {
    /// Every personality, in display order.
    pub const ALL: [Personality; 6] = [
        Self::Friendly,
        Self::Professional,
        Self::Casual,
        Self::Formal,
        Self::Humorous,
        Self::Empathetic,
    ];

    /// Resolve a stored label. Unrecognized labels fall back to `Friendly`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "professional" => Self::Professional,
            "casual" => Self::Casual,
            "formal" => Self::Formal,
            "humorous" => Self::Humorous,
            "empathetic" => Self::Empathetic,
            _ => Self::Friendly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Friendly => "friendly",
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Formal => "formal",
            Self::Humorous => "humorous",
            Self::Empathetic => "empathetic",
        }
    }
}

impl std::fmt::Display for Personality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
