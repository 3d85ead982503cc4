use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A tracked market segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Project Management")]
    ProjectManagement,
    #[serde(rename = "CRM")]
    Crm,
    #[serde(rename = "Cloud Storage")]
    CloudStorage,
    #[serde(rename = "AI Writing")]
    AiWriting,
    #[serde(rename = "Design Tools")]
    DesignTools,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::ProjectManagement,
        Category::Crm,
        Category::CloudStorage,
        Category::AiWriting,
        Category::DesignTools,
    ];

    /// Human-readable label, identical to the serialized form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::ProjectManagement => "Project Management",
            Category::Crm => "CRM",
            Category::CloudStorage => "Cloud Storage",
            Category::AiWriting => "AI Writing",
            Category::DesignTools => "Design Tools",
        }
    }

    /// URL-safe form, e.g. `project-management`.
    #[must_use]
    pub fn slug(self) -> String {
        self.label().to_lowercase().replace(' ', "-")
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    /// Accepts the label in any case (`"crm"`, `"Design Tools"`) or the slug
    /// form (`"design-tools"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], " ");
        Category::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == wanted)
            .ok_or_else(|| CoreError::InvalidCategory(s.to_string()))
    }
}

/// One of the three monitored AI assistants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Assistant {
    #[serde(rename = "ChatGPT")]
    ChatGpt,
    Gemini,
    Perplexity,
}

impl Assistant {
    /// Canonical iteration order used by every per-assistant report.
    pub const ALL: [Assistant; 3] = [Assistant::ChatGpt, Assistant::Gemini, Assistant::Perplexity];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Assistant::ChatGpt => "ChatGPT",
            Assistant::Gemini => "Gemini",
            Assistant::Perplexity => "Perplexity",
        }
    }
}

impl std::fmt::Display for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Assistant {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Assistant::ALL
            .into_iter()
            .find(|a| a.label().to_lowercase() == wanted)
            .ok_or_else(|| CoreError::InvalidAssistant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "Positive"),
            Sentiment::Neutral => write!(f, "Neutral"),
            Sentiment::Negative => write!(f, "Negative"),
        }
    }
}

impl FromStr for Sentiment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            _ => Err(CoreError::InvalidSentiment(s.to_string())),
        }
    }
}

/// One observation of a brand being recommended by an assistant.
///
/// Immutable once recorded; the analytics only ever read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub id: String,
    pub brand: String,
    pub category: Category,
    pub assistant: Assistant,
    /// 1-based position in the assistant's answer; 1 is most prominent.
    pub rank: u32,
    #[serde(default)]
    pub cited_reason: String,
    pub date: NaiveDate,
    pub sentiment: Sentiment,
}
