//! Marketing personas and content framings.

use serde::{Deserialize, Serialize};

const BASE_INSTRUCTION: &str = "You are a world-class marketing expert.";

/// Tone preset injected as the system instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Gemini,
    Gpt,
    Grok,
}

impl Persona {
    #[must_use]
    pub fn tone(self) -> &'static str {
        match self {
            Self::Gemini => "Adopt a balanced, innovative, and helpful tone characteristic of Gemini.",
            Self::Gpt => "Adopt a highly professional, expansive, and corporate-friendly tone, similar to GPT-4.",
            Self::Grok => "Adopt a witty, rebellious, and slightly edgy tone, similar to Grok.",
        }
    }

    #[must_use]
    pub fn system_instruction(self) -> String {
        format!("{BASE_INSTRUCTION} {}", self.tone())
    }
}

/// Task framing for free-form marketing copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Slogan,
    MissionStatement,
}

impl ContentKind {
    #[must_use]
    pub fn framing(self) -> &'static str {
        match self {
            Self::Slogan => {
                "Generate 5 catchy, unique slogans for the following business or product. Format as a bulleted list."
            }
            Self::MissionStatement => {
                "Write a powerful and inspiring Mission Statement for the following business. \
                 Focus on value, vision, and reliability."
            }
        }
    }

    /// Full user prompt for `topic`.
    #[must_use]
    pub fn prompt(self, topic: &str) -> String {
        format!("{}\n\nTopic: {}", self.framing(), topic.trim())
    }
}
