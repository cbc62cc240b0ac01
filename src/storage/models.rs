//! Core data models for blogsmith.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A generated blog article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    /// Store-assigned identifier, never reused
    pub id: i64,

    /// Title the article was generated from
    pub title: String,

    /// Normalized article text
    pub content: String,

    /// Tone modifier used for generation (None means neutral)
    pub tone: Option<Tone>,

    /// When the blog was first generated
    pub created_at: DateTime<Utc>,

    /// When the content was last (re)generated
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    /// Display label for the tone, `Neutral` when unset.
    pub fn tone_label(&self) -> &'static str {
        self.tone.unwrap_or(Tone::Neutral).as_str()
    }
}

/// A blog that has been generated but not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub tone: Option<Tone>,
}

/// Stylistic modifier applied to the generation prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    /// No tone instruction.
    #[default]
    Neutral,
    Formal,
    Conversational,
    Technical,
}

impl Tone {
    /// All tones, in the order they are offered to users.
    pub const ALL: [Tone; 4] = [
        Tone::Neutral,
        Tone::Formal,
        Tone::Conversational,
        Tone::Technical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Neutral => "Neutral",
            Tone::Formal => "Formal",
            Tone::Conversational => "Conversational",
            Tone::Technical => "Technical",
        }
    }

    /// Maps the tone to its stored form. Neutral is stored as absent.
    pub fn into_stored(self) -> Option<Tone> {
        match self {
            Tone::Neutral => None,
            other => Some(other),
        }
    }

    /// Parses an optional form value; missing or blank input is neutral.
    pub fn from_input(input: Option<&str>) -> Result<Tone, String> {
        match input.map(str::trim) {
            None | Some("") => Ok(Tone::Neutral),
            Some(value) => value.parse(),
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown tone: '{s}'. Expected one of: Neutral, Formal, Conversational, Technical"
                )
            })
    }
}
