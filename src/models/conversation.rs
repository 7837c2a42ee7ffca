use std::fmt;

use serde::{Deserialize, Serialize};

/// Line prefix that opens a sales agent utterance
pub const AGENT_TAG: &str = "[Sales Agent";
/// Line prefix that opens a customer utterance
pub const CUSTOMER_TAG: &str = "[Customer";

/// One of the two parties on a sales call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Agent,
    Customer,
}

impl Speaker {
    /// Detect the speaker whose tag opens this (already stripped) line.
    ///
    /// This is a literal, case-sensitive prefix test.
    pub fn from_tag_line(line: &str) -> Option<Self> {
        if line.starts_with(AGENT_TAG) {
            Some(Speaker::Agent)
        } else if line.starts_with(CUSTOMER_TAG) {
            Some(Speaker::Customer)
        } else {
            None
        }
    }

    /// Human-facing name as it appears in transcripts
    pub fn display_name(&self) -> &'static str {
        match self {
            Speaker::Agent => "Sales Agent",
            Speaker::Customer => "Customer",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A contiguous block of speech attributed to a single speaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: Speaker,
    pub text: String,
}

impl Utterance {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

/// Utterances in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub utterances: Vec<Utterance>,
}

impl Conversation {
    pub fn new(utterances: Vec<Utterance>) -> Self {
        Self { utterances }
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Utterance> {
        self.utterances.iter()
    }

    /// Number of utterances spoken by the given speaker
    pub fn count_for(&self, speaker: Speaker) -> usize {
        self.utterances
            .iter()
            .filter(|u| u.speaker == speaker)
            .count()
    }
}
