use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Speaker;
use crate::error::AnalysisError;

/// Three-way sentiment taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Contribution of this label to the conversation score
    pub fn weight(&self) -> i64 {
        match self {
            SentimentLabel::Positive => 1,
            SentimentLabel::Neutral => 0,
            SentimentLabel::Negative => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = AnalysisError;

    /// Case-insensitive; also accepts the `LABEL_n` ids emitted by
    /// three-class roberta sentiment models.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" | "label_2" => Ok(SentimentLabel::Positive),
            "neutral" | "label_1" => Ok(SentimentLabel::Neutral),
            "negative" | "label_0" => Ok(SentimentLabel::Negative),
            _ => Err(AnalysisError::UnknownLabel(s.to_string())),
        }
    }
}

/// Raw prediction returned by a classifier before label normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOutput {
    pub label: String,
    pub score: f64,
}

impl ClassifierOutput {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Sentiment of one classified utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerSentimentRecord {
    pub statement: String,
    pub sentiment: SentimentLabel,
    /// Classifier confidence for the chosen label
    pub score: f64,
}

/// An utterance that was dropped from aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationFailure {
    /// Position of the utterance in the conversation
    pub index: usize,
    pub speaker: Speaker,
    pub reason: String,
}

/// Per-speaker label sequences in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentLists {
    pub agent: Vec<SentimentLabel>,
    pub customer: Vec<SentimentLabel>,
}

/// Weighted verdict over every classified statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSentimentResult {
    pub total_score: i64,
    pub total_statements: usize,
    pub normalized_score: f64,
    pub overall_sentiment: SentimentLabel,
}
