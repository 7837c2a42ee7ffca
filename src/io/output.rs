use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{
    ClassificationFailure, OverallSentimentResult, SentimentLists, SpeakerSentimentRecord,
};

/// Machine-readable result of analyzing one transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Weighted verdict over all classified statements
    pub overall_sentiment: OverallSentimentResult,
    /// Classified sales agent statements
    pub sales_agent_sentiments: Vec<SpeakerSentimentRecord>,
    /// Classified customer statements
    pub customer_sentiments: Vec<SpeakerSentimentRecord>,
    /// Label sequences per speaker
    pub sentiment_lists: SentimentLists,
    /// Utterances dropped because classification failed
    pub failures: Vec<ClassificationFailure>,
    /// Metadata about the processing
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub request_id: String,
    pub analyzed_at: String,
    pub total_utterances: usize,
    pub classified_utterances: usize,
    pub failed_utterances: usize,
}

impl AnalysisReport {
    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }
}

/// Human-readable sentiment report
pub struct HumanReport<'a> {
    report: &'a AnalysisReport,
}

impl<'a> HumanReport<'a> {
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self { report }
    }

    /// Format the report as human-readable text
    pub fn format(&self) -> String {
        let overall = &self.report.overall_sentiment;
        let mut output = String::new();

        output.push_str(&format!(
            "Overall sentiment: {} (score {}, normalized {:.3}, {} statements)\n\n",
            overall.overall_sentiment,
            overall.total_score,
            overall.normalized_score,
            overall.total_statements
        ));

        for (title, records) in [
            ("Sales Agent", &self.report.sales_agent_sentiments),
            ("Customer", &self.report.customer_sentiments),
        ] {
            output.push_str(&format!("{} ({} statements)\n", title, records.len()));
            output.push_str(&"-".repeat(title.len()));
            output.push('\n');

            for record in records.iter() {
                output.push_str(&format!("[{}]\n", record.sentiment));
                output.push_str(&wrap_text(&record.statement, 80));
                output.push_str("\n\n");
            }
        }

        if !self.report.failures.is_empty() {
            output.push_str(&format!(
                "{} statements could not be classified\n",
                self.report.failures.len()
            ));
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Wrap a statement into lines of at most `width` characters. Width counts
/// chars, not bytes; a single word longer than `width` keeps its own line.
fn wrap_text(statement: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for word in statement.split_whitespace() {
        let word_chars = word.chars().count();
        if current_chars > 0 && current_chars + 1 + word_chars > width {
            lines.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        if current_chars > 0 {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(word);
        current_chars += word_chars;
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentLabel;

    fn sample_report() -> AnalysisReport {
        let record = |statement: &str, sentiment| SpeakerSentimentRecord {
            statement: statement.to_string(),
            sentiment,
            score: 0.9,
        };

        AnalysisReport {
            overall_sentiment: OverallSentimentResult {
                total_score: 1,
                total_statements: 1,
                normalized_score: 1.0,
                overall_sentiment: SentimentLabel::Positive,
            },
            sales_agent_sentiments: vec![record("Happy to help", SentimentLabel::Positive)],
            customer_sentiments: vec![],
            sentiment_lists: SentimentLists {
                agent: vec![SentimentLabel::Positive],
                customer: vec![],
            },
            failures: vec![],
            metadata: ReportMetadata {
                request_id: "req".to_string(),
                analyzed_at: "2024-02-20T14:45:45Z".to_string(),
                total_utterances: 1,
                classified_utterances: 1,
                failed_utterances: 0,
            },
        }
    }

    #[test]
    fn test_wrap_statement_at_width() {
        let wrapped = wrap_text("I can look into the refund for you right now", 20);
        assert_eq!(wrapped, "I can look into the\nrefund for you right\nnow");
    }

    #[test]
    fn test_wrap_counts_chars_not_bytes() {
        // 19 chars but 23 bytes
        let wrapped = wrap_text("déjà vu, très ça va", 19);
        assert_eq!(wrapped, "déjà vu, très ça va");

        let wrapped = wrap_text("Größe über Straße", 11);
        assert_eq!(wrapped, "Größe über\nStraße");
    }

    #[test]
    fn test_wrap_keeps_long_word_whole() {
        let wrapped = wrap_text("see https://example.com/orders/12345 now", 10);
        assert_eq!(wrapped, "see\nhttps://example.com/orders/12345\nnow");
    }

    #[test]
    fn test_human_format() {
        let report = sample_report();
        let text = HumanReport::new(&report).format();

        assert!(text.starts_with("Overall sentiment: positive"));
        assert!(text.contains("Sales Agent (1 statements)"));
        assert!(text.contains("[positive]\nHappy to help"));
        assert!(!text.contains("could not be classified"));
    }

    #[test]
    fn test_report_json_shape() {
        let json = serde_json::to_value(sample_report()).unwrap();

        assert_eq!(json["overall_sentiment"]["overall_sentiment"], "positive");
        assert_eq!(json["sentiment_lists"]["agent"][0], "positive");
        assert_eq!(json["sales_agent_sentiments"][0]["statement"], "Happy to help");
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        sample_report().write_json(&path).unwrap();

        let written: AnalysisReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.metadata.request_id, "req");
    }
}
