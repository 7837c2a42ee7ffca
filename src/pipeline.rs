use tracing::{debug, info};

use crate::classifier::SentimentClassifier;
use crate::error::AnalysisError;
use crate::io::{AnalysisReport, ReportMetadata};
use crate::stages::{classify_all, compute_overall, extract_sentiment_lists, segment};

/// Configuration for a single transcript analysis
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Maximum classifier calls in flight for one transcript
    pub concurrency: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

/// Segment, classify and aggregate one transcript.
///
/// Per-utterance classification failures are reported inside the returned
/// report; only problems with the document itself are errors.
pub async fn analyze_transcript(
    classifier: &dyn SentimentClassifier,
    transcript: &str,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    // Whitespace-only text is not empty; it fails segmentation instead
    if transcript.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    debug!("[{}] Received transcript ({} bytes)", request_id, transcript.len());

    let conversation = segment(transcript);
    if conversation.is_empty() {
        info!("[{}] No speaker tags found", request_id);
        return Err(AnalysisError::ParseFailure);
    }

    info!(
        "[{}] Parsed {} utterances, classifying with concurrency {}",
        request_id,
        conversation.len(),
        config.concurrency
    );

    let outcome = classify_all(classifier, &conversation, config.concurrency).await;

    let sentiment_lists =
        extract_sentiment_lists(&outcome.agent_records, &outcome.customer_records);
    let overall_sentiment = compute_overall(&sentiment_lists.agent, &sentiment_lists.customer);

    info!(
        "[{}] Overall sentiment: {} (normalized {:.3} over {} statements)",
        request_id,
        overall_sentiment.overall_sentiment,
        overall_sentiment.normalized_score,
        overall_sentiment.total_statements
    );

    let metadata = ReportMetadata {
        request_id,
        analyzed_at: chrono::Utc::now().to_rfc3339(),
        total_utterances: conversation.len(),
        classified_utterances: outcome.classified_count(),
        failed_utterances: outcome.failures.len(),
    };

    Ok(AnalysisReport {
        overall_sentiment,
        sales_agent_sentiments: outcome.agent_records,
        customer_sentiments: outcome.customer_records,
        sentiment_lists,
        failures: outcome.failures,
        metadata,
    })
}
