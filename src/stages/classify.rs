use anyhow::Result;
use futures_util::StreamExt;
use futures_util::stream;
use tracing::{debug, info, warn};

use crate::classifier::SentimentClassifier;
use crate::error::AnalysisError;
use crate::models::{
    ClassificationFailure, Conversation, SentimentLabel, Speaker, SpeakerSentimentRecord,
};

/// Records for each speaker plus the utterances that could not be classified
#[derive(Debug, Clone, Default)]
pub struct ClassificationOutcome {
    pub agent_records: Vec<SpeakerSentimentRecord>,
    pub customer_records: Vec<SpeakerSentimentRecord>,
    pub failures: Vec<ClassificationFailure>,
}

impl ClassificationOutcome {
    pub fn classified_count(&self) -> usize {
        self.agent_records.len() + self.customer_records.len()
    }
}

/// Classify every utterance, isolating per-utterance failures.
///
/// Up to `concurrency` classifier calls are in flight at once. Results are
/// matched back to their utterance index so records keep document order.
pub async fn classify_all(
    classifier: &dyn SentimentClassifier,
    conversation: &Conversation,
    concurrency: usize,
) -> ClassificationOutcome {
    // Each call owns its text so the combined future stays Send
    let calls: Vec<_> = conversation
        .iter()
        .enumerate()
        .map(|(index, utterance)| {
            let text = utterance.text.clone();
            async move { (index, classify_one(classifier, &text).await) }
        })
        .collect();

    let mut results: Vec<(usize, Result<(SentimentLabel, f64), AnalysisError>)> =
        stream::iter(calls)
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

    results.sort_by_key(|(index, _)| *index);

    let mut outcome = ClassificationOutcome::default();

    for (index, result) in results {
        let utterance = &conversation.utterances[index];

        match result {
            Ok((sentiment, score)) => {
                debug!("Utterance {} ({}): {}", index, utterance.speaker, sentiment);
                let record = SpeakerSentimentRecord {
                    statement: utterance.text.clone(),
                    sentiment,
                    score,
                };
                match utterance.speaker {
                    Speaker::Agent => outcome.agent_records.push(record),
                    Speaker::Customer => outcome.customer_records.push(record),
                }
            }
            Err(e) => {
                warn!(
                    "Error analyzing sentiment for utterance {}: {}... -> {}",
                    index,
                    preview(&utterance.text, 50),
                    e
                );
                outcome.failures.push(ClassificationFailure {
                    index,
                    speaker: utterance.speaker,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        "Classified {} of {} utterances ({} failed)",
        outcome.classified_count(),
        conversation.len(),
        outcome.failures.len()
    );

    outcome
}

/// Classify one utterance and normalize its label
async fn classify_one(
    classifier: &dyn SentimentClassifier,
    text: &str,
) -> Result<(SentimentLabel, f64), AnalysisError> {
    let output = classifier
        .classify(text)
        .await
        .map_err(|e| AnalysisError::Classification(format!("{:#}", e)))?;

    let label = output.label.parse::<SentimentLabel>()?;
    Ok((label, output.score))
}

/// First `max_chars` characters of a statement, for log lines
fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
