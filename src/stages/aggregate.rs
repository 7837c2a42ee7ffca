use crate::error::AnalysisError;
use crate::models::{
    OverallSentimentResult, SentimentLabel, SentimentLists, SpeakerSentimentRecord,
};

/// Label sequences for each speaker, in document order
pub fn extract_sentiment_lists(
    agent_records: &[SpeakerSentimentRecord],
    customer_records: &[SpeakerSentimentRecord],
) -> SentimentLists {
    SentimentLists {
        agent: agent_records.iter().map(|r| r.sentiment).collect(),
        customer: customer_records.iter().map(|r| r.sentiment).collect(),
    }
}

/// Weighted overall sentiment of a conversation.
///
/// positive = +1, neutral = 0, negative = -1, summed over both speakers and
/// divided by the number of statements. A normalized score of exactly zero,
/// including the no-statement case, is neutral.
pub fn compute_overall(
    agent_labels: &[SentimentLabel],
    customer_labels: &[SentimentLabel],
) -> OverallSentimentResult {
    let agent_score: i64 = agent_labels.iter().map(SentimentLabel::weight).sum();
    let customer_score: i64 = customer_labels.iter().map(SentimentLabel::weight).sum();

    let total_score = agent_score + customer_score;
    let total_statements = agent_labels.len() + customer_labels.len();

    let normalized_score = if total_statements > 0 {
        total_score as f64 / total_statements as f64
    } else {
        0.0
    };

    let overall_sentiment = if normalized_score > 0.0 {
        SentimentLabel::Positive
    } else if normalized_score < 0.0 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    OverallSentimentResult {
        total_score,
        total_statements,
        normalized_score,
        overall_sentiment,
    }
}

/// [`compute_overall`] over raw label strings
pub fn compute_overall_from_labels<S: AsRef<str>>(
    agent_labels: &[S],
    customer_labels: &[S],
) -> Result<OverallSentimentResult, AnalysisError> {
    let agent = parse_labels(agent_labels)?;
    let customer = parse_labels(customer_labels)?;
    Ok(compute_overall(&agent, &customer))
}

fn parse_labels<S: AsRef<str>>(labels: &[S]) -> Result<Vec<SentimentLabel>, AnalysisError> {
    labels.iter().map(|l| l.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentLabel::{Negative, Neutral, Positive};

    #[test]
    fn test_empty_is_neutral() {
        let result = compute_overall(&[], &[]);
        assert_eq!(result.total_score, 0);
        assert_eq!(result.total_statements, 0);
        assert_eq!(result.normalized_score, 0.0);
        assert_eq!(result.overall_sentiment, Neutral);
    }

    #[test]
    fn test_mostly_positive() {
        let result = compute_overall(&[Positive, Positive], &[Negative]);
        assert_eq!(result.total_score, 1);
        assert_eq!(result.total_statements, 3);
        assert!((result.normalized_score - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(result.overall_sentiment, Positive);
    }

    #[test]
    fn test_all_negative() {
        let result = compute_overall(&[Negative], &[Negative]);
        assert_eq!(result.total_score, -2);
        assert_eq!(result.normalized_score, -1.0);
        assert_eq!(result.overall_sentiment, Negative);
    }

    #[test]
    fn test_balanced_is_neutral() {
        let result = compute_overall(&[Positive, Neutral], &[Negative]);
        assert_eq!(result.total_score, 0);
        assert_eq!(result.total_statements, 3);
        assert_eq!(result.overall_sentiment, Neutral);
    }

    #[test]
    fn test_order_independent() {
        let a = compute_overall(&[Positive, Negative, Neutral], &[Negative]);
        let b = compute_overall(&[Negative], &[Neutral, Negative, Positive]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_labels() {
        let result =
            compute_overall_from_labels(&["POSITIVE", "positive"], &["Negative"]).unwrap();
        assert_eq!(result.total_score, 1);
        assert_eq!(result.overall_sentiment, Positive);
    }

    #[test]
    fn test_from_labels_unknown() {
        let err = compute_overall_from_labels(&["positive"], &["angry"]).unwrap_err();
        assert_eq!(err, AnalysisError::UnknownLabel("angry".to_string()));
    }

    #[test]
    fn test_extract_sentiment_lists() {
        let record = |sentiment| SpeakerSentimentRecord {
            statement: "x".to_string(),
            sentiment,
            score: 0.9,
        };
        let lists = extract_sentiment_lists(
            &[record(Positive), record(Neutral)],
            &[record(Negative)],
        );

        assert_eq!(lists.agent, vec![Positive, Neutral]);
        assert_eq!(lists.customer, vec![Negative]);
        assert_eq!(compute_overall(&lists.agent, &lists.customer).total_score, 0);
    }
}
