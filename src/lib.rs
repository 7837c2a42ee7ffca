pub mod classifier;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod stages;

pub use classifier::{ClassifierConfig, InferenceClient, SentimentClassifier};
pub use error::AnalysisError;
pub use io::{AnalysisReport, HumanReport, decode_transcript, read_transcript_file};
pub use models::{
    ClassifierOutput, Conversation, OverallSentimentResult, SentimentLabel, SentimentLists,
    Speaker, SpeakerSentimentRecord, Utterance,
};
pub use pipeline::{AnalysisConfig, analyze_transcript};
pub use server::{AppState, ServerConfig};
pub use stages::{
    ClassificationOutcome, classify_all, compute_overall, compute_overall_from_labels,
    extract_sentiment_lists, segment,
};
