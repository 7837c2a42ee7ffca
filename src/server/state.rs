use std::sync::Arc;

use crate::classifier::SentimentClassifier;
use crate::pipeline::AnalysisConfig;

/// Shared application state accessible from all route handlers.
///
/// Only immutable handles live here; each request owns its own conversation
/// and records.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn SentimentClassifier>,
    pub config: Arc<AnalysisConfig>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn SentimentClassifier>, config: AnalysisConfig) -> Self {
        Self {
            classifier,
            config: Arc::new(config),
        }
    }
}
