pub mod client;

pub use client::*;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::ClassifierOutput;

/// Anything that can attach a sentiment prediction to a piece of text.
///
/// Implementations may call a remote inference endpoint or run a local model.
/// Transport failures and malformed responses are both reported as `Err`.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<ClassifierOutput>;
}
