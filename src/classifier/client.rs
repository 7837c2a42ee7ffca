use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::SentimentClassifier;
use crate::models::ClassifierOutput;

const DEFAULT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";
const HF_INFERENCE_BASE: &str = "https://api-inference.huggingface.co/models";

/// Configuration for the remote sentiment inference endpoint
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Full URL the text is POSTed to
    pub api_url: String,
    /// Bearer token (from HF_API_TOKEN env var)
    pub api_token: Option<String>,
    /// Model name, used to build the default URL
    pub model: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Retries per utterance after the first failed attempt
    pub max_retries: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::for_model(DEFAULT_MODEL)
    }
}

impl ClassifierConfig {
    /// Hosted inference endpoint for the given model
    pub fn for_model(model: &str) -> Self {
        Self {
            api_url: format!("{}/{}", HF_INFERENCE_BASE, model),
            api_token: None,
            model: model.to_string(),
            timeout_secs: 30,
            max_retries: 2,
        }
    }

    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let model = std::env::var("SENTIMENT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let mut config = Self::for_model(&model);

        if let Ok(url) = std::env::var("SENTIMENT_API_URL") {
            config.api_url = url;
        }
        config.api_token = std::env::var("HF_API_TOKEN").ok().filter(|t| !t.is_empty());

        if let Ok(timeout) = std::env::var("SENTIMENT_TIMEOUT_SECS") {
            config.timeout_secs = timeout
                .parse()
                .context("SENTIMENT_TIMEOUT_SECS must be a whole number of seconds")?;
        }
        if let Ok(retries) = std::env::var("SENTIMENT_MAX_RETRIES") {
            config.max_retries = retries
                .parse()
                .context("SENTIMENT_MAX_RETRIES must be a non-negative integer")?;
        }

        Ok(config)
    }
}

/// Client for a Hugging Face style text-classification endpoint
pub struct InferenceClient {
    client: Client,
    config: ClassifierConfig,
}

impl InferenceClient {
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    /// Single attempt against the endpoint
    async fn request(&self, text: &str) -> Result<ClassifierOutput> {
        let request = InferenceRequest {
            inputs: text,
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut builder = self.client.post(&self.config.api_url).json(&request);
        if let Some(token) = &self.config.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .context("Failed to send request to inference endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Inference API error: {} - {}", status, body);
        }

        let response: InferenceResponse = response
            .json()
            .await
            .context("Failed to parse inference response")?;

        response
            .best()
            .map(|p| ClassifierOutput::new(p.label, p.score))
            .context("Inference response contained no predictions")
    }
}

#[async_trait]
impl SentimentClassifier for InferenceClient {
    async fn classify(&self, text: &str) -> Result<ClassifierOutput> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                debug!("Classifier retry {} of {}", attempt, self.config.max_retries);
            }

            match self.request(text).await {
                Ok(output) => return Ok(output),
                Err(e) => {
                    warn!("Classifier attempt {} failed: {:#}", attempt + 1, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Unknown classifier error")))
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct Prediction {
    label: String,
    score: f64,
}

/// The endpoint answers `[[...]]` for a single input on some deployments and
/// `[...]` on others
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<Prediction>>),
    Flat(Vec<Prediction>),
}

impl InferenceResponse {
    /// Highest scoring prediction
    fn best(self) -> Option<Prediction> {
        let predictions = match self {
            InferenceResponse::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
            InferenceResponse::Flat(predictions) => predictions,
        };

        predictions
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ClassifierConfig {
        ClassifierConfig {
            api_url: format!("{}/models/sentiment", server.uri()),
            api_token: Some("hf-test-token".to_string()),
            model: "sentiment".to_string(),
            timeout_secs: 5,
            max_retries: 0,
        }
    }

    #[test]
    fn test_default_config() {
        let config = ClassifierConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.api_url.ends_with(DEFAULT_MODEL));
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_best_prediction_nested() {
        let response: InferenceResponse = serde_json::from_str(
            r#"[[{"label":"neutral","score":0.2},{"label":"positive","score":0.7},{"label":"negative","score":0.1}]]"#,
        )
        .unwrap();
        assert_eq!(response.best().unwrap().label, "positive");
    }

    #[test]
    fn test_best_prediction_flat() {
        let response: InferenceResponse =
            serde_json::from_str(r#"[{"label":"NEGATIVE","score":0.9},{"label":"POSITIVE","score":0.1}]"#)
                .unwrap();
        assert_eq!(response.best().unwrap().label, "NEGATIVE");
    }

    #[test]
    fn test_empty_response_has_no_prediction() {
        let response: InferenceResponse = serde_json::from_str("[[]]").unwrap();
        assert!(response.best().is_none());
    }

    #[tokio::test]
    async fn test_classify_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/sentiment"))
            .and(header("authorization", "Bearer hf-test-token"))
            .and(body_partial_json(serde_json::json!({"inputs": "Great service"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([[
                {"label": "positive", "score": 0.93},
                {"label": "neutral", "score": 0.05},
                {"label": "negative", "score": 0.02}
            ]])))
            .mount(&server)
            .await;

        let client = InferenceClient::new(config_for(&server)).unwrap();
        let output = client.classify("Great service").await.unwrap();

        assert_eq!(output.label, "positive");
        assert!((output.score - 0.93).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_classify_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
            .mount(&server)
            .await;

        let client = InferenceClient::new(config_for(&server)).unwrap();
        let err = client.classify("hello").await.unwrap_err();

        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_classify_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = InferenceClient::new(config_for(&server)).unwrap();
        assert!(client.classify("hello").await.is_err());
    }

    #[tokio::test]
    async fn test_classify_retries() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.max_retries = 2;
        let client = InferenceClient::new(config).unwrap();

        assert!(client.classify("hello").await.is_err());
    }
}
