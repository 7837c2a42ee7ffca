use thiserror::Error;

/// Errors raised while turning an uploaded transcript into a sentiment report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// No document was supplied at all
    #[error("No file uploaded")]
    NoInput,

    /// The document was supplied but has no content
    #[error("Empty file")]
    EmptyInput,

    /// The document bytes are not valid UTF-8
    #[error("Transcript is not valid UTF-8 text")]
    InvalidEncoding,

    /// Segmentation found no speaker tags
    #[error("Parsing failed. Ensure the file has the correct format.")]
    ParseFailure,

    /// The classifier returned a label outside positive/neutral/negative
    #[error("Unknown sentiment label: {0}")]
    UnknownLabel(String),

    /// A single utterance could not be classified
    #[error("Classification failed: {0}")]
    Classification(String),
}

impl AnalysisError {
    /// Whether the error was caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::NoInput
                | AnalysisError::EmptyInput
                | AnalysisError::InvalidEncoding
                | AnalysisError::ParseFailure
        )
    }
}
