use std::path::Path;

use anyhow::{Context, Result};

use crate::error::AnalysisError;

/// Read a transcript file from disk
pub fn read_transcript_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    decode_transcript(&bytes).with_context(|| format!("Invalid transcript file: {:?}", path))
}

/// Decode uploaded transcript bytes as UTF-8 text
pub fn decode_transcript(bytes: &[u8]) -> Result<String, AnalysisError> {
    if bytes.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let text = std::str::from_utf8(bytes).map_err(|_| AnalysisError::InvalidEncoding)?;

    // Editors on Windows like to prepend a byte order mark
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
}
