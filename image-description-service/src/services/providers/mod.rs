//! AI provider abstractions and implementations.
//!
//! The analyzer talks to its two collaborators only through the
//! [`LabelDetector`] and [`TextGenerator`] traits, so the managed AWS services
//! can be swapped for the in-crate mocks in tests.

pub mod bedrock;
pub mod mock;
pub mod rekognition;

use async_trait::async_trait;
use thiserror::Error;

/// Maximum number of labels requested from the detector.
pub const MAX_LABELS: i32 = 10;

/// Minimum confidence (0-100 scale) a label needs to be returned.
pub const MIN_CONFIDENCE: f32 = 80.0;

/// Maximum generated length, in the generator's token units.
pub const MAX_TOKEN_COUNT: i32 = 100;

/// Sampling temperature for description generation.
pub const TEMPERATURE: f32 = 0.7;

/// Nucleus sampling cutoff for description generation.
pub const TOP_P: f32 = 0.9;

/// Error type for provider operations.
///
/// The display text is surfaced verbatim to API callers on failure.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0}")]
    ApiError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Parameters for a label detection call.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionParams {
    pub max_labels: i32,
    pub min_confidence: f32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            max_labels: MAX_LABELS,
            min_confidence: MIN_CONFIDENCE,
        }
    }
}

/// A concept found in an image.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedLabel {
    pub name: String,
    pub confidence: f32,
}

impl DetectedLabel {
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// Generation parameters for text requests.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub max_token_count: i32,
    pub stop_sequences: Vec<String>,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_token_count: MAX_TOKEN_COUNT,
            stop_sequences: Vec::new(),
            temperature: TEMPERATURE,
            top_p: TOP_P,
        }
    }
}

/// Detects concepts in an image.
#[async_trait]
pub trait LabelDetector: Send + Sync {
    /// Return labels at or above `params.min_confidence`, highest confidence
    /// first, at most `params.max_labels` of them.
    async fn detect_labels(
        &self,
        image: &[u8],
        params: &DetectionParams,
    ) -> Result<Vec<DetectedLabel>, ProviderError>;
}

/// Produces natural-language text from a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Return the text of the first generated candidate, untrimmed.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError>;
}
