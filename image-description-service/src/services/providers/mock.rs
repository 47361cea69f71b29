//! Mock providers for testing.
//!
//! Both mocks return a scripted outcome and record every call so tests can
//! assert on what the analyzer sent to its collaborators.

use super::{
    DetectedLabel, DetectionParams, GenerationParams, LabelDetector, ProviderError, TextGenerator,
};
use async_trait::async_trait;
use std::sync::Mutex;

/// A recorded `detect_labels` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectCall {
    pub image: Vec<u8>,
    pub params: DetectionParams,
}

/// A recorded `generate` call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateCall {
    pub prompt: String,
    pub params: GenerationParams,
}

/// Mock label detector.
pub struct MockLabelDetector {
    outcome: Result<Vec<DetectedLabel>, String>,
    calls: Mutex<Vec<DetectCall>>,
}

impl MockLabelDetector {
    /// Detector returning `names` in order, with descending confidence.
    pub fn with_labels(names: &[&str]) -> Self {
        let labels = names
            .iter()
            .enumerate()
            .map(|(i, name)| DetectedLabel::new(*name, 99.0 - i as f32))
            .collect();
        Self {
            outcome: Ok(labels),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Detector that finds nothing above the threshold.
    pub fn empty() -> Self {
        Self::with_labels(&[])
    }

    /// Detector whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<DetectCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl LabelDetector for MockLabelDetector {
    async fn detect_labels(
        &self,
        image: &[u8],
        params: &DetectionParams,
    ) -> Result<Vec<DetectedLabel>, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(DetectCall {
                image: image.to_vec(),
                params: params.clone(),
            });
        }

        self.outcome.clone().map_err(ProviderError::ApiError)
    }
}

/// Mock text generator.
pub struct MockTextGenerator {
    outcome: Result<String, String>,
    calls: Mutex<Vec<GenerateCall>>,
}

impl MockTextGenerator {
    /// Generator that always answers with `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Generator whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<GenerateCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    /// Prompt of the most recent call.
    pub fn last_prompt(&self) -> Option<String> {
        self.calls().last().map(|c| c.prompt.clone())
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(GenerateCall {
                prompt: prompt.to_string(),
                params: params.clone(),
            });
        }

        self.outcome.clone().map_err(ProviderError::ApiError)
    }
}
