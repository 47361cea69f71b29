//! Image analysis pipeline.
//!
//! One call runs strictly in sequence: decode, detect labels, and, when any
//! label was found, generate a sentence from them. Nothing is retried or cached.

use crate::models::AnalysisResult;
use crate::services::providers::{
    DetectionParams, GenerationParams, LabelDetector, ProviderError, TextGenerator,
};
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;
use thiserror::Error;

/// Description returned when no label clears the confidence threshold.
pub const NO_LABELS_DESCRIPTION: &str =
    "Could not detect any labels with high confidence. Please try another image.";

const PROMPT_PREFIX: &str = "Based on the following labels detected in an image: ";
const PROMPT_SUFFIX: &str = ". Please generate a single, descriptive sentence about the image.";

/// Failure anywhere in the pipeline. All variants are server errors.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid base64 image data: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error(transparent)]
    Detection(ProviderError),

    #[error(transparent)]
    Generation(ProviderError),
}

/// Build the generation prompt for `labels`.
pub fn build_prompt(labels: &[String]) -> String {
    format!("{}{}{}", PROMPT_PREFIX, labels.join(", "), PROMPT_SUFFIX)
}

/// Decode standard base64, ignoring ASCII whitespace such as line wrapping.
fn decode_image(encoded_image: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = encoded_image
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    general_purpose::STANDARD.decode(compact)
}

/// Runs the detect-then-describe pipeline against injected collaborators.
#[derive(Clone)]
pub struct ImageAnalyzer {
    detector: Arc<dyn LabelDetector>,
    generator: Arc<dyn TextGenerator>,
    detection_params: DetectionParams,
    generation_params: GenerationParams,
}

impl ImageAnalyzer {
    pub fn new(detector: Arc<dyn LabelDetector>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            detector,
            generator,
            detection_params: DetectionParams::default(),
            generation_params: GenerationParams::default(),
        }
    }

    /// Decode `encoded_image` and describe it.
    ///
    /// The generator is only called when the detector returned at least one
    /// label; otherwise the fixed [`NO_LABELS_DESCRIPTION`] is returned.
    pub async fn analyze(&self, encoded_image: &str) -> Result<AnalysisResult, AnalysisError> {
        let image = decode_image(encoded_image)?;

        let labels: Vec<String> = self
            .detector
            .detect_labels(&image, &self.detection_params)
            .await
            .map_err(AnalysisError::Detection)?
            .into_iter()
            .map(|label| label.name)
            .collect();

        tracing::info!(label_count = labels.len(), labels = ?labels, "Labels detected");

        if labels.is_empty() {
            return Ok(AnalysisResult {
                labels,
                description: NO_LABELS_DESCRIPTION.to_string(),
            });
        }

        let prompt = build_prompt(&labels);
        let generated = self
            .generator
            .generate(&prompt, &self.generation_params)
            .await
            .map_err(AnalysisError::Generation)?;

        Ok(AnalysisResult {
            labels,
            description: generated.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::{MockLabelDetector, MockTextGenerator};

    const IMAGE_B64: &str = "aGVsbG8gaW1hZ2U="; // "hello image"

    fn analyzer(
        detector: MockLabelDetector,
        generator: MockTextGenerator,
    ) -> (ImageAnalyzer, Arc<MockLabelDetector>, Arc<MockTextGenerator>) {
        let detector = Arc::new(detector);
        let generator = Arc::new(generator);
        let analyzer = ImageAnalyzer::new(detector.clone(), generator.clone());
        (analyzer, detector, generator)
    }

    #[test]
    fn prompt_matches_template() {
        let prompt = build_prompt(&["Dog".to_string(), "Park".to_string()]);
        assert_eq!(
            prompt,
            "Based on the following labels detected in an image: Dog, Park. \
             Please generate a single, descriptive sentence about the image."
        );
    }

    #[test]
    fn prompt_with_single_label_has_no_separator() {
        let prompt = build_prompt(&["Cat".to_string()]);
        assert!(prompt.contains(": Cat. Please"));
    }

    #[tokio::test]
    async fn decoded_bytes_and_fixed_params_reach_detector() {
        let (analyzer, detector, _) = analyzer(
            MockLabelDetector::with_labels(&["Dog"]),
            MockTextGenerator::with_text("A dog."),
        );

        analyzer.analyze(IMAGE_B64).await.unwrap();

        let calls = detector.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].image, b"hello image");
        assert_eq!(calls[0].params.max_labels, 10);
        assert_eq!(calls[0].params.min_confidence, 80.0);
    }

    #[tokio::test]
    async fn generator_receives_prompt_and_fixed_config() {
        let (analyzer, _, generator) = analyzer(
            MockLabelDetector::with_labels(&["Dog", "Park"]),
            MockTextGenerator::with_text("  A dog playing in a park.\n"),
        );

        let result = analyzer.analyze(IMAGE_B64).await.unwrap();

        assert_eq!(result.labels, vec!["Dog", "Park"]);
        assert_eq!(result.description, "A dog playing in a park.");

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, build_prompt(&result.labels));
        assert_eq!(calls[0].params.max_token_count, 100);
        assert!(calls[0].params.stop_sequences.is_empty());
        assert_eq!(calls[0].params.temperature, 0.7);
        assert_eq!(calls[0].params.top_p, 0.9);
    }

    #[tokio::test]
    async fn no_labels_skips_generation() {
        let (analyzer, _, generator) =
            analyzer(MockLabelDetector::empty(), MockTextGenerator::with_text("unused"));

        let result = analyzer.analyze(IMAGE_B64).await.unwrap();

        assert!(result.labels.is_empty());
        assert_eq!(result.description, NO_LABELS_DESCRIPTION);
        assert_eq!(generator.call_count(), 0);
    }

    #[test]
    fn line_wrapped_base64_is_decoded() {
        assert_eq!(decode_image("aGVsbG8g\naW1hZ2U=\r\n").unwrap(), b"hello image");
        assert_eq!(decode_image(" aGVs bG8g\taW1h Z2U= ").unwrap(), b"hello image");
    }

    #[tokio::test]
    async fn invalid_base64_fails_before_detection() {
        let (analyzer, detector, _) = analyzer(
            MockLabelDetector::with_labels(&["Dog"]),
            MockTextGenerator::with_text("A dog."),
        );

        let err = analyzer.analyze("***not base64***").await.unwrap_err();

        assert!(matches!(err, AnalysisError::Decode(_)));
        assert_eq!(detector.call_count(), 0);
    }

    #[tokio::test]
    async fn detector_failure_keeps_message_and_skips_generation() {
        let (analyzer, _, generator) = analyzer(
            MockLabelDetector::failing("InvalidImageFormatException: unsupported format"),
            MockTextGenerator::with_text("unused"),
        );

        let err = analyzer.analyze(IMAGE_B64).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Detection(_)));
        assert_eq!(err.to_string(), "InvalidImageFormatException: unsupported format");
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn generator_failure_is_surfaced() {
        let (analyzer, _, _) = analyzer(
            MockLabelDetector::with_labels(&["Dog"]),
            MockTextGenerator::failing("ThrottlingException: slow down"),
        );

        let err = analyzer.analyze(IMAGE_B64).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Generation(_)));
        assert!(err.to_string().contains("ThrottlingException"));
    }
}
