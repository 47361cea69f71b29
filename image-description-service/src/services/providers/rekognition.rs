//! Amazon Rekognition label detector.

use super::{DetectedLabel, DetectionParams, LabelDetector, ProviderError};
use async_trait::async_trait;
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Image, Label};
use aws_sdk_rekognition::Client;

/// Label detector backed by Rekognition `DetectLabels` with inline image bytes.
#[derive(Clone)]
pub struct RekognitionLabelDetector {
    client: Client,
}

impl RekognitionLabelDetector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

/// Keep named labels in the order Rekognition returned them.
fn to_detected_labels(labels: &[Label]) -> Vec<DetectedLabel> {
    labels
        .iter()
        .filter_map(|label| {
            label
                .name()
                .map(|name| DetectedLabel::new(name, label.confidence().unwrap_or_default()))
        })
        .collect()
}

#[async_trait]
impl LabelDetector for RekognitionLabelDetector {
    async fn detect_labels(
        &self,
        image: &[u8],
        params: &DetectionParams,
    ) -> Result<Vec<DetectedLabel>, ProviderError> {
        tracing::debug!(
            image_bytes = image.len(),
            max_labels = params.max_labels,
            min_confidence = params.min_confidence,
            "Sending DetectLabels request to Rekognition"
        );

        let response = self
            .client
            .detect_labels()
            .image(Image::builder().bytes(Blob::new(image.to_vec())).build())
            .max_labels(params.max_labels)
            .min_confidence(params.min_confidence)
            .send()
            .await
            .map_err(|e| ProviderError::ApiError(DisplayErrorContext(&e).to_string()))?;

        let labels = to_detected_labels(response.labels());

        tracing::debug!(label_count = labels.len(), "Rekognition returned labels");

        Ok(labels)
    }
}
