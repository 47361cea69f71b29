//! Request and response bodies for the analyze endpoint.

use serde::{Deserialize, Serialize};

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    /// Base64-encoded image bytes. `null`, absent and `""` are all "no image".
    #[serde(default)]
    pub image: Option<String>,
}

impl AnalysisRequest {
    /// The encoded image, if one was actually supplied.
    pub fn encoded_image(&self) -> Option<&str> {
        self.image.as_deref().filter(|image| !image.is_empty())
    }
}

/// Successful analysis: detected labels and the generated sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Label names in detector order, highest confidence first.
    pub labels: Vec<String>,
    pub description: String,
}
