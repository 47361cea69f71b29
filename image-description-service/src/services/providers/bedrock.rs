//! Amazon Bedrock text generator.
//!
//! Speaks the Titan text request/response format through `InvokeModel`.

use super::{GenerationParams, ProviderError, TextGenerator};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use serde::{Deserialize, Serialize};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Bedrock text generator configuration.
#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub model_id: String,
}

/// Text generator backed by Bedrock `InvokeModel`.
#[derive(Clone)]
pub struct BedrockTextGenerator {
    config: BedrockConfig,
    client: Client,
}

impl BedrockTextGenerator {
    pub fn new(client: Client, config: BedrockConfig) -> Self {
        Self { config, client }
    }

    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig, config: BedrockConfig) -> Self {
        Self::new(Client::new(sdk_config), config)
    }

    pub fn model_id(&self) -> &str {
        &self.config.model_id
    }
}

/// Serialize the Titan request body for `prompt`.
fn build_request_body(prompt: &str, params: &GenerationParams) -> Result<Vec<u8>, ProviderError> {
    let request = InvokeRequest {
        input_text: prompt,
        text_generation_config: TextGenerationConfig {
            max_token_count: params.max_token_count,
            stop_sequences: &params.stop_sequences,
            temperature: params.temperature,
            top_p: params.top_p,
        },
    };

    serde_json::to_vec(&request)
        .map_err(|e| ProviderError::InvalidResponse(format!("Failed to encode request: {}", e)))
}

/// Pull the first result's text out of a Titan response body.
fn parse_output_text(body: &[u8]) -> Result<String, ProviderError> {
    let response: InvokeResponse = serde_json::from_slice(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    response
        .results
        .into_iter()
        .next()
        .map(|result| result.output_text)
        .ok_or_else(|| ProviderError::InvalidResponse("response contained no results".to_string()))
}

#[async_trait]
impl TextGenerator for BedrockTextGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        let body = build_request_body(prompt, params)?;

        tracing::debug!(
            model = %self.config.model_id,
            prompt_len = prompt.len(),
            "Sending InvokeModel request to Bedrock"
        );

        let response = self
            .client
            .invoke_model()
            .model_id(&self.config.model_id)
            .content_type(JSON_CONTENT_TYPE)
            .accept(JSON_CONTENT_TYPE)
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| ProviderError::ApiError(DisplayErrorContext(&e).to_string()))?;

        parse_output_text(response.body().as_ref())
    }
}

// ============================================================================
// Bedrock Titan API types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvokeRequest<'a> {
    input_text: &'a str,
    text_generation_config: TextGenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextGenerationConfig<'a> {
    max_token_count: i32,
    stop_sequences: &'a [String],
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct InvokeResponse {
    #[serde(default)]
    results: Vec<InvokeResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvokeResult {
    output_text: String,
}
