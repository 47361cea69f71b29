use serde::Deserialize;
use service_core::config::{self as core_config, get_env, is_production};
use service_core::error::AppError;

/// Titan text model used when `BEDROCK_MODEL_ID` is not set.
pub const DEFAULT_MODEL_ID: &str = "amazon.titan-text-express-v1";

/// Route the analyze endpoint is mounted on when `ANALYZE_ROUTE` is not set.
pub const DEFAULT_ANALYZE_ROUTE: &str = "/analyze";

#[derive(Debug, Clone, Deserialize)]
pub struct DescriberConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub aws: AwsConfig,
    pub http: HttpConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwsConfig {
    /// Overrides the SDK's default region chain when set.
    pub region: Option<String>,
    /// Bedrock model invoked for description generation.
    pub model_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub analyze_route: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl DescriberConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        let analyze_route = get_env("ANALYZE_ROUTE", Some(DEFAULT_ANALYZE_ROUTE), is_prod)?;
        if !analyze_route.starts_with('/') {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "ANALYZE_ROUTE must start with '/', got '{}'",
                analyze_route
            )));
        }

        Ok(DescriberConfig {
            common: common_config,
            aws: AwsConfig {
                region: optional_env("AWS_REGION"),
                model_id: get_env("BEDROCK_MODEL_ID", Some(DEFAULT_MODEL_ID), is_prod)?,
            },
            http: HttpConfig { analyze_route },
            observability: ObservabilityConfig {
                log_level: get_env("LOG_LEVEL", Some("info"), false)?,
                otlp_endpoint: optional_env("OTLP_ENDPOINT"),
            },
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
