use crate::config::DescriberConfig;
use crate::gateway::lambda_service;
use crate::handlers::{
    analyze_image, health_check, method_not_allowed, preflight, route_not_found,
};
use crate::services::providers::bedrock::{BedrockConfig, BedrockTextGenerator};
use crate::services::providers::rekognition::RekognitionLabelDetector;
use crate::services::providers::{LabelDetector, TextGenerator};
use crate::services::ImageAnalyzer;
use aws_config::{BehaviorVersion, Region};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::cors_headers_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Environment variable the function runtime sets inside a Lambda sandbox.
const LAMBDA_RUNTIME_API_ENV: &str = "AWS_LAMBDA_RUNTIME_API";

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: ImageAnalyzer,
}

impl AppState {
    pub fn new(analyzer: ImageAnalyzer) -> Self {
        Self { analyzer }
    }
}

/// Build the HTTP router with the analyze endpoint mounted at `analyze_route`.
pub fn build_router(state: AppState, analyze_route: &str) -> Router {
    Router::new()
        .route(
            analyze_route,
            post(analyze_image)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route("/health", get(health_check))
        .fallback(route_not_found)
        .layer(middleware::from_fn(cors_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build an analyzer wired to Rekognition and Bedrock.
///
/// Credentials and region come from the SDK's default provider chain unless
/// a region is configured explicitly.
pub async fn aws_analyzer(config: &DescriberConfig) -> ImageAnalyzer {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &config.aws.region {
        loader = loader.region(Region::new(region.clone()));
    }
    let sdk_config = loader.load().await;

    let detector: Arc<dyn LabelDetector> =
        Arc::new(RekognitionLabelDetector::from_sdk_config(&sdk_config));
    let generator = BedrockTextGenerator::from_sdk_config(
        &sdk_config,
        BedrockConfig {
            model_id: config.aws.model_id.clone(),
        },
    );

    tracing::info!(
        region = ?sdk_config.region(),
        model = %generator.model_id(),
        "Initialized Rekognition detector and Bedrock generator"
    );

    let generator: Arc<dyn TextGenerator> = Arc::new(generator);
    ImageAnalyzer::new(detector, generator)
}

/// True when running inside the function runtime.
pub fn is_lambda_environment() -> bool {
    std::env::var(LAMBDA_RUNTIME_API_ENV).is_ok()
}

/// Serve `router` behind the gateway proxy integration until the runtime stops.
pub async fn run_lambda(router: Router) -> Result<(), lambda_http::Error> {
    tracing::info!("Starting Lambda runtime");
    lambda_http::run(lambda_service(router)).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Standalone HTTP server, used for local runs and integration tests.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application against the real AWS collaborators.
    pub async fn build(config: DescriberConfig) -> Result<Self, AppError> {
        let analyzer = aws_analyzer(&config).await;
        Self::build_with_analyzer(config, analyzer).await
    }

    /// Build the application around an already-wired analyzer.
    pub async fn build_with_analyzer(
        config: DescriberConfig,
        analyzer: ImageAnalyzer,
    ) -> Result<Self, AppError> {
        let router = build_router(AppState::new(analyzer), &config.http.analyze_route);

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            route = %config.http.analyze_route,
            "Image description service listening"
        );

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
