use image_description_service::config::DescriberConfig;
use image_description_service::startup::{
    aws_analyzer, build_router, is_lambda_environment, run_lambda, AppState, Application,
};
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    let config = DescriberConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    init_tracing(
        "image-description-service",
        &config.observability.log_level,
        config.observability.otlp_endpoint.as_deref(),
    );

    if is_lambda_environment() {
        let analyzer = aws_analyzer(&config).await;
        let router = build_router(AppState::new(analyzer), &config.http.analyze_route);
        return run_lambda(router).await;
    }

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        e
    })?;
    app.run_until_stopped().await?;

    tracing::info!("Image description service stopped");
    Ok(())
}
