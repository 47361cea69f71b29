use axum::http::{Method, Uri};
use service_core::error::AppError;

/// JSON 404 for paths no route matches.
pub async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(anyhow::anyhow!("No route for {}", uri.path()))
}

/// JSON 405 for methods the analyze route does not serve.
pub async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::MethodNotAllowed(anyhow::anyhow!(
        "{} is not supported on {}",
        method,
        uri.path()
    ))
}
