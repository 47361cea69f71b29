//! API Gateway proxy integration.
//!
//! `lambda_http` keeps the deployment stage in the request path
//! (`/prod/analyze`), while the router is mounted on stage-less paths. Every
//! event is rewritten to drop that stage segment before routing.

use axum::Router;
use lambda_http::http::Uri;
use lambda_http::request::RequestContext;
use lambda_http::{Request, RequestExt};
use tower::util::MapRequest;

/// Stage name API Gateway HTTP APIs use when no stage appears in the URL.
const DEFAULT_STAGE: &str = "$default";

/// The router as served to the function runtime.
pub type LambdaService = MapRequest<Router, fn(Request) -> Request>;

/// Wrap `router` so gateway events are routed on their stage-less path.
pub fn lambda_service(router: Router) -> LambdaService {
    MapRequest::new(router, strip_stage_prefix as fn(Request) -> Request)
}

/// Stage the event was invoked through, if the gateway reports one.
fn request_stage(req: &Request) -> Option<String> {
    let stage = match req.request_context_ref() {
        Some(RequestContext::ApiGatewayV1(ctx)) => ctx.stage.clone(),
        Some(RequestContext::ApiGatewayV2(ctx)) => ctx.stage.clone(),
        _ => None,
    };
    stage.filter(|s| !s.is_empty() && s != DEFAULT_STAGE)
}

/// `path` without its leading `/{stage}` segment, or `None` if it has none.
fn strip_stage(path: &str, stage: &str) -> Option<String> {
    let rest = path.strip_prefix('/')?.strip_prefix(stage)?;
    match rest {
        "" => Some("/".to_string()),
        rest if rest.starts_with('/') => Some(rest.to_string()),
        _ => None,
    }
}

/// Rewrite the request URI to drop the deployment stage segment.
pub fn strip_stage_prefix(mut req: Request) -> Request {
    let Some(stage) = request_stage(&req) else {
        return req;
    };
    let Some(path) = strip_stage(req.uri().path(), &stage) else {
        return req;
    };

    let path_and_query = match req.uri().query() {
        Some(query) => format!("{}?{}", path, query),
        None => path,
    };

    let mut parts = req.uri().clone().into_parts();
    match path_and_query.parse() {
        Ok(pq) => parts.path_and_query = Some(pq),
        Err(e) => {
            tracing::warn!(error = %e, "Could not rewrite stage-prefixed path");
            return req;
        }
    }

    match Uri::from_parts(parts) {
        Ok(uri) => {
            tracing::debug!(stage = %stage, path = %uri.path(), "Stripped stage from path");
            *req.uri_mut() = uri;
        }
        Err(e) => tracing::warn!(error = %e, "Could not rebuild request URI"),
    }

    req
}
