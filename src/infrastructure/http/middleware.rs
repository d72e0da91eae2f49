//! HTTP Middleware
//!
//! 请求日志中间件

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// 请求日志中间件
///
/// 4xx 记 warn，5xx 记 error，其余记 debug；WebSocket 升级（101）只记 debug。
/// 业务错误（errno != 0）在 `ApiError::into_response()` 中记录
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms,
            "HTTP client error"
        );
    } else {
        tracing::debug!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms,
            "HTTP request served"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    fn create_test_router() -> Router {
        Router::new()
            .route("/ok", get(|| async { "OK" }))
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .layer(axum::middleware::from_fn(request_logging_middleware))
    }

    async fn status_of(uri: &str) -> StatusCode {
        let request = HttpRequest::builder().uri(uri).body(Body::empty()).unwrap();
        create_test_router().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_status_passes_through() {
        assert_eq!(status_of("/ok").await, StatusCode::OK);
        assert_eq!(status_of("/missing").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of("/broken").await, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_unrouted_path_is_client_error() {
        assert_eq!(status_of("/nowhere").await, StatusCode::NOT_FOUND);
    }
}
