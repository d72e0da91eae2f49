//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::sync::Arc;

use axum::middleware;
use axum::Router;
use http::header::CONTENT_TYPE;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::request_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;
use crate::config::ServerConfig;

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 构建 Router
    pub fn build_router(&self) -> Router {
        // 只读接口，允许任意来源 GET
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([http::Method::GET])
            .allow_headers([CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600));

        create_routes()
            .layer(middleware::from_fn(request_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let addr = self.config.addr();

        let listener = TcpListener::bind(&addr).await?;
        info!("Study page available at {}", self.config.page_url());

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}
