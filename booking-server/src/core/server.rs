//! Server Implementation
//!
//! HTTP 服务器启动和管理

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::{Config, Result, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(&self) -> Result<()> {
        let app = build_app(self.state.clone());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("DineBook booking server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await?;

        Ok(())
    }
}

/// Build the Axum application with all routes, middleware and state
pub fn build_app(state: ServerState) -> Router {
    // 服务部署在网关之后，开发环境放开 CORS 方便本地前端调试
    let cors = if state.config.is_production() {
        CorsLayer::new()
    } else {
        CorsLayer::permissive()
    };

    crate::api::build_router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
