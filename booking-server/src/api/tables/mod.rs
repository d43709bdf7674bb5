//! Dining Table API 模块
//!
//! 桌台配置维护，只有所属餐厅的店主可以改。

mod handler;

use axum::{middleware, routing::put, Router};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/tables/{id}", put(handler::update))
        .layer(middleware::from_fn(require_auth))
}
