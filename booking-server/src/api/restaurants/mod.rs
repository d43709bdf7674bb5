//! Restaurant API 模块
//!
//! 搜索和桌台列表是公开路由；登记/删除需要网关身份。

mod handler;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let public_routes = Router::new()
        .route("/api/restaurants", get(handler::list))
        .route("/api/restaurants/search", get(handler::search))
        .route("/api/restaurants/{id}", get(handler::get_by_id))
        .route("/api/restaurants/{id}/tables", get(handler::list_tables));

    let owner_routes = Router::new()
        .route("/api/restaurants", post(handler::create))
        .route("/api/restaurants/{id}", delete(handler::delete_by_id))
        .layer(middleware::from_fn(require_auth));

    public_routes.merge(owner_routes)
}
