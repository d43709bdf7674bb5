//! Booking API 模块
//!
//! 预约创建/取消/查询，全部要求网关身份。

mod handler;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/bookings", post(handler::create))
        .route("/api/bookings/cancel", post(handler::cancel))
        .route("/api/bookings/mine", get(handler::list_mine))
        .layer(middleware::from_fn(require_auth))
}
