//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`restaurants`] - 餐厅：可用性搜索、详情、桌台列表、登记
//! - [`tables`] - 桌台配置维护
//! - [`bookings`] - 预约创建/取消/我的预约

pub mod bookings;
pub mod health;
pub mod restaurants;
pub mod tables;

use axum::Router;

use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(restaurants::router())
        .merge(tables::router())
        .merge(bookings::router())
}
