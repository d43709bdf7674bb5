//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`ApiResponse`] - API 响应结构
//!
//! # 错误码规范
//!
//! | 错误码 | 含义 | HTTP |
//! |--------|------|------|
//! | E0002 | 参数校验失败 | 400 |
//! | E0003 | 资源不存在 | 404 |
//! | E0004 | 时段冲突（已被预订） | 409 |
//! | E1001 | 人数超过桌台容量 | 400 |
//! | E1002 | 桌台不属于该餐厅 | 400 |
//! | E1003 | 请求时间不在任何时段容差窗口内 | 400 |
//! | E1005 | 锁等待超时，请稍后重试 | 503 |
//! | E2001 | 无权限 | 403 |
//! | E3001 | 未登录 | 401 |
//! | E9001/E9002 | 内部/数据库错误 | 500 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// API 统一响应结构
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// 错误码 (E0000 表示成功)
    pub code: String,
    /// 消息
    pub message: String,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 应用错误枚举
///
/// 预约核心的完整错误分类：每个被拒绝的请求都携带一个
/// 机器可读的原因码，拒绝路径上绝不落库任何部分状态。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 认证/授权错误 ==========
    #[error("Authentication required")]
    /// 未登录 (401)
    Unauthorized,

    #[error("Permission denied: {0}")]
    /// 无权限 (403)
    Forbidden(String),

    // ========== 业务逻辑错误 ==========
    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Slot conflict: {0}")]
    /// 时段已被预订 (409) — 并发敏感的核心错误
    Conflict(String),

    #[error("Validation failed: {0}")]
    /// 参数校验失败 (400)
    Validation(String),

    #[error("Capacity exceeded: {0}")]
    /// 人数超过桌台容量 (400)
    Capacity(String),

    #[error("Table/restaurant mismatch: {0}")]
    /// 桌台与餐厅不匹配 (400)
    Mismatch(String),

    #[error("Outside slot window: {0}")]
    /// 请求时间不在任何时段的容差窗口内 (400)
    SlotWindow(String),

    #[error("Slot lock busy: {0}")]
    /// 热点时段锁等待超时 (503) — 可重试，区别于 Conflict
    RetryLater(String),

    // ========== 系统错误 ==========
    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001", "Please login first".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.clone()),

            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),
            AppError::Capacity(msg) => (StatusCode::BAD_REQUEST, "E1001", msg.clone()),
            AppError::Mismatch(msg) => (StatusCode::BAD_REQUEST, "E1002", msg.clone()),
            AppError::SlotWindow(msg) => (StatusCode::BAD_REQUEST, "E1003", msg.clone()),
            AppError::RetryLater(msg) => (StatusCode::SERVICE_UNAVAILABLE, "E1005", msg.clone()),

            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ApiResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Result type for API handlers
pub type AppResult<T> = Result<T, AppError>;
