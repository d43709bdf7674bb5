//! 服务器级错误
//!
//! 启动/运行期的顶层错误，API 层错误见 [`crate::utils::AppError`]。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("启动失败: {0}")]
    Startup(String),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// 服务器层 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
