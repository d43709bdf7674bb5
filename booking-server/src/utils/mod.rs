//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResult`] - 应用错误类型
//! - [`ApiResponse`] - API 响应结构
//! - [`Clock`] - 可注入时钟（确定性测试）
//! - 日志等工具

pub mod clock;
pub mod error;
pub mod logger;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ApiResponse, AppError, AppResult};
