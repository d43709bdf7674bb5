//! 账本错误分类
//!
//! 每个被拒绝的预约请求都带一个独立的原因，API 层一一映射到
//! 机器可读错误码（见 [`crate::utils::AppError`]）。

use crate::db::repository::RepoError;
use crate::utils::AppError;
use thiserror::Error;

/// 预约账本错误
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    /// 解析失败 / 非正整数 / 过去时间
    Validation(String),

    #[error("Capacity exceeded: {0}")]
    /// 人数超过桌台容量
    Capacity(String),

    #[error("Table/restaurant mismatch: {0}")]
    /// 桌台不属于指定餐厅
    Mismatch(String),

    #[error("Outside slot window: {0}")]
    /// 请求时间不在任何已声明时段的容差窗口内
    SlotWindow(String),

    #[error("Slot conflict: {0}")]
    /// 同一 (table, date, time) 已有 BOOKED 记录 — 并发敏感路径
    Conflict(String),

    #[error("Not found: {0}")]
    /// 餐厅/桌台/预约不存在，或取消目标不属于调用者
    NotFound(String),

    #[error("Slot lock busy: {0}")]
    /// 热点时段锁等待超时 — 可重试，与 Conflict 区分
    LockBusy(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

impl From<RepoError> for LedgerError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => LedgerError::NotFound(msg),
            RepoError::Validation(msg) => LedgerError::Validation(msg),
            RepoError::Database(msg) => LedgerError::Database(msg),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(msg) => AppError::Validation(msg),
            LedgerError::Capacity(msg) => AppError::Capacity(msg),
            LedgerError::Mismatch(msg) => AppError::Mismatch(msg),
            LedgerError::SlotWindow(msg) => AppError::SlotWindow(msg),
            LedgerError::Conflict(msg) => AppError::Conflict(msg),
            LedgerError::NotFound(msg) => AppError::NotFound(msg),
            LedgerError::LockBusy(msg) => AppError::RetryLater(msg),
            LedgerError::Database(msg) => AppError::Database(msg),
        }
    }
}
