//! 预约核心
//!
//! 本模块是系统的事务核心，覆盖时段搜索、容量匹配和并发安全的
//! 预约创建/取消：
//!
//! - [`slots`] - 时段匹配器（纯函数：容差窗口 + 容量过滤）
//! - [`locks`] - per-(table, date, time) 锁注册表
//! - [`ledger`] - 预约账本（Booking 记录的唯一写入者，排他不变量的执行点）
//! - [`search`] - 可用性搜索（组合桌台注册表 + 时段匹配器 + 账本）
//!
//! # 请求状态机
//!
//! ```text
//! RECEIVED → VALIDATED → LOCKED → COMMITTED | REJECTED
//! ```
//!
//! VALIDATED 覆盖静态检查（解析、正整数、非过去时间），
//! LOCKED 是排他检查和插入原子执行的锁窗口，
//! 任何前置条件失败都以特定原因码进入 REJECTED。

pub mod error;
pub mod ledger;
pub mod locks;
pub mod search;
pub mod slots;

pub use error::{LedgerError, LedgerResult};
pub use ledger::{BookingLedger, CommittedBooking};
pub use locks::SlotLockRegistry;
pub use search::AvailabilitySearch;

/// 默认容差窗口（分钟）
pub const DEFAULT_TOLERANCE_MIN: i64 = 30;
