//! 可注入时钟
//!
//! "过去时间" 校验和 bookings_today 统计都依赖 "现在"。
//! 通过 [`Clock`] 接口注入而非直接读系统时间，测试可以用
//! [`FixedClock`] 冻结时间，得到完全确定的行为。

use chrono::{NaiveDate, NaiveDateTime};

/// 时钟接口
pub trait Clock: Send + Sync {
    /// 当前本地时间（naive，预约的日期/时间同样是本地语义）
    fn now(&self) -> NaiveDateTime;

    /// 今天的日期
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// 系统时钟
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// 冻结时钟 — 测试用
#[derive(Debug, Clone)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
