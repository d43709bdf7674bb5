//! Booking Model

use crate::serde_helpers;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// 预约状态
///
/// 状态机：`BOOKED → CANCELLED`（用户/管理员取消）；
/// `BOOKED → COMPLETED` 由时间推导（`is_past`），不落库，
/// CANCELLED 和 COMPLETED 都是终态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Booked,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Booked => "BOOKED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
        }
    }
}

/// 预约记录
///
/// 排他不变量：同一 (table, date, time) 最多存在一条 BOOKED 记录。
/// CANCELLED / COMPLETED 不占用时段，取消后可立即重订。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// 预约用户 ID（上游认证网关颁发）
    pub user: String,
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub table: RecordId,
    pub date: NaiveDate,
    /// 归一化 "HH:MM"
    pub time: String,
    pub num_people: u32,
    pub status: BookingStatus,
    pub created_at: i64,
    /// 仅在状态转换时更新，普通字段编辑不触碰
    pub status_changed_at: i64,
}

impl Booking {
    /// 预约时刻是否已经过去
    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        match crate::util::parse_time_hm(&self.time) {
            Some(t) => self.date.and_time(t) < now,
            // 损坏的时间字符串按未过期处理，留给人工修复
            None => false,
        }
    }

    /// 有效状态：已过期的 BOOKED 记录推导为 COMPLETED
    pub fn effective_status(&self, now: NaiveDateTime) -> BookingStatus {
        match self.status {
            BookingStatus::Booked if self.is_past(now) => BookingStatus::Completed,
            s => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn booking(date: NaiveDate, time: &str) -> Booking {
        Booking {
            id: None,
            user: "user-1".into(),
            restaurant: RecordId::from_table_key("restaurant", "r1"),
            table: RecordId::from_table_key("dining_table", "t1"),
            date,
            time: time.into(),
            num_people: 2,
            status: BookingStatus::Booked,
            created_at: 0,
            status_changed_at: 0,
        }
    }

    #[test]
    fn completed_is_derived_from_time() {
        let d = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let b = booking(d, "19:00");

        let before = d.and_hms_opt(18, 0, 0).unwrap();
        assert_eq!(b.effective_status(before), BookingStatus::Booked);

        let after = d.and_hms_opt(19, 30, 0).unwrap();
        assert_eq!(b.effective_status(after), BookingStatus::Completed);
    }

    #[test]
    fn cancelled_is_terminal() {
        let d = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut b = booking(d, "19:00");
        b.status = BookingStatus::Cancelled;

        let after = d.and_hms_opt(23, 0, 0).unwrap();
        assert_eq!(b.effective_status(after), BookingStatus::Cancelled);
    }
}
