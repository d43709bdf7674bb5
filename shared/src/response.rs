//! API 响应 DTO

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{Booking, BookingStatus, DiningTable};

/// 预约视图 — 附带冗余的只读字段，前端无需额外请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingView {
    pub id: String,
    pub restaurant: String,
    pub restaurant_name: String,
    pub table: String,
    pub table_size: u32,
    /// ISO 日期
    pub date: String,
    pub time: String,
    pub num_people: u32,
    pub status: BookingStatus,
    pub created_at: i64,
}

impl BookingView {
    /// 视图报告有效状态：已过期的 BOOKED 记录对外是 COMPLETED，
    /// 落库状态不变（COMPLETED 是推导态，不持久化）。
    pub fn from_booking(
        booking: &Booking,
        restaurant_name: &str,
        table_size: u32,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: booking
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            restaurant: booking.restaurant.to_string(),
            restaurant_name: restaurant_name.to_string(),
            table: booking.table.to_string(),
            table_size,
            date: booking.date.format("%Y-%m-%d").to_string(),
            time: booking.time.clone(),
            num_people: booking.num_people,
            status: booking.effective_status(now),
            created_at: booking.created_at,
        }
    }
}

/// 桌台视图 (GET /api/restaurants/{id}/tables)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableView {
    pub id: String,
    pub size: u32,
    pub available_times: Vec<String>,
}

impl From<&DiningTable> for TableView {
    fn from(t: &DiningTable) -> Self {
        Self {
            id: t.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            size: t.size,
            available_times: t.available_times.clone(),
        }
    }
}

/// 可用性搜索中单张桌台的命中结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableAvailability {
    pub id: String,
    pub size: u32,
    /// 容差窗口内的时段，升序
    pub times: Vec<String>,
}

/// 可用性搜索的单家餐厅条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    pub restaurant_id: String,
    pub name: String,
    pub address: String,
    pub rating: f64,
    /// 当天（非请求日期）已有预约数，反映餐厅当前繁忙程度
    pub bookings_today: u64,
    pub tables: Vec<TableAvailability>,
}

/// 简单消息响应 (取消预约等)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use surrealdb::RecordId;

    fn booking(date: NaiveDate, time: &str) -> Booking {
        Booking {
            id: Some(RecordId::from_table_key("booking", "b1")),
            user: "u1".into(),
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
    fn view_reports_completed_for_elapsed_booking() {
        let d = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let b = booking(d, "19:00");

        let before = d.and_hms_opt(18, 0, 0).unwrap();
        let view = BookingView::from_booking(&b, "Blue Door", 4, before);
        assert_eq!(view.status, BookingStatus::Booked);

        let after = d.and_hms_opt(20, 0, 0).unwrap();
        let view = BookingView::from_booking(&b, "Blue Door", 4, after);
        assert_eq!(view.status, BookingStatus::Completed);
    }

    #[test]
    fn view_keeps_cancelled_terminal() {
        let d = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut b = booking(d, "19:00");
        b.status = BookingStatus::Cancelled;

        let after = d.and_hms_opt(23, 0, 0).unwrap();
        let view = BookingView::from_booking(&b, "Blue Door", 4, after);
        assert_eq!(view.status, BookingStatus::Cancelled);
    }
}
