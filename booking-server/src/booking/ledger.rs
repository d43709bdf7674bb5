//! 预约账本
//!
//! Booking 记录的唯一写入者，排他不变量的执行点：
//! 同一 (table, date, time) 最多一条 BOOKED 记录。
//!
//! # 创建流程
//!
//! ```text
//! create_booking(user, restaurant, table, date, time, num_people)
//!     ├─ 1. 过去时间检查           → Validation
//!     ├─ 2. 桌台/餐厅存在性         → NotFound
//!     ├─ 3. 容量检查               → Capacity
//!     ├─ 4. 归属检查               → Mismatch
//!     ├─ 5. 时段窗口检查 (±容差)    → SlotWindow
//!     ├─ 6. 获取 (table,date,time) 锁 → LockBusy (等待有界)
//!     ├─ 7. 排他检查               → Conflict
//!     ├─ 8. 落库 BOOKED 记录
//!     ├─ 9. 释放锁
//!     └─ 10. 派发确认通知 (spawn, 失败只记日志)
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use crate::auth::CurrentUser;
use crate::db::repository::{BookingRepository, DiningTableRepository, RestaurantRepository};
use crate::services::Notifier;
use crate::utils::Clock;
use shared::models::{Booking, BookingStatus};
use shared::util::{format_time_hm, now_millis};

use super::error::{LedgerError, LedgerResult};
use super::locks::SlotLockRegistry;
use super::slots;

/// 成功落库的预约，附带视图所需的冗余字段
#[derive(Debug, Clone)]
pub struct CommittedBooking {
    pub booking: Booking,
    pub restaurant_name: String,
    pub table_size: u32,
}

/// 预约账本
pub struct BookingLedger {
    bookings: BookingRepository,
    tables: DiningTableRepository,
    restaurants: RestaurantRepository,
    locks: SlotLockRegistry,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    /// 时段容差（分钟）
    tolerance_min: i64,
}

impl BookingLedger {
    pub fn new(
        db: Surreal<Db>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        tolerance_min: i64,
        lock_wait: Duration,
    ) -> Self {
        Self {
            bookings: BookingRepository::new(db.clone()),
            tables: DiningTableRepository::new(db.clone()),
            restaurants: RestaurantRepository::new(db),
            locks: SlotLockRegistry::new(lock_wait),
            clock,
            notifier,
            tolerance_min,
        }
    }

    /// 创建预约
    ///
    /// 前置条件按固定顺序检查，每个失败都是独立的错误分类。
    /// 排他检查和插入在 per-key 锁内作为单一原子单元执行。
    pub async fn create_booking(
        &self,
        user: &CurrentUser,
        restaurant_id: &RecordId,
        table_id: &RecordId,
        date: NaiveDate,
        time: NaiveTime,
        num_people: u32,
    ) -> LedgerResult<CommittedBooking> {
        let time_str = format_time_hm(time);

        // 1. 过去时间检查
        if date.and_time(time) < self.clock.now() {
            return Err(LedgerError::Validation("Cannot book in the past".to_string()));
        }
        if num_people < 1 {
            return Err(LedgerError::Validation(
                "Party size must be at least 1".to_string(),
            ));
        }

        // 2. 桌台/餐厅存在性
        let table = self
            .tables
            .find_by_id(&table_id.to_string())
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("Table {} not found", table_id)))?;
        let restaurant = self
            .restaurants
            .find_by_id(&restaurant_id.to_string())
            .await?
            .ok_or_else(|| {
                LedgerError::NotFound(format!("Restaurant {} not found", restaurant_id))
            })?;

        // 3. 容量检查
        if num_people > table.size {
            return Err(LedgerError::Capacity(format!(
                "Table seats {}, but {} requested",
                table.size, num_people
            )));
        }

        // 4. 归属检查
        if &table.restaurant != restaurant_id {
            return Err(LedgerError::Mismatch(
                "This table does not belong to the specified restaurant".to_string(),
            ));
        }

        // 5. 时段窗口检查，无排期桌台跳过（空时段策略见 slots 模块文档）
        if !table.available_times.is_empty()
            && !slots::is_within_window(time, self.tolerance_min, &table.available_times)
        {
            return Err(LedgerError::SlotWindow(
                "Requested time outside allowed slots".to_string(),
            ));
        }

        // 6-8. 锁内的检查-再-插入：对同一 (table, date, time) 的并发
        // 请求在这里串行化，其余请求互不阻塞。
        let key = SlotLockRegistry::key(table_id, date, &time_str);
        let guard = self.locks.acquire(&key).await?;

        if self
            .bookings
            .find_active(table_id, date, &time_str)
            .await?
            .is_some()
        {
            return Err(LedgerError::Conflict(
                "Table already booked at that time".to_string(),
            ));
        }

        let now = now_millis();
        let booking = self
            .bookings
            .create(Booking {
                id: None,
                user: user.id.clone(),
                restaurant: restaurant_id.clone(),
                table: table_id.clone(),
                date,
                time: time_str.clone(),
                num_people,
                status: BookingStatus::Booked,
                created_at: now,
                status_changed_at: now,
            })
            .await?;

        drop(guard);

        tracing::info!(
            user = %user.id,
            table = %table_id,
            date = %date,
            time = %time_str,
            "Booking committed"
        );

        // 10. 确认通知：提交后、关键路径外，失败只记日志不回滚
        self.dispatch_confirmation(user, &restaurant.name, &booking);

        Ok(CommittedBooking {
            booking,
            restaurant_name: restaurant.name,
            table_size: table.size,
        })
    }

    /// 取消预约
    ///
    /// 只有精确元组上、由调用者持有的 BOOKED 记录可以取消；
    /// 转换为 CANCELLED 并盖状态变更时间戳，时段立即可重订。
    pub async fn cancel_booking(
        &self,
        user: &CurrentUser,
        restaurant_id: &RecordId,
        table_id: &RecordId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> LedgerResult<Booking> {
        let time_str = format_time_hm(time);

        let booking = self
            .bookings
            .find_active_owned(&user.id, restaurant_id, table_id, date, &time_str)
            .await?
            .ok_or_else(|| LedgerError::NotFound("Booking not found".to_string()))?;

        let id = booking
            .id
            .clone()
            .ok_or_else(|| LedgerError::Database("Booking row has no id".to_string()))?;

        let cancelled = self
            .bookings
            .set_status(&id, BookingStatus::Cancelled, now_millis())
            .await?;

        tracing::info!(user = %user.id, booking = %id, "Booking cancelled");
        Ok(cancelled)
    }

    /// 某餐厅今天（注入时钟的今天，不是请求日期）的预约数
    pub async fn bookings_today(&self, restaurant_id: &RecordId) -> LedgerResult<u64> {
        Ok(self
            .bookings
            .count_for_date(restaurant_id, self.clock.today())
            .await?)
    }

    /// 调用者的全部预约，新的在前
    pub async fn list_for_user(&self, user: &CurrentUser) -> LedgerResult<Vec<Booking>> {
        Ok(self.bookings.list_for_user(&user.id).await?)
    }

    fn dispatch_confirmation(&self, user: &CurrentUser, restaurant_name: &str, booking: &Booking) {
        let Some(email) = user.email.clone() else {
            tracing::debug!(user = %user.id, "No contact address, skipping confirmation");
            return;
        };

        let subject = "Booking Confirmation".to_string();
        let body = format!(
            "Hi {},\n\nYour table for {} at {} on {} at {} is confirmed.",
            user.username, booking.num_people, restaurant_name, booking.date, booking.time
        );
        let notifier = self.notifier.clone();

        tokio::spawn(async move {
            if let Err(e) = notifier.send_confirmation(&email, &subject, &body).await {
                tracing::warn!(to = %email, error = %e, "Confirmation dispatch failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::services::LogNotifier;
    use crate::utils::FixedClock;
    use chrono::NaiveDate;
    use shared::models::{DiningTableCreate, RestaurantCreate};

    // 冻结在 2025-06-01 12:00，预约都订当晚
    fn frozen_clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        ))
    }

    fn user(id: &str) -> CurrentUser {
        CurrentUser {
            id: id.to_string(),
            username: id.to_string(),
            email: None,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    async fn seed(slots: Vec<String>) -> (BookingLedger, RecordId, RecordId) {
        let db = DbService::memory().await.unwrap().db;
        let ledger = BookingLedger::new(
            db.clone(),
            frozen_clock(),
            Arc::new(LogNotifier),
            30,
            Duration::from_millis(500),
        );

        let restaurant = RestaurantRepository::new(db.clone())
            .create(
                "owner-1",
                RestaurantCreate {
                    name: "Blue Door".into(),
                    address: "1 Main St".into(),
                    city: "Portland".into(),
                    state: "OR".into(),
                    zip_code: "97201".into(),
                    rating: Some(4.5),
                },
            )
            .await
            .unwrap();
        let restaurant_id = restaurant.id.unwrap();

        let table = DiningTableRepository::new(db)
            .create(DiningTableCreate {
                restaurant: restaurant_id.clone(),
                size: 4,
                available_times: slots,
            })
            .await
            .unwrap();

        (ledger, restaurant_id, table.id.unwrap())
    }

    #[tokio::test]
    async fn books_a_free_slot() {
        let (ledger, rid, tid) = seed(vec!["19:00".into()]).await;

        let committed = ledger
            .create_booking(&user("u1"), &rid, &tid, date(), time(19, 0), 2)
            .await
            .unwrap();
        assert_eq!(committed.booking.status, BookingStatus::Booked);
        assert_eq!(committed.restaurant_name, "Blue Door");
        assert_eq!(committed.table_size, 4);
    }

    #[tokio::test]
    async fn rejects_past_datetime() {
        let (ledger, rid, tid) = seed(vec!["09:00".into()]).await;

        // 时钟冻结在 12:00，当天 09:00 已经过去
        let err = ledger
            .create_booking(&user("u1"), &rid, &tid, date(), time(9, 0), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_party_over_capacity() {
        let (ledger, rid, tid) = seed(vec!["19:00".into()]).await;

        let err = ledger
            .create_booking(&user("u1"), &rid, &tid, date(), time(19, 0), 6)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Capacity(_)));
    }

    #[tokio::test]
    async fn rejects_unknown_restaurant() {
        let (ledger, _rid, tid) = seed(vec!["19:00".into()]).await;
        let other = RecordId::from_table_key("restaurant", "nope");

        let err = ledger
            .create_booking(&user("u1"), &other, &tid, date(), time(19, 0), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[tokio::test]
    async fn rejects_mismatched_restaurant() {
        let db = DbService::memory().await.unwrap().db;
        let ledger = BookingLedger::new(
            db.clone(),
            frozen_clock(),
            Arc::new(LogNotifier),
            30,
            Duration::from_millis(500),
        );

        let restaurants = RestaurantRepository::new(db.clone());
        let create = |name: &str| RestaurantCreate {
            name: name.into(),
            address: "1 Main St".into(),
            city: "Portland".into(),
            state: "OR".into(),
            zip_code: "97201".into(),
            rating: None,
        };
        let a = restaurants.create("owner-1", create("A")).await.unwrap();
        let b = restaurants.create("owner-2", create("B")).await.unwrap();

        // 桌台挂在 A 下，却拿 B 的 id 来订
        let table = DiningTableRepository::new(db)
            .create(DiningTableCreate {
                restaurant: a.id.unwrap(),
                size: 4,
                available_times: vec!["19:00".into()],
            })
            .await
            .unwrap();

        let err = ledger
            .create_booking(
                &user("u1"),
                &b.id.unwrap(),
                &table.id.unwrap(),
                date(),
                time(19, 0),
                2,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Mismatch(_)));
    }

    #[tokio::test]
    async fn rejects_time_outside_window() {
        let (ledger, rid, tid) = seed(vec!["19:00".into()]).await;

        // 19:45 距 19:00 有 45 分钟，超出 ±30 容差
        let err = ledger
            .create_booking(&user("u1"), &rid, &tid, date(), time(19, 45), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::SlotWindow(_)));
    }

    #[tokio::test]
    async fn window_edge_is_inclusive() {
        let (ledger, rid, tid) = seed(vec!["19:00".into()]).await;

        assert!(ledger
            .create_booking(&user("u1"), &rid, &tid, date(), time(19, 30), 2)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn schedule_less_table_skips_window_check() {
        let (ledger, rid, tid) = seed(vec![]).await;

        assert!(ledger
            .create_booking(&user("u1"), &rid, &tid, date(), time(21, 17), 2)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn mid_window_time_books_then_conflicts() {
        let (ledger, rid, tid) = seed(vec!["19:00".into(), "19:30".into()]).await;

        // 19:15 距两个时段各 15 分钟，窗口内
        ledger
            .create_booking(&user("u1"), &rid, &tid, date(), time(19, 15), 3)
            .await
            .unwrap();
        let err = ledger
            .create_booking(&user("u2"), &rid, &tid, date(), time(19, 15), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Conflict(_)));
    }

    #[tokio::test]
    async fn double_booking_is_conflict() {
        let (ledger, rid, tid) = seed(vec!["19:00".into()]).await;

        ledger
            .create_booking(&user("u1"), &rid, &tid, date(), time(19, 0), 2)
            .await
            .unwrap();
        let err = ledger
            .create_booking(&user("u2"), &rid, &tid, date(), time(19, 0), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Conflict(_)));
    }

    #[tokio::test]
    async fn other_slot_still_free_after_booking() {
        let (ledger, rid, tid) = seed(vec!["19:00".into(), "20:30".into()]).await;

        ledger
            .create_booking(&user("u1"), &rid, &tid, date(), time(19, 0), 2)
            .await
            .unwrap();
        assert!(ledger
            .create_booking(&user("u2"), &rid, &tid, date(), time(20, 30), 2)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn cancel_frees_the_slot() {
        let (ledger, rid, tid) = seed(vec!["19:00".into()]).await;

        ledger
            .create_booking(&user("u1"), &rid, &tid, date(), time(19, 0), 2)
            .await
            .unwrap();
        let cancelled = ledger
            .cancel_booking(&user("u1"), &rid, &tid, date(), time(19, 0))
            .await
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        // 取消后同一时段立即可重订
        assert!(ledger
            .create_booking(&user("u2"), &rid, &tid, date(), time(19, 0), 2)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn cancel_is_scoped_to_owner() {
        let (ledger, rid, tid) = seed(vec!["19:00".into()]).await;

        ledger
            .create_booking(&user("u1"), &rid, &tid, date(), time(19, 0), 2)
            .await
            .unwrap();
        let err = ledger
            .cancel_booking(&user("u2"), &rid, &tid, date(), time(19, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[tokio::test]
    async fn cancel_without_booking_is_not_found() {
        let (ledger, rid, tid) = seed(vec!["19:00".into()]).await;

        let err = ledger
            .cancel_booking(&user("u1"), &rid, &tid, date(), time(19, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[tokio::test]
    async fn bookings_today_counts_clock_date() {
        let (ledger, rid, tid) = seed(vec!["19:00".into(), "20:30".into()]).await;

        // 一条订在今天（时钟的 2025-06-01），一条订在明天
        ledger
            .create_booking(&user("u1"), &rid, &tid, date(), time(19, 0), 2)
            .await
            .unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        ledger
            .create_booking(&user("u2"), &rid, &tid, tomorrow, time(19, 0), 2)
            .await
            .unwrap();

        assert_eq!(ledger.bookings_today(&rid).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn list_for_user_newest_first() {
        let (ledger, rid, tid) = seed(vec!["19:00".into(), "20:30".into()]).await;

        ledger
            .create_booking(&user("u1"), &rid, &tid, date(), time(19, 0), 2)
            .await
            .unwrap();
        ledger
            .create_booking(&user("u1"), &rid, &tid, date(), time(20, 30), 3)
            .await
            .unwrap();
        ledger
            .create_booking(&user("u2"), &rid, &tid, date(), time(19, 0), 2)
            .await
            .unwrap_err(); // 冲突，u2 的不落库

        let mine = ledger.list_for_user(&user("u1")).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|b| b.user == "u1"));
    }
}
