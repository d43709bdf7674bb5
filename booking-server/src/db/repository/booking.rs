//! Booking Repository
//!
//! 预约记录的存取。排他不变量的检查-再-插入序列由
//! [`crate::booking::BookingLedger`] 在 per-key 锁内驱动，
//! 仓库本身只做单条读写。

use super::{BaseRepository, RepoError, RepoResult};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::{Booking, BookingStatus};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "booking";

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// 精确元组上的 BOOKED 记录（排他性检查）
    pub async fn find_active(
        &self,
        table: &RecordId,
        date: NaiveDate,
        time: &str,
    ) -> RepoResult<Option<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query(
                "SELECT * FROM booking WHERE `table` = $table AND date = $date AND time = $time AND status = 'BOOKED' LIMIT 1",
            )
            .bind(("table", table.to_string()))
            .bind(("date", date.format("%Y-%m-%d").to_string()))
            .bind(("time", time.to_string()))
            .await?
            .take(0)?;
        Ok(bookings.into_iter().next())
    }

    /// 精确元组上、由 `user` 持有的 BOOKED 记录（取消入口）
    pub async fn find_active_owned(
        &self,
        user: &str,
        restaurant: &RecordId,
        table: &RecordId,
        date: NaiveDate,
        time: &str,
    ) -> RepoResult<Option<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query(
                "SELECT * FROM booking WHERE user = $user AND restaurant = $restaurant AND `table` = $table AND date = $date AND time = $time AND status = 'BOOKED' LIMIT 1",
            )
            .bind(("user", user.to_string()))
            .bind(("restaurant", restaurant.to_string()))
            .bind(("table", table.to_string()))
            .bind(("date", date.format("%Y-%m-%d").to_string()))
            .bind(("time", time.to_string()))
            .await?
            .take(0)?;
        Ok(bookings.into_iter().next())
    }

    /// Persist a new booking row
    pub async fn create(&self, booking: Booking) -> RepoResult<Booking> {
        let created: Option<Booking> = self.base.db().create(TABLE).content(booking).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create booking".to_string()))
    }

    /// 状态转换，同时盖状态变更时间戳
    pub async fn set_status(
        &self,
        id: &RecordId,
        status: BookingStatus,
        status_changed_at: i64,
    ) -> RepoResult<Booking> {
        self.base
            .db()
            .query("UPDATE $thing SET status = $status, status_changed_at = $ts")
            .bind(("thing", id.clone()))
            .bind(("status", status.as_str()))
            .bind(("ts", status_changed_at))
            .await?;

        let updated: Option<Booking> = self.base.db().select(id.clone()).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))
    }

    /// 某餐厅在某天的预约总数（所有状态，运营繁忙度信号）
    pub async fn count_for_date(
        &self,
        restaurant: &RecordId,
        date: NaiveDate,
    ) -> RepoResult<u64> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query(
                "SELECT count() FROM booking WHERE restaurant = $restaurant AND date = $date GROUP ALL",
            )
            .bind(("restaurant", restaurant.to_string()))
            .bind(("date", date.format("%Y-%m-%d").to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next().map(|r| r.count).unwrap_or(0))
    }

    /// 用户的全部预约，新的在前
    pub async fn list_for_user(&self, user: &str) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * FROM booking WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user.to_string()))
            .await?
            .take(0)?;
        Ok(bookings)
    }
}
