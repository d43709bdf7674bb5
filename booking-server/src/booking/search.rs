//! 可用性搜索
//!
//! 组合桌台注册表 + 时段匹配器 + 账本计数，回答
//! "N 个人想在 T 时间吃饭，哪里有位子"。

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use crate::db::repository::{BookingRepository, DiningTableRepository, RestaurantRepository};
use crate::utils::Clock;
use shared::response::{AvailabilityEntry, TableAvailability};

use super::error::LedgerResult;
use super::slots;

/// 可用性搜索服务
pub struct AvailabilitySearch {
    restaurants: RestaurantRepository,
    tables: DiningTableRepository,
    bookings: BookingRepository,
    clock: Arc<dyn Clock>,
    tolerance_min: i64,
}

impl AvailabilitySearch {
    pub fn new(db: Surreal<Db>, clock: Arc<dyn Clock>, tolerance_min: i64) -> Self {
        Self {
            restaurants: RestaurantRepository::new(db.clone()),
            tables: DiningTableRepository::new(db.clone()),
            bookings: BookingRepository::new(db),
            clock,
            tolerance_min,
        }
    }

    /// 搜索可用餐厅
    ///
    /// 1. 位置过滤（城市/州子串，邮编精确）
    /// 2. 每家候选餐厅：`size >= num_people` 的桌台过时段匹配器（±容差）
    /// 3. 全部桌台零命中的餐厅整体省略
    /// 4. 命中条目附带今天（时钟的今天，非 `_date`）的预约数
    ///
    /// 结果顺序即仓库扫描顺序（按名称），不做额外排名。
    /// `_date` 参数是契约的一部分但不参与窗口匹配 — 时段列表不感知
    /// 日历，容差只作用于一天内的墙钟时间。
    pub async fn search(
        &self,
        _date: NaiveDate,
        time: NaiveTime,
        num_people: u32,
        city_state: Option<&str>,
        zip_code: Option<&str>,
    ) -> LedgerResult<Vec<AvailabilityEntry>> {
        let candidates = self.restaurants.find_by_location(city_state, zip_code).await?;
        let today = self.clock.today();

        let mut entries = Vec::new();
        for restaurant in candidates {
            let Some(restaurant_id) = restaurant.id.clone() else {
                continue;
            };

            let tables = self
                .tables
                .find_by_restaurant_min_size(&restaurant_id, num_people)
                .await?;
            let matched = slots::match_tables(time, self.tolerance_min, &tables, num_people);
            if matched.is_empty() {
                continue;
            }

            let bookings_today = self.bookings.count_for_date(&restaurant_id, today).await?;

            entries.push(AvailabilityEntry {
                restaurant_id: restaurant_id.to_string(),
                name: restaurant.name,
                address: restaurant.address,
                rating: restaurant.rating,
                bookings_today,
                tables: matched
                    .into_iter()
                    .map(|(t, times)| TableAvailability {
                        id: t.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
                        size: t.size,
                        times,
                    })
                    .collect(),
            });
        }

        Ok(entries)
    }
}
