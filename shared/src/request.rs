//! API 请求 DTO
//!
//! 所有入站负载都是强类型结构体，经过 `validator` 派生校验加显式的
//! 日期/时间解析步骤，绝不使用松散的键值映射，也绝不静默取默认值。

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::util::parse_time_hm;

/// POST /api/bookings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1))]
    pub restaurant_id: String,
    #[validate(length(min = 1))]
    pub table_id: String,
    /// ISO 日期 "YYYY-MM-DD"
    pub date: String,
    /// "HH:MM"
    pub time: String,
    #[validate(range(min = 1))]
    pub num_people: u32,
}

impl CreateBookingRequest {
    pub fn parse_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    pub fn parse_time(&self) -> Option<NaiveTime> {
        parse_time_hm(&self.time)
    }
}

/// POST /api/bookings/cancel
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CancelBookingRequest {
    #[validate(length(min = 1))]
    pub restaurant_id: String,
    #[validate(length(min = 1))]
    pub table_id: String,
    pub date: String,
    pub time: String,
}

impl CancelBookingRequest {
    pub fn parse_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    pub fn parse_time(&self) -> Option<NaiveTime> {
        parse_time_hm(&self.time)
    }
}

/// GET /api/restaurants/search query string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub time: String,
    pub num_people: u32,
    /// 城市或州名子串（不区分大小写）
    pub city_state: Option<String>,
    /// 邮编精确匹配
    pub zip_code: Option<String>,
}

impl AvailabilityQuery {
    pub fn parse_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    pub fn parse_time(&self) -> Option<NaiveTime> {
        parse_time_hm(&self.time)
    }
}

/// 建店时附带的桌台配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TablePayload {
    #[validate(range(min = 1))]
    pub size: u32,
    #[serde(default)]
    pub available_times: Vec<String>,
}

/// POST /api/restaurants
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRestaurantRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub state: String,
    #[validate(length(min = 1, max = 10))]
    pub zip_code: String,
    pub rating: Option<f64>,
    #[serde(default)]
    #[validate(nested)]
    pub tables: Vec<TablePayload>,
}

/// PUT /api/tables/{id}
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTableRequest {
    #[validate(range(min = 1))]
    pub size: Option<u32>,
    pub available_times: Option<Vec<String>>,
}
