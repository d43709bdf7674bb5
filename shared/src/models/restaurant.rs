//! Restaurant Model

use crate::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// 餐厅实体
///
/// 预约核心把餐厅当作不可变的查找目标：
/// 只有 `id`/`owner`（归属校验）和地址字段（位置过滤）参与预约逻辑。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// 店主用户 ID（上游认证网关颁发）
    pub owner: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default)]
    pub rating: f64,
    pub created_at: i64,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub rating: Option<f64>,
}
