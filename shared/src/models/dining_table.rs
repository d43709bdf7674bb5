//! Dining Table Model

use crate::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// 桌台实体
///
/// `available_times` 是 "HH:MM" 起始时段列表，可以为空。
/// 空列表表示该桌台没有固定排期：可用性搜索不会命中它，
/// 但直接指定桌台的预约会跳过时段窗口检查（见账本前置条件）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Restaurant reference
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    /// 座位数 (>= 1)
    pub size: u32,
    #[serde(default)]
    pub available_times: Vec<String>,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    pub size: u32,
    #[serde(default)]
    pub available_times: Vec<String>,
}
