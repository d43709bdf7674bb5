//! 时段匹配器 — 纯函数
//!
//! 只比较一天内的墙钟时间：日期不参与容差窗口（时段列表不感知日历，
//! 某桌台某天要么有时段要么没有）。窗口两端都是闭区间。
//!
//! 空时段列表的桌台在搜索中永远不命中（没有可落进窗口的时段）；
//! 直接预约对无排期桌台跳过窗口检查，见 [`super::ledger`]。

use chrono::NaiveTime;
use shared::models::DiningTable;
use shared::util::{format_time_hm, minutes_of_day, parse_time_hm};

/// 返回落在 `[requested - tolerance, requested + tolerance]`（含端点）
/// 内的时段，归一化为 "HH:MM" 并升序排列。
///
/// 无法解析的时段字符串跳过并告警，不会让整张桌台匹配失败。
pub fn matching_slots(requested: NaiveTime, tolerance_min: i64, slots: &[String]) -> Vec<String> {
    let req = minutes_of_day(requested);

    let mut hits: Vec<(i64, String)> = slots
        .iter()
        .filter_map(|s| match parse_time_hm(s) {
            Some(t) => {
                let m = minutes_of_day(t);
                if (m - req).abs() <= tolerance_min {
                    Some((m, format_time_hm(t)))
                } else {
                    None
                }
            }
            None => {
                tracing::warn!(slot = %s, "Skipping unparseable slot string");
                None
            }
        })
        .collect();

    hits.sort();
    hits.dedup();
    hits.into_iter().map(|(_, s)| s).collect()
}

/// 请求时间是否落在任意时段的容差窗口内
pub fn is_within_window(requested: NaiveTime, tolerance_min: i64, slots: &[String]) -> bool {
    !matching_slots(requested, tolerance_min, slots).is_empty()
}

/// 对一家餐厅的桌台做容量 + 时段匹配。
///
/// 返回 `size >= min_capacity` 且窗口内至少命中一个时段的桌台，
/// 连同各自过滤后的时段列表（升序）。零命中的桌台被整体排除。
pub fn match_tables<'a>(
    requested: NaiveTime,
    tolerance_min: i64,
    tables: &'a [DiningTable],
    min_capacity: u32,
) -> Vec<(&'a DiningTable, Vec<String>)> {
    tables
        .iter()
        .filter(|t| t.size >= min_capacity)
        .filter_map(|t| {
            let slots = matching_slots(requested, tolerance_min, &t.available_times);
            if slots.is_empty() {
                None
            } else {
                Some((t, slots))
            }
        })
        .collect()
}

/// 归一化一份时段配置：解析每一项并重新格式化为 "HH:MM"。
///
/// 任何一项无法解析即整体拒绝 — 桌台配置宁可报错也不静默丢弃。
pub fn normalize_slots(raw: &[String]) -> Result<Vec<String>, String> {
    let mut out = Vec::with_capacity(raw.len());
    for s in raw {
        match parse_time_hm(s) {
            Some(t) => out.push(format_time_hm(t)),
            None => return Err(format!("Invalid time slot '{}' (expected HH:MM)", s)),
        }
    }
    out.sort();
    out.dedup();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::RecordId;

    fn t(s: &str) -> NaiveTime {
        parse_time_hm(s).unwrap()
    }

    fn table(size: u32, slots: &[&str]) -> DiningTable {
        DiningTable {
            id: Some(RecordId::from_table_key("dining_table", "t1")),
            restaurant: RecordId::from_table_key("restaurant", "r1"),
            size,
            available_times: slots.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn tolerance_window_is_inclusive() {
        // |18:45-18:00|=45 排除, |18:45-18:30|=15 命中, |18:45-19:00|=15 命中
        let slots = vec!["18:00".to_string(), "18:30".to_string(), "19:00".to_string()];
        let hits = matching_slots(t("18:45"), 30, &slots);
        assert_eq!(hits, vec!["18:30", "19:00"]);

        // 正好 30 分钟也算命中（闭区间）
        let hits = matching_slots(t("18:30"), 30, &slots);
        assert_eq!(hits, vec!["18:00", "18:30", "19:00"]);
    }

    #[test]
    fn results_are_sorted_ascending() {
        let slots = vec!["19:00".to_string(), "18:30".to_string(), "18:45".to_string()];
        let hits = matching_slots(t("18:45"), 30, &slots);
        assert_eq!(hits, vec!["18:30", "18:45", "19:00"]);
    }

    #[test]
    fn empty_slot_list_never_matches() {
        assert!(matching_slots(t("19:00"), 30, &[]).is_empty());
        assert!(!is_within_window(t("19:00"), 30, &[]));
    }

    #[test]
    fn garbage_slots_are_skipped_not_fatal() {
        let slots = vec!["not-a-time".to_string(), "19:00".to_string()];
        let hits = matching_slots(t("19:00"), 30, &slots);
        assert_eq!(hits, vec!["19:00"]);
    }

    #[test]
    fn capacity_filter_excludes_small_tables() {
        let tables = vec![table(2, &["19:00"]), table(6, &["19:00"])];
        let matched = match_tables(t("19:00"), 30, &tables, 4);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].0.size, 6);
    }

    #[test]
    fn zero_hit_tables_are_excluded() {
        let tables = vec![table(4, &["12:00"]), table(4, &["19:00"])];
        let matched = match_tables(t("19:00"), 30, &tables, 2);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].1, vec!["19:00"]);
    }

    #[test]
    fn normalize_rejects_bad_config() {
        assert!(normalize_slots(&["18:30".to_string(), "25:99".to_string()]).is_err());
        let ok = normalize_slots(&["19:00".to_string(), " 9:30".to_string()]).unwrap();
        assert_eq!(ok, vec!["09:30", "19:00"]);
    }
}
