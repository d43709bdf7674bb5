//! 时间工具
//!
//! 预约时段统一使用 "HH:MM" 字符串表示（24 小时制，固定粒度由餐厅自行决定）。
//! 所有入口都先经过 [`parse_time_hm`] 归一化，保证 "9:30" 和 "09:30" 等价。

use chrono::NaiveTime;

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 解析 "HH:MM" 时段字符串
pub fn parse_time_hm(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}

/// 格式化为归一化的 "HH:MM" 字符串
pub fn format_time_hm(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// 一天内的分钟数 (0..1440)，用于时段窗口比较
pub fn minutes_of_day(t: NaiveTime) -> i64 {
    use chrono::Timelike;
    t.hour() as i64 * 60 + t.minute() as i64
}
