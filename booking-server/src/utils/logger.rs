//! 日志初始化
//!
//! 默认输出到终端；配置了 `LOG_DIR` 时改写按日滚动的文件
//! （`booking-server.<date>`），目录不存在则创建。

use tracing::Level;

/// 初始化 tracing 订阅者，进程内只能调用一次
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level: Level = log_level
        .and_then(|l| l.parse().ok())
        .unwrap_or(Level::INFO);

    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false);

    match log_dir {
        Some(dir) if std::fs::create_dir_all(dir).is_ok() => {
            let appender = tracing_appender::rolling::daily(dir, "booking-server");
            builder.with_writer(appender).with_ansi(false).init();
        }
        _ => builder.init(),
    }
}
