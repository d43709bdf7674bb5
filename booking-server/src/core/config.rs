/// 服务器配置 - 预约引擎的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/dinebook | 工作目录（数据库、日志） |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | SLOT_TOLERANCE_MIN | 30 | 时段容差窗口（分钟） |
/// | LOCK_WAIT_MS | 2000 | 时段锁等待上限（毫秒） |
/// | NOTIFY_WEBHOOK_URL | (未设置) | 确认通知 webhook，缺省只记日志 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 滚动日志目录 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/dinebook HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 时段容差窗口（分钟）
    pub slot_tolerance_min: i64,
    /// 热点时段锁等待上限（毫秒）
    pub lock_wait_ms: u64,
    /// 确认通知 webhook 地址
    pub notify_webhook_url: Option<String>,
    /// 日志级别
    pub log_level: String,
    /// 滚动日志目录
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/dinebook".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            slot_tolerance_min: std::env::var("SLOT_TOLERANCE_MIN")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(crate::booking::DEFAULT_TOLERANCE_MIN),
            lock_wait_ms: std::env::var("LOCK_WAIT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(2000),
            notify_webhook_url: std::env::var("NOTIFY_WEBHOOK_URL").ok().filter(|s| !s.is_empty()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
        }
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> std::path::PathBuf {
        std::path::PathBuf::from(&self.work_dir).join("database")
    }

    /// 是否生产环境（生产环境收紧 CORS）
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
