use std::sync::Arc;
use std::time::Duration;

use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use crate::booking::{AvailabilitySearch, BookingLedger};
use crate::core::Config;
use crate::db::DbService;
use crate::services::{LogNotifier, Notifier, WebhookNotifier};
use crate::utils::{Clock, SystemClock};

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是预约引擎的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | ledger | Arc<BookingLedger> | 预约账本（唯一写入者） |
/// | search | Arc<AvailabilitySearch> | 可用性搜索 |
/// | clock | Arc<dyn Clock> | 注入时钟（测试可冻结） |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 预约账本
    pub ledger: Arc<BookingLedger>,
    /// 可用性搜索
    pub search: Arc<AvailabilitySearch>,
    /// 注入时钟
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("db", &"<Surreal<Db>>")
            .finish()
    }
}

impl ServerState {
    /// 以给定依赖装配状态（测试注入冻结时钟/假通知器的入口）
    pub fn build(
        config: Config,
        db: Surreal<Db>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let ledger = Arc::new(BookingLedger::new(
            db.clone(),
            clock.clone(),
            notifier,
            config.slot_tolerance_min,
            Duration::from_millis(config.lock_wait_ms),
        ));
        let search = Arc::new(AvailabilitySearch::new(
            db.clone(),
            clock.clone(),
            config.slot_tolerance_min,
        ));

        Self {
            config,
            db,
            ledger,
            search,
            clock,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录 (work_dir/database)
    /// 2. 数据库 (work_dir/database/dinebook.db)
    /// 3. 通知器（有 NOTIFY_WEBHOOK_URL 用 webhook，否则只记日志）
    /// 4. 账本与搜索服务
    pub async fn initialize(config: &Config) -> crate::core::Result<Self> {
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir)?;
        let db_path = db_dir.join("dinebook.db");

        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .map_err(|e| crate::core::ServerError::Startup(e.to_string()))?;

        let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
            Some(url) => {
                tracing::info!(url = %url, "Confirmation notifications via webhook");
                Arc::new(WebhookNotifier::new(url.clone()))
            }
            None => {
                tracing::info!("No NOTIFY_WEBHOOK_URL set, confirmations are logged only");
                Arc::new(LogNotifier)
            }
        };

        Ok(Self::build(
            config.clone(),
            db_service.db,
            Arc::new(SystemClock),
            notifier,
        ))
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
