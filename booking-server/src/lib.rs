//! DineBook Booking Server - 餐厅订位引擎
//!
//! # 架构概述
//!
//! 本模块是 Booking Server 的主入口，提供以下核心功能：
//!
//! - **预约核心** (`booking`): 时段窗口匹配、可用性搜索、原子化预约账本
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): 网关身份头提取
//! - **通知** (`services/notify`): 预约确认派发
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! booking-server/src/
//! ├── core/          # 配置、状态、错误
//! ├── auth/          # 网关身份、鉴权中间件
//! ├── booking/       # 时段、搜索、账本、锁
//! ├── services/      # 确认通知
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 错误、日志、时钟
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod booking;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::CurrentUser;
pub use booking::{AvailabilitySearch, BookingLedger};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// 设置运行环境 (dotenv, 工作目录, 日志)
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }

    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  _            ____              __
   / __ \(_)___  ___  / __ )____  ____  / /__
  / / / / / __ \/ _ \/ __  / __ \/ __ \/ //_/
 / /_/ / / / / /  __/ /_/ / /_/ / /_/ / ,<
/_____/_/_/ /_/\___/_____/\____/\____/_/|_|
    "#
    );
}
