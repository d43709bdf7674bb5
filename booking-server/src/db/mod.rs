//! Database Module
//!
//! 嵌入式 SurrealDB：生产环境使用 RocksDB 引擎，测试使用内存引擎。

pub mod repository;

use crate::utils::AppError;
use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::Surreal;

const NAMESPACE: &str = "dinebook";
const DATABASE: &str = "booking";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::init(db).await
    }

    /// In-memory database for tests
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        // 预约按 (table, date, time) 查询，建非唯一索引加速。
        // 排他性不靠唯一索引（CANCELLED 记录可为同一元组累积多条），
        // 由账本的 per-key 锁保证，见 booking::locks。
        db.query(
            "DEFINE INDEX IF NOT EXISTS booking_slot_idx ON TABLE booking FIELDS `table`, date, time",
        )
        .await
        .map_err(|e| AppError::database(format!("Failed to define index: {e}")))?;

        tracing::info!("Database connection established (embedded SurrealDB)");
        Ok(Self { db })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_on_disk_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dinebook.db");
        let service = DbService::new(&path.to_string_lossy()).await.unwrap();

        // 索引定义是幂等的，重复 init 不报错
        service
            .db
            .query("DEFINE INDEX IF NOT EXISTS booking_slot_idx ON TABLE booking FIELDS `table`, date, time")
            .await
            .unwrap();
    }
}
