//! Dining Table Repository

use super::{BaseRepository, RepoError, RepoResult};
use shared::models::{DiningTable, DiningTableCreate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all tables of a restaurant, size order
    ///
    /// 引用字段以 "table:id" 字符串落库（见 shared::serde_helpers），
    /// 查询绑定同样使用字符串形式。
    pub async fn find_by_restaurant(&self, restaurant: &RecordId) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE restaurant = $restaurant ORDER BY size")
            .bind(("restaurant", restaurant.to_string()))
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// 容量匹配：餐厅内 size >= min_size 的桌台
    pub async fn find_by_restaurant_min_size(
        &self,
        restaurant: &RecordId,
        min_size: u32,
    ) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query(
                "SELECT * FROM dining_table WHERE restaurant = $restaurant AND size >= $min_size ORDER BY size",
            )
            .bind(("restaurant", restaurant.to_string()))
            .bind(("min_size", min_size))
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiningTable>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let table: Option<DiningTable> = self.base.db().select(thing).await?;
        Ok(table)
    }

    /// Create a new dining table
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        if data.size < 1 {
            return Err(RepoError::Validation(
                "Table size must be at least 1".to_string(),
            ));
        }

        let table = DiningTable {
            id: None,
            restaurant: data.restaurant,
            size: data.size,
            available_times: data.available_times,
        };

        let created: Option<DiningTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Update table configuration (size and/or slot list)
    pub async fn update(
        &self,
        id: &str,
        size: Option<u32>,
        available_times: Option<Vec<String>>,
    ) -> RepoResult<DiningTable> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))?;

        let size = size.unwrap_or(existing.size);
        let available_times = available_times.unwrap_or(existing.available_times);

        self.base
            .db()
            .query("UPDATE $thing SET size = $size, available_times = $available_times")
            .bind(("thing", thing))
            .bind(("size", size))
            .bind(("available_times", available_times))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
    }
}
