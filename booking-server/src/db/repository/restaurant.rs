//! Restaurant Repository

use super::{BaseRepository, RepoError, RepoResult};
use shared::models::{Restaurant, RestaurantCreate};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "restaurant";

#[derive(Clone)]
pub struct RestaurantRepository {
    base: BaseRepository,
}

impl RestaurantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all restaurants, name order
    pub async fn find_all(&self) -> RepoResult<Vec<Restaurant>> {
        let restaurants: Vec<Restaurant> = self
            .base
            .db()
            .query("SELECT * FROM restaurant ORDER BY name")
            .await?
            .take(0)?;
        Ok(restaurants)
    }

    /// Find restaurant by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Restaurant>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let restaurant: Option<Restaurant> = self.base.db().select(thing).await?;
        Ok(restaurant)
    }

    /// 按位置过滤餐厅
    ///
    /// - `city_state`: 城市或州名子串匹配（不区分大小写）
    /// - `zip_code`: 邮编精确匹配
    ///
    /// 两个过滤条件都为空时返回全部餐厅。
    pub async fn find_by_location(
        &self,
        city_state: Option<&str>,
        zip_code: Option<&str>,
    ) -> RepoResult<Vec<Restaurant>> {
        let mut sql = String::from("SELECT * FROM restaurant");
        let mut clauses: Vec<&str> = Vec::new();

        let cs = city_state.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
        let zip = zip_code.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        if cs.is_some() {
            clauses.push(
                "(string::lowercase(city) CONTAINS $cs OR string::lowercase(state) CONTAINS $cs)",
            );
        }
        if zip.is_some() {
            clauses.push("zip_code = $zip");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY name");

        let mut query = self.base.db().query(sql);
        if let Some(cs) = cs {
            query = query.bind(("cs", cs));
        }
        if let Some(zip) = zip {
            query = query.bind(("zip", zip));
        }

        let restaurants: Vec<Restaurant> = query.await?.take(0)?;
        Ok(restaurants)
    }

    /// Create a new restaurant listing
    pub async fn create(&self, owner: &str, data: RestaurantCreate) -> RepoResult<Restaurant> {
        let restaurant = Restaurant {
            id: None,
            owner: owner.to_string(),
            name: data.name,
            address: data.address,
            city: data.city,
            state: data.state,
            zip_code: data.zip_code,
            rating: data.rating.unwrap_or(0.0),
            created_at: now_millis(),
        };

        let created: Option<Restaurant> =
            self.base.db().create(TABLE).content(restaurant).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create restaurant".to_string()))
    }

    /// Delete a restaurant and cascade its tables and bookings
    ///
    /// 级联条件比较的是字符串形式的引用字段，删除本体用 RecordId。
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.base
            .db()
            .query("DELETE booking WHERE restaurant = $rid")
            .query("DELETE dining_table WHERE restaurant = $rid")
            .query("DELETE $thing")
            .bind(("rid", thing.to_string()))
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
