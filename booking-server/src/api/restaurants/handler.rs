//! Restaurant API Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{DiningTableRepository, RestaurantRepository};
use crate::utils::{AppError, AppResult};
use shared::models::{DiningTableCreate, Restaurant, RestaurantCreate};
use shared::request::{AvailabilityQuery, CreateRestaurantRequest};
use shared::response::{AvailabilityEntry, TableView};

/// 餐厅详情，附当天预约数
#[derive(Serialize)]
pub struct RestaurantDetail {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub bookings_today: u64,
}

/// GET /api/restaurants - 全部餐厅
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Restaurant>>> {
    let repo = RestaurantRepository::new(state.get_db());
    let restaurants = repo
        .find_all()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(restaurants))
}

/// GET /api/restaurants/search - 可用性搜索
///
/// `?date=YYYY-MM-DD&time=HH:MM&num_people=N[&city_state=..][&zip_code=..]`
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<AvailabilityEntry>>> {
    if query.num_people < 1 {
        return Err(AppError::validation("num_people must be at least 1"));
    }
    let date = query
        .parse_date()
        .ok_or_else(|| AppError::validation("Invalid or missing date (expected YYYY-MM-DD)"))?;
    let time = query
        .parse_time()
        .ok_or_else(|| AppError::validation("Invalid or missing time (expected HH:MM)"))?;

    let entries = state
        .search
        .search(
            date,
            time,
            query.num_people,
            query.city_state.as_deref(),
            query.zip_code.as_deref(),
        )
        .await?;
    Ok(Json(entries))
}

/// GET /api/restaurants/{id} - 餐厅详情 + 当天预约数
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<RestaurantDetail>> {
    let repo = RestaurantRepository::new(state.get_db());
    let restaurant = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {} not found", id)))?;

    let restaurant_id = restaurant
        .id
        .clone()
        .ok_or_else(|| AppError::database("Restaurant row has no id"))?;
    let bookings_today = state.ledger.bookings_today(&restaurant_id).await?;

    Ok(Json(RestaurantDetail {
        restaurant,
        bookings_today,
    }))
}

/// GET /api/restaurants/{id}/tables - 餐厅的桌台列表
pub async fn list_tables(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<TableView>>> {
    let restaurants = RestaurantRepository::new(state.get_db());
    let restaurant = restaurants
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {} not found", id)))?;
    let restaurant_id = restaurant
        .id
        .ok_or_else(|| AppError::database("Restaurant row has no id"))?;

    let tables = DiningTableRepository::new(state.get_db())
        .find_by_restaurant(&restaurant_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(tables.iter().map(TableView::from).collect()))
}

/// POST /api/restaurants - 登记餐厅及其桌台
///
/// 时段配置逐项解析归一化，任何一项非法整体拒绝。
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateRestaurantRequest>,
) -> AppResult<(StatusCode, Json<Restaurant>)> {
    payload.validate()?;

    // 先归一化全部桌台时段，失败时不落任何库
    let mut normalized: Vec<(u32, Vec<String>)> = Vec::with_capacity(payload.tables.len());
    for table in &payload.tables {
        let slots = crate::booking::slots::normalize_slots(&table.available_times)
            .map_err(AppError::validation)?;
        normalized.push((table.size, slots));
    }

    let restaurants = RestaurantRepository::new(state.get_db());
    let created = restaurants
        .create(
            &user.id,
            RestaurantCreate {
                name: payload.name,
                address: payload.address,
                city: payload.city,
                state: payload.state,
                zip_code: payload.zip_code,
                rating: payload.rating,
            },
        )
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let restaurant_id = created
        .id
        .clone()
        .ok_or_else(|| AppError::database("Restaurant row has no id"))?;

    let tables = DiningTableRepository::new(state.get_db());
    for (size, available_times) in normalized {
        tables
            .create(DiningTableCreate {
                restaurant: restaurant_id.clone(),
                size,
                available_times,
            })
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
    }

    tracing::info!(owner = %user.id, restaurant = %restaurant_id, "Restaurant registered");
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/restaurants/{id} - 删除餐厅（级联桌台与预约）
pub async fn delete_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = RestaurantRepository::new(state.get_db());
    let restaurant = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {} not found", id)))?;

    if restaurant.owner != user.id {
        return Err(AppError::forbidden("Not the owner of this restaurant"));
    }

    repo.delete(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(true))
}
