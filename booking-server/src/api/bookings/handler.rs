//! Booking API Handlers
//!
//! 账本做业务前置检查和排他；这里只负责解析、鉴权上下文和视图组装。

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, Json};
use surrealdb::RecordId;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{DiningTableRepository, RestaurantRepository};
use crate::utils::{AppError, AppResult};
use shared::request::{CancelBookingRequest, CreateBookingRequest};
use shared::response::{BookingView, MessageResponse};

fn parse_record_id(raw: &str, what: &str) -> AppResult<RecordId> {
    raw.parse()
        .map_err(|_| AppError::validation(format!("Invalid {} id: {}", what, raw)))
}

/// POST /api/bookings - 创建预约
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingView>)> {
    payload.validate()?;
    let restaurant_id = parse_record_id(&payload.restaurant_id, "restaurant")?;
    let table_id = parse_record_id(&payload.table_id, "table")?;
    let date = payload
        .parse_date()
        .ok_or_else(|| AppError::validation("Invalid date (expected YYYY-MM-DD)"))?;
    let time = payload
        .parse_time()
        .ok_or_else(|| AppError::validation("Invalid time (expected HH:MM)"))?;

    let committed = state
        .ledger
        .create_booking(&user, &restaurant_id, &table_id, date, time, payload.num_people)
        .await?;

    let view = BookingView::from_booking(
        &committed.booking,
        &committed.restaurant_name,
        committed.table_size,
        state.clock.now(),
    );
    Ok((StatusCode::CREATED, Json(view)))
}

/// POST /api/bookings/cancel - 取消预约
///
/// 按 (restaurant, table, date, time) 元组定位调用者自己的 BOOKED 记录。
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CancelBookingRequest>,
) -> AppResult<Json<MessageResponse>> {
    payload.validate()?;
    let restaurant_id = parse_record_id(&payload.restaurant_id, "restaurant")?;
    let table_id = parse_record_id(&payload.table_id, "table")?;
    let date = payload
        .parse_date()
        .ok_or_else(|| AppError::validation("Invalid date (expected YYYY-MM-DD)"))?;
    let time = payload
        .parse_time()
        .ok_or_else(|| AppError::validation("Invalid time (expected HH:MM)"))?;

    state
        .ledger
        .cancel_booking(&user, &restaurant_id, &table_id, date, time)
        .await?;

    Ok(Json(MessageResponse {
        message: "Booking cancelled".to_string(),
    }))
}

/// GET /api/bookings/mine - 我的预约，新的在前
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<BookingView>>> {
    let bookings = state.ledger.list_for_user(&user).await?;
    let now = state.clock.now();

    // 同一家餐厅/桌台只查一次
    let restaurants = RestaurantRepository::new(state.get_db());
    let tables = DiningTableRepository::new(state.get_db());
    let mut names: HashMap<String, String> = HashMap::new();
    let mut sizes: HashMap<String, u32> = HashMap::new();

    let mut views = Vec::with_capacity(bookings.len());
    for booking in &bookings {
        let rid = booking.restaurant.to_string();
        if !names.contains_key(&rid) {
            let name = restaurants
                .find_by_id(&rid)
                .await
                .map_err(|e| AppError::database(e.to_string()))?
                .map(|r| r.name)
                .unwrap_or_default();
            names.insert(rid.clone(), name);
        }

        let tid = booking.table.to_string();
        if !sizes.contains_key(&tid) {
            let size = tables
                .find_by_id(&tid)
                .await
                .map_err(|e| AppError::database(e.to_string()))?
                .map(|t| t.size)
                .unwrap_or(0);
            sizes.insert(tid.clone(), size);
        }

        views.push(BookingView::from_booking(
            booking,
            names.get(&rid).map(String::as_str).unwrap_or_default(),
            sizes.get(&tid).copied().unwrap_or(0),
            now,
        ));
    }

    Ok(Json(views))
}
