//! Dining Table API Handlers

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::booking::slots::normalize_slots;
use crate::core::ServerState;
use crate::db::repository::{DiningTableRepository, RestaurantRepository};
use crate::utils::{AppError, AppResult};
use shared::request::UpdateTableRequest;
use shared::response::TableView;

/// PUT /api/tables/{id} - 更新桌台容量/时段配置
///
/// 新时段列表整体归一化，任何一项非法则整体拒绝，原配置不动。
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTableRequest>,
) -> AppResult<Json<TableView>> {
    payload.validate()?;

    let tables = DiningTableRepository::new(state.get_db());
    let table = tables
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Dining table {} not found", id)))?;

    // 归属链：table -> restaurant -> owner
    let restaurant = RestaurantRepository::new(state.get_db())
        .find_by_id(&table.restaurant.to_string())
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("Restaurant not found"))?;
    if restaurant.owner != user.id {
        return Err(AppError::forbidden("Not the owner of this restaurant"));
    }

    let available_times = match payload.available_times {
        Some(times) => Some(normalize_slots(&times).map_err(AppError::validation)?),
        None => None,
    };

    let updated = tables
        .update(&id, payload.size, available_times)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(owner = %user.id, table = %id, "Table configuration updated");
    Ok(Json(TableView::from(&updated)))
}
