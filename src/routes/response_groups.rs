//! Response group routes: CRUD and bulk import.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::response_group::{
    CreateResponseGroup, ResponseGroup, ResponseGroupSummary, UpdateResponseGroup,
};
use crate::services::response_group::{self as group_service, ImportResult, ResponseGroupFilters};
use crate::AppState;

/// GET /responses — list response groups with filters and pagination.
pub async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<ResponseGroupFilters>,
) -> Json<ApiResponse<PagedResult<ResponseGroupSummary>>> {
    let result = group_service::list(&state.store, &filters, &pagination);
    ApiResponse::success(result)
}

/// POST /responses — create a new response group.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateResponseGroup>,
) -> Result<Json<ApiResponse<ResponseGroup>>, AppError> {
    let group = group_service::create(&state.store, &body)?;
    Ok(ApiResponse::success(group))
}

/// GET /responses/:id — get response group by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ResponseGroup>>, AppError> {
    let group = group_service::find_by_id(&state.store, id)?;
    Ok(ApiResponse::success(group))
}

/// PUT /responses/:id — update response group.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateResponseGroup>,
) -> Result<Json<ApiResponse<ResponseGroup>>, AppError> {
    let group = group_service::update(&state.store, id, &body)?;
    Ok(ApiResponse::success(group))
}

/// DELETE /responses/:id — delete response group permanently.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    group_service::delete(&state.store, id)?;
    Ok(ApiResponse::success(()))
}

/// POST /responses/import — bulk import from a JSON array, upserting by name.
pub async fn import_bulk(
    State(state): State<AppState>,
    Json(body): Json<Vec<CreateResponseGroup>>,
) -> Json<ApiResponse<ImportResult>> {
    let result = group_service::import_bulk(&state.store, &body);
    ApiResponse::success(result)
}
