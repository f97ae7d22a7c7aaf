//! Check-response tester and classification routes.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::services::check::{
    self as check_service, CheckOutcome, CheckRequest, ClassifyOutcome, ClassifyRequest,
};
use crate::AppState;

/// POST /responses/check — dry-run one group's template against a message.
pub async fn check(
    State(state): State<AppState>,
    Json(body): Json<CheckRequest>,
) -> Result<Json<ApiResponse<CheckOutcome>>, AppError> {
    let outcome = check_service::check(&state.store, &body)?;
    Ok(ApiResponse::success(outcome))
}

/// POST /responses/classify — match a message against every stored group.
pub async fn classify(
    State(state): State<AppState>,
    Json(body): Json<ClassifyRequest>,
) -> Json<ApiResponse<ClassifyOutcome>> {
    let outcome = check_service::classify(&state.store, &body);
    ApiResponse::success(outcome)
}
