//! Copy registry handlers.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use validator::Validate;

use libris_core::AppError;
use libris_core::types::PageResponse;
use libris_entity::copy::{BookCopy, CopyStatus};

use crate::dto::request::{CreateCopyRequest, SetCopyStatusRequest, UpdateCopyRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CopyListParams {
    /// Filter by status.
    pub status: Option<String>,
}

/// GET /api/copies/{id}
pub async fn get_copy(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(copy_id): Path<i64>,
) -> Result<Json<ApiResponse<BookCopy>>, ApiError> {
    let copy = state.copy_service.get_copy(copy_id).await?;
    Ok(Json(ApiResponse::ok(copy)))
}

/// GET /api/books/{id}/copies
pub async fn list_book_copies(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(book_id): Path<i64>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<CopyListParams>,
) -> Result<Json<ApiResponse<PageResponse<BookCopy>>>, ApiError> {
    let status = filter
        .status
        .as_deref()
        .map(CopyStatus::from_str)
        .transpose()?;
    let page = params.into_page_request();
    let result = state
        .copy_service
        .list_by_book(book_id, status, &page)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/copies
pub async fn create_copy(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCopyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookCopy>>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let data = payload.into_create()?;
    let copy = state.copy_service.add_copy(&auth, &data).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(copy))))
}

/// PUT /api/copies/{id}
pub async fn update_copy(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(copy_id): Path<i64>,
    Json(payload): Json<UpdateCopyRequest>,
) -> Result<Json<ApiResponse<BookCopy>>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let data = payload.into_update();
    let copy = state.copy_service.update_copy(&auth, copy_id, &data).await?;
    Ok(Json(ApiResponse::ok(copy)))
}

/// PUT /api/copies/{id}/status
pub async fn set_copy_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(copy_id): Path<i64>,
    Json(payload): Json<SetCopyStatusRequest>,
) -> Result<Json<ApiResponse<BookCopy>>, ApiError> {
    let status = CopyStatus::from_str(&payload.status)?;
    let copy = state
        .copy_service
        .set_status(&auth, copy_id, status)
        .await?;
    Ok(Json(ApiResponse::ok(copy)))
}

/// DELETE /api/copies/{id}
pub async fn delete_copy(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(copy_id): Path<i64>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.copy_service.remove_copy(&auth, copy_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(format!(
        "Copy {copy_id} removed"
    )))))
}
