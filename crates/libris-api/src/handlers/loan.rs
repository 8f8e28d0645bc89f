//! Circulation handlers: borrow, return, override, and ledger reads.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use libris_core::types::PageResponse;
use libris_entity::loan::{LoanFilter, LoanStatus};
use libris_service::circulation::LoanView;

use crate::dto::request::{AdminUpdateLoanRequest, BorrowRequest, LoanListParams};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/loans
pub async fn borrow(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<BorrowRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoanView>>), ApiError> {
    let view = state.circulation.borrow(&auth, payload.copy_id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(view))))
}

/// POST /api/loans/{id}/return
pub async fn return_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(record_id): Path<Uuid>,
) -> Result<Json<ApiResponse<LoanView>>, ApiError> {
    let view = state.circulation.return_loan(&auth, record_id).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// GET /api/loans/my
pub async fn my_loans(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<LoanListParams>,
) -> Result<Json<ApiResponse<PageResponse<LoanView>>>, ApiError> {
    let status = parse_status(filter.status.as_deref())?;
    let page = params.into_page_request();
    let result = state.circulation.list_my_loans(&auth, status, &page).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/loans/{id}
pub async fn get_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(record_id): Path<Uuid>,
) -> Result<Json<ApiResponse<LoanView>>, ApiError> {
    let view = state.circulation.get_detail(&auth, record_id).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// PUT /api/loans/{id}
pub async fn update_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(record_id): Path<Uuid>,
    Json(payload): Json<AdminUpdateLoanRequest>,
) -> Result<Json<ApiResponse<LoanView>>, ApiError> {
    let patch = payload.into_patch()?;
    let view = state
        .circulation
        .admin_update(&auth, record_id, &patch)
        .await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// GET /api/loans
pub async fn list_loans(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
    Query(list): Query<LoanListParams>,
) -> Result<Json<ApiResponse<PageResponse<LoanView>>>, ApiError> {
    let filter = LoanFilter {
        user_id: list.user_id,
        status: parse_status(list.status.as_deref())?,
        borrowed_from: list.borrowed_from,
        borrowed_until: list.borrowed_until,
    };
    let page = params.into_page_request();
    let result = state.circulation.list_loans(&auth, &filter, &page).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/loans/overdue
pub async fn list_overdue(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<LoanView>>>, ApiError> {
    let page = params.into_page_request();
    let result = state.circulation.list_overdue(&auth, &page).await?;
    Ok(Json(ApiResponse::ok(result)))
}

fn parse_status(status: Option<&str>) -> Result<Option<LoanStatus>, ApiError> {
    Ok(status.map(LoanStatus::from_str).transpose()?)
}
