// region:    --- Imports
use crate::auth::AuthUser;
use crate::handlers::{error_response, query_error_response};
use crate::listing::commands;
use crate::listing::model::{CreateListingCommand, ListingFilter, UpdateListingCommand};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

// endregion: --- Imports

/// 판매글 등록 처리
pub async fn handle_create_listing(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
    Json(cmd): Json<CreateListingCommand>,
) -> impl IntoResponse {
    match commands::create_listing(&db_manager, auth.user_id, cmd).await {
        Ok(listing) => (StatusCode::CREATED, Json(listing)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 판매글 목록 조회
pub async fn handle_get_listings(
    State((db_manager, _)): State<AppState>,
    Query(filter): Query<ListingFilter>,
) -> impl IntoResponse {
    match commands::get_listings(&db_manager, filter).await {
        Ok(listings) => Json(listings).into_response(),
        Err(e) => query_error_response(&e),
    }
}

/// 판매글 조회
pub async fn handle_get_listing(
    State((db_manager, _)): State<AppState>,
    Path(listing_id): Path<i64>,
) -> impl IntoResponse {
    match commands::get_listing(&db_manager, listing_id).await {
        Ok(listing) => Json(listing).into_response(),
        Err(e) => query_error_response(&e),
    }
}

/// 판매글 수정 처리
pub async fn handle_update_listing(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
    Path(listing_id): Path<i64>,
    Json(cmd): Json<UpdateListingCommand>,
) -> impl IntoResponse {
    match commands::update_listing(&db_manager, auth.user_id, listing_id, cmd).await {
        Ok(listing) => Json(listing).into_response(),
        Err(e) => error_response(e),
    }
}

/// 판매글 취소 처리
pub async fn handle_cancel_listing(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
    Path(listing_id): Path<i64>,
) -> impl IntoResponse {
    match commands::cancel_listing(&db_manager, auth.user_id, listing_id).await {
        Ok(listing) => Json(listing).into_response(),
        Err(e) => error_response(e),
    }
}

/// 즉시 구매 요청 처리
pub async fn handle_buy_now(
    State((db_manager, notification_store)): State<AppState>,
    auth: AuthUser,
    Path(listing_id): Path<i64>,
) -> impl IntoResponse {
    match commands::buy_now(&db_manager, &notification_store, auth.user_id, listing_id).await {
        Ok(listing) => Json(listing).into_response(),
        Err(e) => error_response(e),
    }
}
