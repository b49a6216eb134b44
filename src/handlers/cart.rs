// region:    --- Imports
use crate::auth::AuthUser;
use crate::cart::commands::{self, SavedItemKind};
use crate::cart::model::SaveItemCommand;
use crate::handlers::{error_response, query_error_response};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

// endregion: --- Imports

/// 장바구니 추가 처리
pub async fn handle_add_to_cart(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
    Json(cmd): Json<SaveItemCommand>,
) -> impl IntoResponse {
    match commands::add_item(&db_manager, SavedItemKind::Cart, auth.user_id, cmd.listing_id).await {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 장바구니 제거 처리
pub async fn handle_remove_from_cart(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
    Path(listing_id): Path<i64>,
) -> impl IntoResponse {
    match commands::remove_item(&db_manager, SavedItemKind::Cart, auth.user_id, listing_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// 장바구니 목록 조회
pub async fn handle_get_cart(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
) -> impl IntoResponse {
    match commands::get_items(&db_manager, SavedItemKind::Cart, auth.user_id).await {
        Ok(listings) => Json(listings).into_response(),
        Err(e) => query_error_response(&e),
    }
}

/// 찜 추가 처리
pub async fn handle_add_to_watchlist(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
    Json(cmd): Json<SaveItemCommand>,
) -> impl IntoResponse {
    match commands::add_item(
        &db_manager,
        SavedItemKind::Watchlist,
        auth.user_id,
        cmd.listing_id,
    )
    .await
    {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 찜 제거 처리
pub async fn handle_remove_from_watchlist(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
    Path(listing_id): Path<i64>,
) -> impl IntoResponse {
    match commands::remove_item(
        &db_manager,
        SavedItemKind::Watchlist,
        auth.user_id,
        listing_id,
    )
    .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// 찜 목록 조회
pub async fn handle_get_watchlist(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
) -> impl IntoResponse {
    match commands::get_items(&db_manager, SavedItemKind::Watchlist, auth.user_id).await {
        Ok(listings) => Json(listings).into_response(),
        Err(e) => query_error_response(&e),
    }
}
