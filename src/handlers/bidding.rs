// region:    --- Imports
use crate::auth::AuthUser;
use crate::bidding::commands;
use crate::bidding::model::PlaceBidCommand;
use crate::handlers::{error_response, query_error_response};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

// endregion: --- Imports

/// 입찰 요청 처리
pub async fn handle_place_bid(
    State((db_manager, notification_store)): State<AppState>,
    auth: AuthUser,
    Json(cmd): Json<PlaceBidCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Handler", cmd);
    match commands::place_bid(&db_manager, &notification_store, auth.user_id, cmd).await {
        Ok(outcome) => (StatusCode::CREATED, Json(outcome)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 입찰 철회 처리
pub async fn handle_retract_bid(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
    Path(bid_id): Path<i64>,
) -> impl IntoResponse {
    match commands::retract_bid(&db_manager, auth.user_id, bid_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// 판매글 입찰 이력 조회
pub async fn handle_get_listing_bids(
    State((db_manager, _)): State<AppState>,
    Path(listing_id): Path<i64>,
) -> impl IntoResponse {
    match commands::get_listing_bids(&db_manager, listing_id).await {
        Ok(bids) => Json(bids).into_response(),
        Err(e) => query_error_response(&e),
    }
}

/// 내 입찰 이력 조회
pub async fn handle_get_my_bids(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
) -> impl IntoResponse {
    match commands::get_user_bids(&db_manager, auth.user_id).await {
        Ok(bids) => Json(bids).into_response(),
        Err(e) => query_error_response(&e),
    }
}

/// 최고 입찰가 조회
pub async fn handle_get_highest_bid(
    State((db_manager, _)): State<AppState>,
    Path(listing_id): Path<i64>,
) -> impl IntoResponse {
    match commands::get_highest_bid(&db_manager, listing_id).await {
        Ok(highest) => Json(serde_json::json!({ "highest_bid": highest })).into_response(),
        Err(e) => query_error_response(&e),
    }
}
