// region:    --- Imports
use crate::auth::AuthUser;
use crate::handlers::{error_response, query_error_response};
use crate::offer::commands;
use crate::offer::model::{CounterOfferCommand, CreateOfferCommand};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

// endregion: --- Imports

/// 제안 생성 처리
pub async fn handle_create_offer(
    State((db_manager, notification_store)): State<AppState>,
    auth: AuthUser,
    Json(cmd): Json<CreateOfferCommand>,
) -> impl IntoResponse {
    match commands::create_offer(&db_manager, &notification_store, auth.user_id, cmd).await {
        Ok(offer) => (StatusCode::CREATED, Json(offer)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 제안 수락 처리
pub async fn handle_accept_offer(
    State((db_manager, notification_store)): State<AppState>,
    auth: AuthUser,
    Path(offer_id): Path<i64>,
) -> impl IntoResponse {
    match commands::accept_offer(&db_manager, &notification_store, auth.user_id, offer_id).await {
        Ok(offer) => Json(offer).into_response(),
        Err(e) => error_response(e),
    }
}

/// 제안 거절 처리
pub async fn handle_decline_offer(
    State((db_manager, notification_store)): State<AppState>,
    auth: AuthUser,
    Path(offer_id): Path<i64>,
) -> impl IntoResponse {
    match commands::decline_offer(&db_manager, &notification_store, auth.user_id, offer_id).await {
        Ok(offer) => Json(offer).into_response(),
        Err(e) => error_response(e),
    }
}

/// 카운터 제안 처리
pub async fn handle_counter_offer(
    State((db_manager, notification_store)): State<AppState>,
    auth: AuthUser,
    Path(offer_id): Path<i64>,
    Json(cmd): Json<CounterOfferCommand>,
) -> impl IntoResponse {
    match commands::counter_offer(&db_manager, &notification_store, auth.user_id, offer_id, cmd)
        .await
    {
        Ok(offer) => (StatusCode::CREATED, Json(offer)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 제안 철회 처리
pub async fn handle_withdraw_offer(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
    Path(offer_id): Path<i64>,
) -> impl IntoResponse {
    match commands::withdraw_offer(&db_manager, auth.user_id, offer_id).await {
        Ok(offer) => Json(offer).into_response(),
        Err(e) => error_response(e),
    }
}

/// 내 제안 목록 조회
pub async fn handle_get_my_offers(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
) -> impl IntoResponse {
    match commands::get_user_offers(&db_manager, auth.user_id).await {
        Ok(offers) => Json(offers).into_response(),
        Err(e) => query_error_response(&e),
    }
}

/// 판매글 제안 목록 조회 (판매자만)
pub async fn handle_get_listing_offers(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
    Path(listing_id): Path<i64>,
) -> impl IntoResponse {
    match commands::get_listing_offers(&db_manager, auth.user_id, listing_id).await {
        Ok(offers) => Json(offers).into_response(),
        Err(e) => error_response(e),
    }
}
