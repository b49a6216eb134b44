// region:    --- Imports
use crate::auth::AuthUser;
use crate::follow::commands;
use crate::handlers::{error_response, query_error_response};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

// endregion: --- Imports

/// 팔로우 처리
pub async fn handle_follow(
    State((db_manager, notification_store)): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    match commands::follow(&db_manager, &notification_store, auth.user_id, user_id).await {
        Ok(follow) => (StatusCode::CREATED, Json(follow)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 언팔로우 처리
pub async fn handle_unfollow(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    match commands::unfollow(&db_manager, auth.user_id, user_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// 팔로워 목록 조회
pub async fn handle_get_followers(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
) -> impl IntoResponse {
    match commands::get_followers(&db_manager, auth.user_id).await {
        Ok(users) => Json(users).into_response(),
        Err(e) => query_error_response(&e),
    }
}

/// 팔로잉 목록 조회
pub async fn handle_get_following(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
) -> impl IntoResponse {
    match commands::get_following(&db_manager, auth.user_id).await {
        Ok(users) => Json(users).into_response(),
        Err(e) => query_error_response(&e),
    }
}
