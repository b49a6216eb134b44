// region:    --- Imports
use crate::auth::AuthUser;
use crate::handlers::query_error_response;
use crate::notification;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

// endregion: --- Imports

/// 알림 목록 조회 (최신순)
pub async fn handle_get_notifications(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
) -> impl IntoResponse {
    match notification::get_notifications(&db_manager, auth.user_id).await {
        Ok(notifications) => Json(notifications).into_response(),
        Err(e) => query_error_response(&e),
    }
}

/// 알림 읽음 처리
pub async fn handle_mark_notification_read(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
    Path(notification_id): Path<i64>,
) -> impl IntoResponse {
    match notification::mark_read(&db_manager, notification_id, auth.user_id).await {
        Ok(0) => StatusCode::NOT_FOUND.into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => query_error_response(&e),
    }
}

/// 알림 전체 읽음 처리
pub async fn handle_mark_all_notifications_read(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
) -> impl IntoResponse {
    match notification::mark_all_read(&db_manager, auth.user_id).await {
        Ok(updated) => Json(serde_json::json!({ "updated": updated })).into_response(),
        Err(e) => query_error_response(&e),
    }
}
