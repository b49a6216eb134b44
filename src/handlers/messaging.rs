// region:    --- Imports
use crate::auth::AuthUser;
use crate::handlers::{error_response, query_error_response};
use crate::messaging::commands;
use crate::messaging::model::SendMessageCommand;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

// endregion: --- Imports

/// 쪽지 발송 처리
pub async fn handle_send_message(
    State((db_manager, notification_store)): State<AppState>,
    auth: AuthUser,
    Json(cmd): Json<SendMessageCommand>,
) -> impl IntoResponse {
    match commands::send_message(&db_manager, &notification_store, auth.user_id, cmd).await {
        Ok(message) => (StatusCode::CREATED, Json(message)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 대화 목록 조회
pub async fn handle_get_conversations(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
) -> impl IntoResponse {
    match commands::get_conversations(&db_manager, auth.user_id).await {
        Ok(conversations) => Json(conversations).into_response(),
        Err(e) => query_error_response(&e),
    }
}

/// 상대방과의 대화 조회
pub async fn handle_get_conversation_with(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
    Path(counterpart_id): Path<i64>,
) -> impl IntoResponse {
    match commands::get_conversation_with(&db_manager, auth.user_id, counterpart_id).await {
        Ok(messages) => Json(messages).into_response(),
        Err(e) => query_error_response(&e),
    }
}

/// 쪽지 읽음 처리
pub async fn handle_mark_message_read(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
    Path(message_id): Path<i64>,
) -> impl IntoResponse {
    match commands::mark_read(&db_manager, auth.user_id, message_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// 쪽지 삭제 처리
pub async fn handle_delete_message(
    State((db_manager, _)): State<AppState>,
    auth: AuthUser,
    Path(message_id): Path<i64>,
) -> impl IntoResponse {
    match commands::delete_message(&db_manager, auth.user_id, message_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
