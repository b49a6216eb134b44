// region:    --- Imports
use crate::auth::AuthUser;
use crate::handlers::{error_response, query_error_response};
use crate::review::commands;
use crate::review::model::CreateReviewCommand;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

// endregion: --- Imports

/// 후기 작성 처리
pub async fn handle_create_review(
    State((db_manager, notification_store)): State<AppState>,
    auth: AuthUser,
    Json(cmd): Json<CreateReviewCommand>,
) -> impl IntoResponse {
    match commands::create_review(&db_manager, &notification_store, auth.user_id, cmd).await {
        Ok(review) => (StatusCode::CREATED, Json(review)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 회원 후기 목록 조회
pub async fn handle_get_user_reviews(
    State((db_manager, _)): State<AppState>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    match commands::get_user_reviews(&db_manager, user_id).await {
        Ok(reviews) => Json(reviews).into_response(),
        Err(e) => query_error_response(&e),
    }
}
